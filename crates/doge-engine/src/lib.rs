/// Dogecoin SDK - Transaction workspace engine.
///
/// A `Registry` owns in-progress transactions keyed by integer handles.
/// The builder methods add inputs and outputs and finalize change, the
/// signer methods write P2PKH signature scripts, and the `keys` module
/// generates and verifies keypairs, addresses and HD keys.

pub mod config;
pub mod registry;
pub mod builder;
pub mod signer;
pub mod keys;

mod error;
pub use error::EngineError;
pub use config::EngineConfig;
pub use registry::{Handle, Registry};
pub use signer::sign_raw_transaction;

#[cfg(test)]
mod tests;

#![deny(missing_docs)]

//! Dogecoin raw-transaction SDK.
//!
//! Re-exports every member crate so applications can depend on a single
//! crate: primitives (hashing, keys, HD derivation), script (P2PKH scripts
//! and addresses), transaction (wire codec, sighash, amounts) and engine
//! (the handle-indexed workspace, builder and signer).

pub use doge_engine as engine;
pub use doge_primitives as primitives;
pub use doge_script as script;
pub use doge_transaction as transaction;

pub use doge_engine::{EngineConfig, EngineError, Registry};
pub use doge_primitives::Network;

/// Dogecoin SDK - Cryptographic primitives, hashing, and utilities.
///
/// This crate provides the foundational building blocks for the SDK:
/// - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Hash160, HMAC-SHA512)
/// - Chain hash type for transaction identification
/// - secp256k1 private/public keys, WIF encoding and DER signatures
/// - BIP32 extended keys and derivation paths
/// - Compact-size integers and little-endian wire reader/writer
/// - Base58 and Base58Check encoding
/// - Network chain parameters and the crypto context lifecycle

pub mod hash;
pub mod chainhash;
pub mod util;
pub mod base58;
pub mod ec;
pub mod bip32;
pub mod network;
pub mod context;

mod error;
pub use error::PrimitivesError;
pub use network::Network;
pub use context::EccContext;

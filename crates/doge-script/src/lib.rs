/// Dogecoin SDK - Script bytes, opcodes and addresses.
///
/// Provides the `Script` type, the opcode constants needed for standard
/// scripts, push-data chunk decoding, P2PKH locking/unlocking script
/// helpers and P2PKH address parsing/encoding.

pub mod script;
pub mod opcodes;
pub mod chunk;
pub mod address;

mod error;
pub use error::ScriptError;
pub use script::Script;
pub use address::Address;
pub use chunk::ScriptChunk;
pub use doge_primitives::Network;

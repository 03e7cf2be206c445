//! Opcode constants used by standard scripts.

/// Push an empty byte vector.
pub const OP_0: u8 = 0x00;
/// Push the next 20 bytes.
pub const OP_DATA_20: u8 = 0x14;
/// Push the next 33 bytes.
pub const OP_DATA_33: u8 = 0x21;
/// Largest direct push opcode.
pub const OP_DATA_75: u8 = 0x4b;
/// Next byte holds the push length.
pub const OP_PUSHDATA1: u8 = 0x4c;
/// Next two bytes hold the push length.
pub const OP_PUSHDATA2: u8 = 0x4d;
/// Next four bytes hold the push length.
pub const OP_PUSHDATA4: u8 = 0x4e;
/// Duplicate the top stack item.
pub const OP_DUP: u8 = 0x76;
/// Check equality and fail if not equal.
pub const OP_EQUALVERIFY: u8 = 0x88;
/// RIPEMD-160(SHA-256(x)).
pub const OP_HASH160: u8 = 0xa9;
/// Marks the start of the script code covered by signatures.
pub const OP_CODESEPARATOR: u8 = 0xab;
/// Verify an ECDSA signature.
pub const OP_CHECKSIG: u8 = 0xac;

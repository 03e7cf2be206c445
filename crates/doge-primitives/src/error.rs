/// Unified error type for all primitives operations.
///
/// Covers errors from hashing, EC operations, encoding, HD derivation
/// and key management.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("invalid WIF format: {0}")]
    InvalidWif(String),

    #[error("WIF prefix {0:#04x} does not belong to any known network")]
    UnknownWifPrefix(u8),

    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("invalid key length: expected {expected}, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("invalid base58: {0}")]
    InvalidBase58(String),

    #[error("invalid extended key: {0}")]
    InvalidExtendedKey(String),

    #[error("invalid derivation path: {0}")]
    InvalidDerivationPath(String),

    #[error("cannot derive hardened child {0} from a public key")]
    HardenedFromPublic(u32),

    #[error("derived key is invalid at index {0}")]
    InvalidChild(u32),

    #[error("varint too large")]
    VarIntTooLarge,

    #[error("non-canonical compact size encoding of {0}")]
    NonCanonicalCompactSize(u64),

    #[error("unexpected end of data")]
    UnexpectedEof,
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}

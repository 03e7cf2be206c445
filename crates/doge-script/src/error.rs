/// Error types for script and address operations.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// Invalid address string.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Decoded address payload has the wrong length.
    #[error("invalid address length for '{0}'")]
    InvalidAddressLength(String),

    /// Version byte is not a known P2PKH version.
    #[error("address not supported: {0}")]
    UnsupportedAddress(String),

    /// Address belongs to a different network than required.
    #[error("address {address} is not a {expected} address")]
    WrongNetwork {
        /// The offending address.
        address: String,
        /// The network that was required.
        expected: doge_primitives::Network,
    },

    /// Base58Check checksum does not match.
    #[error("checksum failed")]
    EncodingChecksumFailed,

    /// Invalid hex string.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Script is not a P2PKH script.
    #[error("not a P2PKH")]
    NotP2PKH,

    /// Not enough data in script to complete a push operation.
    #[error("not enough data")]
    DataTooSmall,

    /// Push data exceeds maximum allowed size.
    #[error("data too big")]
    DataTooBig,

    /// Error from primitives crate.
    #[error("primitives error: {0}")]
    Primitives(#[from] doge_primitives::PrimitivesError),
}

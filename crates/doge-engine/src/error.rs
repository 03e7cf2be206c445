use doge_transaction::Koinu;

use crate::registry::Handle;

/// Error types for workspace, builder and signing operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The handle is unknown or its slot was cleared.
    #[error("no transaction stored under handle {0}")]
    NoSuchTransaction(Handle),
    /// Hex input longer than the configured maximum.
    #[error("hex input of {len} chars exceeds maximum of {max}")]
    HexTooLong {
        /// Length of the rejected input.
        len: usize,
        /// Configured maximum.
        max: usize,
    },
    /// A WIF or extended key that could not be decoded.
    #[error("invalid key: {0}")]
    InvalidKey(String),
    /// Outputs plus fee exceed the declared input total.
    #[error("insufficient funds: {available} available, {required} required")]
    InsufficientFunds {
        /// Declared input total.
        available: Koinu,
        /// Sum of outputs plus fee.
        required: Koinu,
    },
    /// Finalize found no output paying a P2PKH script.
    #[error("transaction has no P2PKH output")]
    NoP2pkhOutput,
    /// Finalized outputs do not add up to total minus fee.
    #[error("outputs total {actual}, expected {expected}")]
    OutputMismatch {
        /// Total minus fee.
        expected: Koinu,
        /// Sum of outputs after finalize.
        actual: Koinu,
    },
    /// Batch signing needs one amount per input.
    #[error("{amounts} amounts supplied for {inputs} inputs")]
    AmountCountMismatch {
        /// Number of inputs in the transaction.
        inputs: usize,
        /// Number of amounts supplied.
        amounts: usize,
    },
    #[error("transaction error: {0}")]
    Transaction(#[from] doge_transaction::TransactionError),
    #[error("script error: {0}")]
    Script(#[from] doge_script::ScriptError),
    #[error("primitives error: {0}")]
    Primitives(#[from] doge_primitives::PrimitivesError),
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

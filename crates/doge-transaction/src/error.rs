/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// The transaction structure is invalid for the requested operation.
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
    /// An error occurred during input signing.
    #[error("signing error: {0}")]
    SigningError(String),
    /// An error occurred during binary/hex serialization or deserialization.
    #[error("serialization error: {0}")]
    SerializationError(String),
    /// A decimal amount could not be converted to koinu.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// An input index past the end of the input list.
    #[error("input index {index} out of range (tx has {count} inputs)")]
    InputIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of inputs in the transaction.
        count: usize,
    },
    /// SIGHASH_SINGLE on an input without a matching output.
    #[error("SIGHASH_SINGLE input {index} has no matching output ({outputs} outputs)")]
    SighashSingleOutOfRange {
        /// Input being signed.
        index: usize,
        /// Number of outputs in the transaction.
        outputs: usize,
    },
    /// An underlying script error (forwarded from `doge-script`).
    #[error("script error: {0}")]
    Script(#[from] doge_script::ScriptError),
    /// An underlying primitives error (forwarded from `doge-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] doge_primitives::PrimitivesError),
}

/// Dogecoin SDK - Transaction building, signing, and serialization.
///
/// Provides the Transaction type with inputs and outputs, the bit-exact
/// wire codec, Koinu fixed-point amounts, the legacy signature hash and
/// the P2PKH unlocking template.

pub mod transaction;
pub mod input;
pub mod output;
pub mod koinu;
pub mod sighash;
pub mod template;

mod error;
pub use error::TransactionError;
pub use transaction::Transaction;
pub use input::TransactionInput;
pub use output::TransactionOutput;
pub use koinu::Koinu;

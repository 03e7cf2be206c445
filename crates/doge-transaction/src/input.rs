//! Transaction input referencing a previous output.
//!
//! Contains the previous transaction id, output index, signature script
//! and sequence number, with binary serialization following the wire
//! format.

use doge_primitives::chainhash::Hash;
use doge_primitives::util::{WireReader, WireWriter};
use doge_script::Script;

use crate::TransactionError;

/// Default sequence number indicating a final input.
pub const DEFAULT_SEQUENCE_NUMBER: u32 = 0xFFFF_FFFF;

/// Smallest possible encoded input: outpoint, empty script, sequence.
pub(crate) const MIN_INPUT_LEN: usize = 32 + 4 + 1 + 4;

/// A single input in a transaction.
///
/// Each input spends the output `prev_vout` of transaction `prev_txid`.
/// The `script_sig` stays empty until the input is signed.
///
/// # Wire format
///
/// | Field      | Size                              |
/// |------------|-----------------------------------|
/// | prev_txid  | 32 bytes (reversed display order) |
/// | prev_vout  | 4 bytes (LE)                      |
/// | script len | compact size                      |
/// | script_sig | variable                          |
/// | sequence   | 4 bytes (LE)                      |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionInput {
    /// Id of the transaction being spent, in wire order.
    pub prev_txid: Hash,

    /// Index of the output within the previous transaction.
    pub prev_vout: u32,

    /// The unlocking script (scriptSig). Empty when unsigned.
    pub script_sig: Script,

    /// Sequence number. Defaults to `0xFFFFFFFF` (final).
    pub sequence: u32,
}

impl TransactionInput {
    /// Create an unsigned input spending `prev_txid:prev_vout`.
    pub fn new(prev_txid: Hash, prev_vout: u32) -> Self {
        TransactionInput {
            prev_txid,
            prev_vout,
            script_sig: Script::new(),
            sequence: DEFAULT_SEQUENCE_NUMBER,
        }
    }

    /// Create an unsigned input from a display-order txid hex string.
    ///
    /// # Arguments
    /// * `txid_hex` - 64 hex characters as shown by RPC output.
    /// * `vout` - The output index being spent.
    ///
    /// # Returns
    /// The input, or an error if the txid is not valid hex of the right length.
    pub fn from_outpoint_hex(txid_hex: &str, vout: u32) -> Result<Self, TransactionError> {
        Ok(Self::new(Hash::from_hex(txid_hex)?, vout))
    }

    /// Deserialize a `TransactionInput` from a `WireReader`.
    ///
    /// # Arguments
    /// * `reader` - The reader positioned at the start of an encoded input.
    ///
    /// # Returns
    /// `Ok(TransactionInput)` on success, or a `SerializationError` if the
    /// data is truncated or the script length overruns the buffer.
    pub fn read_from(reader: &mut WireReader) -> Result<Self, TransactionError> {
        let txid = reader.read_array::<32>().map_err(|e| {
            TransactionError::SerializationError(format!("reading prev txid: {}", e))
        })?;

        let prev_vout = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading prev vout: {}", e))
        })?;

        let script_bytes = reader.read_var_bytes().map_err(|e| {
            TransactionError::SerializationError(format!("reading signature script: {}", e))
        })?;

        let sequence = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading sequence number: {}", e))
        })?;

        Ok(TransactionInput {
            prev_txid: Hash::new(txid),
            prev_vout,
            script_sig: Script::from(script_bytes),
            sequence,
        })
    }

    /// Serialize this `TransactionInput` into a `WireWriter`.
    ///
    /// # Arguments
    /// * `writer` - The writer to append serialized bytes to.
    pub fn write_to(&self, writer: &mut WireWriter) {
        writer.write_bytes(self.prev_txid.as_bytes());
        writer.write_u32_le(self.prev_vout);
        writer.write_var_bytes(self.script_sig.to_bytes());
        writer.write_u32_le(self.sequence);
    }

    /// `true` once a signature script has been written.
    pub fn is_signed(&self) -> bool {
        !self.script_sig.is_empty()
    }
}

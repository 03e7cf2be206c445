//! Core transaction type.
//!
//! Represents a complete transaction with version, inputs, outputs and
//! locktime. Supports binary and hex serialization, transaction id
//! computation and builder-style methods for adding inputs and outputs.

use doge_primitives::chainhash::Hash;
use doge_primitives::util::{CompactSize, WireReader, WireWriter};
use doge_script::Script;

use crate::input::{TransactionInput, MIN_INPUT_LEN};
use crate::koinu::Koinu;
use crate::output::{TransactionOutput, MIN_OUTPUT_LEN};
use crate::sighash;
use crate::template::UnlockingScriptTemplate;
use crate::TransactionError;

/// A transaction consisting of a version, a set of inputs, a set of
/// outputs, and a lock time.
///
/// # Wire format
///
/// | Field        | Size                      |
/// |--------------|---------------------------|
/// | version      | 4 bytes (LE)              |
/// | input count  | compact size              |
/// | inputs       | variable (per input)      |
/// | output count | compact size              |
/// | outputs      | variable (per output)     |
/// | lock_time    | 4 bytes (LE)              |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Transaction format version. New transactions use 1.
    pub version: u32,

    /// Ordered list of transaction inputs.
    pub inputs: Vec<TransactionInput>,

    /// Ordered list of transaction outputs.
    pub outputs: Vec<TransactionOutput>,

    /// Lock time. Zero unless set explicitly.
    pub lock_time: u32,
}

impl Transaction {
    /// Create a new empty transaction with version 1 and lock time 0.
    ///
    /// # Returns
    /// A `Transaction` with no inputs or outputs.
    pub fn new() -> Self {
        Transaction {
            version: 1,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: 0,
        }
    }

    // -----------------------------------------------------------------
    // Deserialization
    // -----------------------------------------------------------------

    /// Parse a transaction from a hex-encoded string.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string of the raw transaction bytes.
    ///
    /// # Returns
    /// `Ok(Transaction)` on success, or a `TransactionError` if the hex is
    /// invalid or the bytes do not form a valid transaction.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str).map_err(|e| {
            TransactionError::SerializationError(format!("invalid hex: {}", e))
        })?;
        Self::from_bytes(&bytes)
    }

    /// Parse a transaction from raw bytes.
    ///
    /// The byte slice must contain exactly one complete transaction with
    /// no trailing data.
    ///
    /// # Arguments
    /// * `bytes` - The raw transaction bytes.
    ///
    /// # Returns
    /// `Ok(Transaction)` on success, or a `TransactionError` if the data
    /// is truncated, malformed, or has trailing bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = WireReader::new(bytes);
        let tx = Self::read_from(&mut reader)?;
        if reader.remaining() != 0 {
            return Err(TransactionError::SerializationError(
                format!("trailing {} bytes after transaction", reader.remaining()),
            ));
        }
        Ok(tx)
    }

    /// Deserialize a transaction from a `WireReader`.
    ///
    /// Counts are bounds-checked against the remaining input before any
    /// allocation, so a hostile count cannot force a huge reservation.
    ///
    /// # Arguments
    /// * `reader` - The reader positioned at the start of a serialized transaction.
    ///
    /// # Returns
    /// `Ok(Transaction)` on success, or a `TransactionError` on format errors.
    pub fn read_from(reader: &mut WireReader) -> Result<Self, TransactionError> {
        let version = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading version: {}", e))
        })?;

        let input_count = read_count(reader, MIN_INPUT_LEN, "input")?;
        let mut inputs = Vec::with_capacity(input_count);
        for _ in 0..input_count {
            inputs.push(TransactionInput::read_from(reader)?);
        }

        let output_count = read_count(reader, MIN_OUTPUT_LEN, "output")?;
        let mut outputs = Vec::with_capacity(output_count);
        for _ in 0..output_count {
            outputs.push(TransactionOutput::read_from(reader)?);
        }

        let lock_time = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading lock time: {}", e))
        })?;

        Ok(Transaction {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    // -----------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------

    /// Serialize this transaction to raw bytes.
    ///
    /// # Returns
    /// version(4) + compact(n_in) + inputs + compact(n_out) + outputs + locktime(4).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = WireWriter::with_capacity(256);
        writer.write_u32_le(self.version);

        writer.write_compact_size(CompactSize::from(self.inputs.len()));
        for input in &self.inputs {
            input.write_to(&mut writer);
        }

        writer.write_compact_size(CompactSize::from(self.outputs.len()));
        for output in &self.outputs {
            output.write_to(&mut writer);
        }

        writer.write_u32_le(self.lock_time);
        writer.into_bytes()
    }

    /// Serialize this transaction to a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Size of the serialized transaction in bytes.
    pub fn size(&self) -> usize {
        self.to_bytes().len()
    }

    // -----------------------------------------------------------------
    // Transaction ID
    // -----------------------------------------------------------------

    /// Compute the transaction id (double SHA-256 of the serialized bytes).
    ///
    /// The returned `Hash` displays in the conventional reversed order.
    pub fn txid(&self) -> Hash {
        Hash::double_sha256(&self.to_bytes())
    }

    // -----------------------------------------------------------------
    // Inputs
    // -----------------------------------------------------------------

    /// Append a `TransactionInput` to this transaction.
    pub fn add_input(&mut self, input: TransactionInput) {
        self.inputs.push(input);
    }

    /// Append an unsigned input spending `txid_hex:vout`.
    ///
    /// # Arguments
    /// * `txid_hex` - Display-order hex txid of the previous transaction.
    /// * `vout` - The output index being spent.
    ///
    /// # Returns
    /// `Ok(())` on success, or a `TransactionError` if the txid is invalid.
    pub fn add_input_from(&mut self, txid_hex: &str, vout: u32) -> Result<(), TransactionError> {
        self.inputs.push(TransactionInput::from_outpoint_hex(txid_hex, vout)?);
        Ok(())
    }

    /// Return the number of inputs in the transaction.
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    // -----------------------------------------------------------------
    // Outputs
    // -----------------------------------------------------------------

    /// Append a `TransactionOutput` to this transaction.
    pub fn add_output(&mut self, output: TransactionOutput) {
        self.outputs.push(output);
    }

    /// Return the number of outputs in the transaction.
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Compute the sum of all output values.
    ///
    /// # Returns
    /// The total, or `InvalidTransaction` if the sum overflows.
    pub fn total_output(&self) -> Result<Koinu, TransactionError> {
        self.outputs.iter().try_fold(Koinu::ZERO, |acc, o| {
            acc.checked_add(o.value).ok_or_else(|| {
                TransactionError::InvalidTransaction("output values overflow".to_string())
            })
        })
    }

    // -----------------------------------------------------------------
    // Signing
    // -----------------------------------------------------------------

    /// Compute the legacy signature hash for one input.
    ///
    /// # Arguments
    /// * `input_index` - Index of the input being signed.
    /// * `script_code` - Locking script of the output being spent.
    /// * `sighash_type` - The sighash flags (e.g. `SIGHASH_ALL`).
    ///
    /// # Returns
    /// The 32-byte digest to be signed by ECDSA.
    pub fn calc_input_signature_hash(
        &self,
        input_index: usize,
        script_code: &Script,
        sighash_type: u32,
    ) -> Result<[u8; 32], TransactionError> {
        sighash::signature_hash(self, input_index, script_code, sighash_type)
    }

    /// Sign one input with `template` and write its signature script.
    ///
    /// Any existing signature script on the input is replaced. On error the
    /// transaction is left unchanged.
    pub fn sign_input<T: UnlockingScriptTemplate>(
        &mut self,
        input_index: usize,
        template: &T,
    ) -> Result<(), TransactionError> {
        let script_sig = template.sign(self, input_index)?;
        let count = self.inputs.len();
        let input = self
            .inputs
            .get_mut(input_index)
            .ok_or(TransactionError::InputIndexOutOfRange { index: input_index, count })?;
        input.script_sig = script_sig;
        Ok(())
    }
}

/// Read an element count and reject counts the remaining bytes cannot hold.
fn read_count(
    reader: &mut WireReader,
    min_element_len: usize,
    what: &str,
) -> Result<usize, TransactionError> {
    let count = reader.read_compact_size().map_err(|e| {
        TransactionError::SerializationError(format!("reading {} count: {}", what, e))
    })?;
    let max = (reader.remaining() / min_element_len) as u64;
    if count.0 > max {
        return Err(TransactionError::SerializationError(format!(
            "{} count {} exceeds remaining data",
            what, count.0
        )));
    }
    Ok(count.0 as usize)
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Transaction {
    /// Display the transaction as its hex-encoded serialization.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

//! Signature hash computation for transaction signing.
//!
//! Dogecoin uses the legacy (pre-segwit, pre-forkid) digest: the whole
//! transaction is re-serialized with the signed input's script replaced
//! by the script code, then the 4-byte hash type is appended and the
//! result double-SHA256 hashed.

use doge_primitives::hash::sha256d;
use doge_primitives::util::WireWriter;
use doge_script::Script;

use crate::koinu::Koinu;
use crate::transaction::Transaction;
use crate::TransactionError;

// -----------------------------------------------------------------------
// Sighash flag constants
// -----------------------------------------------------------------------

/// Sign all inputs and all outputs (the default).
pub const SIGHASH_ALL: u32 = 0x01;

/// Sign all inputs but no outputs, allowing outputs to be modified.
pub const SIGHASH_NONE: u32 = 0x02;

/// Sign all inputs and only the output with the same index as the signed input.
pub const SIGHASH_SINGLE: u32 = 0x03;

/// Combined with another flag: only sign the current input, allowing other
/// inputs to be added later.
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;

/// Mask applied to extract the base sighash type (ALL, NONE, SINGLE).
pub const SIGHASH_MASK: u32 = 0x1f;

// -----------------------------------------------------------------------
// Legacy signature hash
// -----------------------------------------------------------------------

/// Compute the legacy signature hash for a given input.
///
/// # Arguments
/// * `tx`           - The transaction being signed.
/// * `input_index`  - Index of the input being signed.
/// * `script_code`  - The locking script of the output being spent.
/// * `sighash_type` - The sighash flags.
///
/// # Returns
/// A 32-byte double-SHA256 hash to be signed by ECDSA.
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    script_code: &Script,
    sighash_type: u32,
) -> Result<[u8; 32], TransactionError> {
    let preimage = calc_preimage(tx, input_index, script_code, sighash_type)?;
    let digest = sha256d(&preimage);
    log::trace!(
        "sighash input {} type {:#04x}: {}",
        input_index,
        sighash_type,
        hex::encode(digest)
    );
    Ok(digest)
}

/// Build the legacy pre-image bytes before double-hashing.
///
/// Works on a copy of `tx`:
/// 1. every signature script is cleared and the signed input gets
///    `script_code` with OP_CODESEPARATOR removed
/// 2. NONE drops all outputs and zeroes the other inputs' sequences
/// 3. SINGLE keeps outputs up to `input_index`, blanks the earlier ones
///    (value `-1`, empty script) and zeroes the other inputs' sequences
/// 4. ANYONECANPAY keeps only the signed input
/// 5. the copy is serialized and the hash type appended as 4 LE bytes
///
/// # Returns
/// The raw preimage, `InputIndexOutOfRange`, or `SighashSingleOutOfRange`
/// when SINGLE has no output at `input_index`.
pub fn calc_preimage(
    tx: &Transaction,
    input_index: usize,
    script_code: &Script,
    sighash_type: u32,
) -> Result<Vec<u8>, TransactionError> {
    if input_index >= tx.inputs.len() {
        return Err(TransactionError::InputIndexOutOfRange {
            index: input_index,
            count: tx.inputs.len(),
        });
    }

    let mut tmp = tx.clone();
    let code = script_code.without_code_separators()?;
    for (i, input) in tmp.inputs.iter_mut().enumerate() {
        input.script_sig = if i == input_index { code.clone() } else { Script::new() };
    }

    match sighash_type & SIGHASH_MASK {
        SIGHASH_NONE => {
            tmp.outputs.clear();
            zero_other_sequences(&mut tmp, input_index);
        }
        SIGHASH_SINGLE => {
            if input_index >= tmp.outputs.len() {
                return Err(TransactionError::SighashSingleOutOfRange {
                    index: input_index,
                    outputs: tmp.outputs.len(),
                });
            }
            tmp.outputs.truncate(input_index + 1);
            for output in tmp.outputs.iter_mut().take(input_index) {
                output.value = Koinu(u64::MAX);
                output.locking_script = Script::new();
            }
            zero_other_sequences(&mut tmp, input_index);
        }
        _ => {}
    }

    if sighash_type & SIGHASH_ANYONECANPAY != 0 {
        let signed = tmp.inputs.swap_remove(input_index);
        tmp.inputs = vec![signed];
    }

    let mut writer = WireWriter::with_capacity(256);
    writer.write_bytes(&tmp.to_bytes());
    writer.write_u32_le(sighash_type);
    Ok(writer.into_bytes())
}

fn zero_other_sequences(tx: &mut Transaction, input_index: usize) {
    for (i, input) in tx.inputs.iter_mut().enumerate() {
        if i != input_index {
            input.sequence = 0;
        }
    }
}

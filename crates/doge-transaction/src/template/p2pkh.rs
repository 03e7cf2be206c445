//! Pay-to-Public-Key-Hash (P2PKH) script template.
//!
//! Creates standard P2PKH locking scripts (`OP_DUP OP_HASH160 <hash>
//! OP_EQUALVERIFY OP_CHECKSIG`) and unlocking scripts (`<sig> <pubkey>`).

use doge_primitives::ec::PrivateKey;
use doge_script::{Address, Script};

use crate::sighash::SIGHASH_ALL;
use crate::template::UnlockingScriptTemplate;
use crate::transaction::Transaction;
use crate::TransactionError;

/// Create a P2PKH locking script paying `address`.
pub fn lock(address: &Address) -> Script {
    address.locking_script()
}

/// Create a P2PKH unlocker for signing transaction inputs.
///
/// # Arguments
/// * `private_key` - The private key used to sign.
/// * `script_code` - Locking script of the output being spent.
/// * `sighash_type` - Optional sighash type. Defaults to `SIGHASH_ALL`.
///
/// # Returns
/// A `P2PKH` instance implementing `UnlockingScriptTemplate`.
pub fn unlock(private_key: PrivateKey, script_code: Script, sighash_type: Option<u32>) -> P2PKH {
    P2PKH {
        private_key,
        script_code,
        sighash_type: sighash_type.unwrap_or(SIGHASH_ALL),
    }
}

/// P2PKH signing template holding a private key, the script code being
/// satisfied and the sighash type.
pub struct P2PKH {
    private_key: PrivateKey,
    script_code: Script,
    sighash_type: u32,
}

impl P2PKH {
    /// `true` if the key hashes to the hash inside the script code.
    pub fn key_matches_script(&self) -> bool {
        self.script_code
            .public_key_hash()
            .map(|h| h == self.private_key.public_key().hash160())
            .unwrap_or(false)
    }
}

impl UnlockingScriptTemplate for P2PKH {
    /// Sign the specified input and produce the unlocking script.
    ///
    /// The script code must be P2PKH. A key that does not match the hash in
    /// the script still signs; the mismatch is logged as a warning.
    ///
    /// # Returns
    /// `<DER_sig || sighash_byte> <compressed_pubkey>`.
    fn sign(&self, tx: &Transaction, input_index: usize) -> Result<Script, TransactionError> {
        if input_index >= tx.inputs.len() {
            return Err(TransactionError::InputIndexOutOfRange {
                index: input_index,
                count: tx.inputs.len(),
            });
        }
        if !self.script_code.is_p2pkh() {
            return Err(TransactionError::SigningError(format!(
                "script code {} is not P2PKH",
                self.script_code
            )));
        }
        if !self.key_matches_script() {
            log::warn!("signing input {} with a key that does not match its script", input_index);
        }

        let sig_hash = tx.calc_input_signature_hash(input_index, &self.script_code, self.sighash_type)?;
        let signature = self.private_key.sign(&sig_hash)?;
        let public_key = self.private_key.public_key();

        // Only the low byte of the hash type goes on the wire.
        Ok(Script::p2pkh_unlock(&signature, self.sighash_type as u8, &public_key)?)
    }
}

//! P2PKH input signing over raw hex and registry slots.
//!
//! Signatures use the legacy digest, which commits to neither input
//! amounts nor the previous output's value. Amounts passed to the signing
//! methods are only logged.

use log::{debug, warn};

use doge_primitives::ec::PrivateKey;
use doge_primitives::EccContext;
use doge_script::Script;
use doge_transaction::sighash::SIGHASH_ALL;
use doge_transaction::template::p2pkh;
use doge_transaction::Koinu;

use crate::config::EngineConfig;
use crate::registry::{decode_checked, Handle, Registry};
use crate::EngineError;

fn decode_key(wif: &str) -> Result<PrivateKey, EngineError> {
    PrivateKey::decode_wif(wif).map(|(key, _)| key).map_err(|e| {
        warn!("rejecting signing key: {}", e);
        EngineError::InvalidKey(e.to_string())
    })
}

/// Sign one input of a raw transaction.
///
/// # Arguments
/// * `config` - Supplies the maximum accepted hex length.
/// * `input_index` - Input to sign.
/// * `incoming_hex` - The transaction to sign.
/// * `script_hex` - P2PKH locking script of the output being spent.
/// * `sighash_type` - Sighash flags, usually `SIGHASH_ALL`.
/// * `wif` - Signing key as WIF of either network.
///
/// # Returns
/// The transaction hex with the input's signature script written.
pub fn sign_raw_transaction(
    config: &EngineConfig,
    input_index: usize,
    incoming_hex: &str,
    script_hex: &str,
    sighash_type: u32,
    wif: &str,
) -> Result<String, EngineError> {
    let mut tx = decode_checked(incoming_hex, config.max_hex_len)?;
    let script = Script::from_hex(script_hex)?;
    let key = decode_key(wif)?;
    let _ecc = EccContext::global().session();
    tx.sign_input(input_index, &p2pkh::unlock(key, script, Some(sighash_type)))?;
    debug!("signed raw input {} type {:#04x}", input_index, sighash_type);
    Ok(tx.to_hex())
}

impl Registry {
    /// Sign one input of the transaction under `handle`.
    ///
    /// # Arguments
    /// * `handle` - An open slot.
    /// * `input_index` - Input to sign.
    /// * `script_hex` - P2PKH locking script of the output being spent.
    /// * `sighash_type` - Sighash flags.
    /// * `amount` - Value of the spent output.
    /// * `wif` - Signing key.
    ///
    /// # Returns
    /// The updated transaction hex. On error the slot is unchanged.
    pub fn sign_input(
        &self,
        handle: Handle,
        input_index: usize,
        script_hex: &str,
        sighash_type: u32,
        amount: Koinu,
        wif: &str,
    ) -> Result<String, EngineError> {
        let script = Script::from_hex(script_hex)?;
        let key = decode_key(wif)?;
        let template = p2pkh::unlock(key, script, Some(sighash_type));
        let _ecc = EccContext::global().session();
        self.update(handle, |tx| {
            tx.sign_input(input_index, &template)?;
            debug!("transaction {}: signed input {} spending {}", handle, input_index, amount);
            Ok(tx.to_hex())
        })
    }

    /// Sign every input of the transaction under `handle` with
    /// `SIGHASH_ALL`, in index order.
    ///
    /// Either every input is signed or the slot is left unchanged.
    ///
    /// # Arguments
    /// * `handle` - An open slot.
    /// * `input_amounts` - One amount per input, by position.
    /// * `script_hex` - Locking script shared by all spent outputs.
    /// * `wif` - Signing key.
    pub fn sign_transaction(
        &self,
        handle: Handle,
        input_amounts: &[Koinu],
        script_hex: &str,
        wif: &str,
    ) -> Result<(), EngineError> {
        let script = Script::from_hex(script_hex)?;
        let key = decode_key(wif)?;
        let template = p2pkh::unlock(key, script, Some(SIGHASH_ALL));
        let _ecc = EccContext::global().session();
        self.update(handle, |tx| {
            if input_amounts.len() != tx.input_count() {
                return Err(EngineError::AmountCountMismatch {
                    inputs: tx.input_count(),
                    amounts: input_amounts.len(),
                });
            }
            for (index, amount) in input_amounts.iter().enumerate() {
                tx.sign_input(index, &template)?;
                debug!("transaction {}: signed input {} spending {}", handle, index, amount);
            }
            Ok(())
        })
    }

    /// Sign `incoming_hex` and store the result under an existing `handle`.
    ///
    /// # Returns
    /// The signed hex, which is also the slot's new content.
    pub fn sign_indexed_raw_transaction(
        &self,
        handle: Handle,
        input_index: usize,
        incoming_hex: &str,
        script_hex: &str,
        sighash_type: u32,
        wif: &str,
    ) -> Result<String, EngineError> {
        if !self.contains(handle) {
            return Err(EngineError::NoSuchTransaction(handle));
        }
        let signed =
            sign_raw_transaction(self.config(), input_index, incoming_hex, script_hex, sighash_type, wif)?;
        self.save(handle, &signed)?;
        Ok(signed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIF: &str = "ci5prbqz7jXyFPVWKkHhPq4a9N8Dag3TpeRfuqqC2Nfr7gSqx1fy";
    const SCRIPT: &str = "76a914d8c43e6f68ca4ea1e9b93da2d1e3a95118fa4a7c88ac";
    const SINGLE_UTXO: &str = "0100000001746007aed61e8531faba1af6610f10a5422c70a2a7eb6ffb51cb7a7b7b5e45b40100000000ffffffff0000000000";

    #[test]
    fn test_bad_key_is_invalid_key() {
        let config = EngineConfig::default();
        let bad = "ci5prbqz7jXyFPVWKkHhPq4a9N8Dag3TpeRfuqqC2Nfr7gSqx1fz";
        assert!(matches!(
            sign_raw_transaction(&config, 0, SINGLE_UTXO, SCRIPT, SIGHASH_ALL, bad),
            Err(EngineError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_index_out_of_range() {
        let config = EngineConfig::default();
        assert!(matches!(
            sign_raw_transaction(&config, 1, SINGLE_UTXO, SCRIPT, SIGHASH_ALL, WIF),
            Err(EngineError::Transaction(_))
        ));
    }

    #[test]
    fn test_amount_count_must_match() {
        let reg = Registry::new();
        let h = reg.store(SINGLE_UTXO).unwrap();
        assert!(matches!(
            reg.sign_transaction(h, &[], SCRIPT, WIF),
            Err(EngineError::AmountCountMismatch { inputs: 1, amounts: 0 })
        ));
        assert_eq!(reg.get(h).as_deref(), Some(SINGLE_UTXO));
    }

    #[test]
    fn test_indexed_requires_open_slot() {
        let reg = Registry::new();
        assert!(matches!(
            reg.sign_indexed_raw_transaction(4, 0, SINGLE_UTXO, SCRIPT, SIGHASH_ALL, WIF),
            Err(EngineError::NoSuchTransaction(4))
        ));
    }

    #[test]
    fn test_indexed_cleared_slot_rejected() {
        let reg = Registry::new();
        let h = reg.start();
        reg.clear(h);
        assert!(matches!(
            reg.sign_indexed_raw_transaction(h, 0, SINGLE_UTXO, SCRIPT, SIGHASH_ALL, WIF),
            Err(EngineError::NoSuchTransaction(_))
        ));
        assert_eq!(reg.get(h), None);
    }

    #[test]
    fn test_sign_input_sets_script() {
        let reg = Registry::new();
        let h = reg.store(SINGLE_UTXO).unwrap();
        let hex = reg.sign_input(h, 0, SCRIPT, SIGHASH_ALL, Koinu(1_000_000_000), WIF).unwrap();
        assert_eq!(reg.get(h), Some(hex));
        assert!(reg.transaction(h).unwrap().inputs[0].is_signed());
    }
}

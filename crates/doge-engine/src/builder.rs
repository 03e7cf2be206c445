//! Incremental transaction building on registry slots.

use log::{debug, warn};

use doge_script::Address;
use doge_transaction::{Koinu, TransactionOutput};

use crate::registry::{Handle, Registry};
use crate::EngineError;

impl Registry {
    /// Append an unsigned input spending `txid_hex:vout`.
    ///
    /// The outpoint is not checked against any chain.
    ///
    /// # Arguments
    /// * `handle` - An open slot.
    /// * `txid_hex` - Display-order hex txid of the previous transaction.
    /// * `vout` - Output index within that transaction.
    pub fn add_utxo(&self, handle: Handle, txid_hex: &str, vout: u32) -> Result<(), EngineError> {
        self.update(handle, |tx| {
            tx.add_input_from(txid_hex, vout)?;
            debug!("transaction {}: added input {}:{}", handle, txid_hex, vout);
            Ok(())
        })
    }

    /// Append an output paying `amount` coins to a P2PKH `address`.
    ///
    /// # Arguments
    /// * `handle` - An open slot.
    /// * `address` - Base58Check P2PKH address of either network.
    /// * `amount` - Decimal coin amount such as `"5"` or `"9.99887"`.
    pub fn add_output(&self, handle: Handle, address: &str, amount: &str) -> Result<(), EngineError> {
        let address = Address::from_string(address)?;
        let value = Koinu::from_coins_str(amount)?;
        self.update(handle, |tx| {
            tx.add_output(TransactionOutput::pay_to(&address, value));
            debug!("transaction {}: added output {} to {}", handle, value, address);
            Ok(())
        })
    }

    /// Add the change output and check the transaction balances.
    ///
    /// change = `total` - sum(outputs) - `fee`. A positive change is paid
    /// to `change_address`; zero change adds nothing. Afterwards the outputs
    /// must sum to exactly `total` - `fee` and at least one of them must be
    /// P2PKH.
    ///
    /// # Arguments
    /// * `handle` - An open slot.
    /// * `destination` - Address being paid. Selects the network the change
    ///   address must belong to.
    /// * `fee` - Decimal fee in coins.
    /// * `total` - Decimal sum of the spent inputs in coins.
    /// * `change_address` - Address receiving the change.
    ///
    /// # Returns
    /// The finalized transaction hex. On error the slot is unchanged.
    pub fn finalize(
        &self,
        handle: Handle,
        destination: &str,
        fee: &str,
        total: &str,
        change_address: &str,
    ) -> Result<String, EngineError> {
        let destination = Address::from_string(destination)?;
        let change_address = Address::from_string_for(change_address, destination.network)?;
        let fee = Koinu::from_coins_str(fee)?;
        let total = Koinu::from_coins_str(total)?;

        let result = self.update(handle, |tx| {
            let spent = tx.total_output()?;
            let required = spent.checked_add(fee).ok_or(EngineError::InsufficientFunds {
                available: total,
                required: Koinu(u64::MAX),
            })?;
            let change = total
                .checked_sub(required)
                .ok_or(EngineError::InsufficientFunds { available: total, required })?;

            if change > Koinu::ZERO {
                tx.add_output(TransactionOutput::pay_to(&change_address, change));
                debug!("transaction {}: change {} to {}", handle, change, change_address);
            }

            let expected = total
                .checked_sub(fee)
                .ok_or(EngineError::InsufficientFunds { available: total, required: fee })?;
            let actual = tx.total_output()?;
            if actual != expected {
                return Err(EngineError::OutputMismatch { expected, actual });
            }
            if !tx.outputs.iter().any(TransactionOutput::is_p2pkh) {
                return Err(EngineError::NoP2pkhOutput);
            }

            let target = destination.locking_script();
            if !tx.outputs.iter().any(|o| o.locking_script == target) {
                debug!("transaction {}: no output pays {}", handle, destination);
            }
            Ok(tx.to_hex())
        });

        if let Err(e) = &result {
            warn!("finalize of transaction {} failed: {}", handle, e);
        }
        result
    }
}

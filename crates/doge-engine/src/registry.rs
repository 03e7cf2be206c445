//! Handle-indexed store of in-progress transactions.
//!
//! Handles come from a counter that starts at 1 and only ever grows, so a
//! cleared handle is never handed out again and two consecutive `start`
//! calls always return consecutive integers. One mutex guards both the
//! counter and the slot map.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, warn};

use doge_transaction::Transaction;

use crate::config::EngineConfig;
use crate::EngineError;

/// Identifier of a workspace slot.
pub type Handle = u64;

struct Slots {
    next: Handle,
    txs: BTreeMap<Handle, Transaction>,
}

impl Slots {
    fn allocate(&mut self, tx: Transaction) -> Handle {
        let handle = self.next;
        self.next += 1;
        self.txs.insert(handle, tx);
        handle
    }
}

/// A set of workspace slots, each holding one transaction.
///
/// Every operation is linearizable. A failed operation never changes any
/// slot.
pub struct Registry {
    config: EngineConfig,
    inner: Mutex<Slots>,
}

impl Registry {
    /// Create an empty registry with the default config.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an empty registry with `config`.
    pub fn with_config(config: EngineConfig) -> Self {
        Registry {
            config,
            inner: Mutex::new(Slots { next: 1, txs: BTreeMap::new() }),
        }
    }

    /// The config this registry was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, Slots> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a slot holding an empty transaction.
    ///
    /// # Returns
    /// The new handle.
    pub fn start(&self) -> Handle {
        let handle = self.lock().allocate(Transaction::new());
        debug!("started transaction {}", handle);
        handle
    }

    /// Serialize the transaction under `handle`.
    ///
    /// # Returns
    /// The lowercase hex, or `None` for an unknown or cleared handle.
    pub fn get(&self, handle: Handle) -> Option<String> {
        self.lock().txs.get(&handle).map(Transaction::to_hex)
    }

    /// `true` if `handle` names an open slot.
    pub fn contains(&self, handle: Handle) -> bool {
        self.lock().txs.contains_key(&handle)
    }

    /// A copy of the transaction under `handle`.
    pub fn transaction(&self, handle: Handle) -> Option<Transaction> {
        self.lock().txs.get(&handle).cloned()
    }

    /// Display-order txid of the transaction under `handle`.
    pub fn txid(&self, handle: Handle) -> Option<String> {
        self.lock().txs.get(&handle).map(|tx| tx.txid().to_string())
    }

    /// Replace the transaction under an existing `handle` with `hex`.
    ///
    /// # Arguments
    /// * `handle` - An open slot.
    /// * `hex` - Raw transaction hex, at most `max_hex_len` characters.
    ///
    /// # Returns
    /// `Ok(())` once the slot holds the decoded transaction. On any error
    /// the slot keeps its previous content.
    pub fn save(&self, handle: Handle, hex: &str) -> Result<(), EngineError> {
        let tx = decode_checked(hex, self.config.max_hex_len)?;
        let mut slots = self.lock();
        let slot = slots.txs.get_mut(&handle).ok_or(EngineError::NoSuchTransaction(handle))?;
        *slot = tx;
        debug!("saved transaction {} ({} hex chars)", handle, hex.len());
        Ok(())
    }

    /// Decode `hex` into a newly opened slot.
    ///
    /// The hex is decoded before a handle is allocated, so a rejected
    /// input consumes no handle.
    pub fn store(&self, hex: &str) -> Result<Handle, EngineError> {
        let tx = decode_checked(hex, self.config.max_hex_len)?;
        let handle = self.lock().allocate(tx);
        debug!("stored transaction {} ({} hex chars)", handle, hex.len());
        Ok(handle)
    }

    /// Remove the slot under `handle`.
    ///
    /// Clearing an unknown or already cleared handle does nothing.
    ///
    /// # Returns
    /// `true` if a slot was removed.
    pub fn clear(&self, handle: Handle) -> bool {
        let removed = self.lock().txs.remove(&handle).is_some();
        if removed {
            debug!("cleared transaction {}", handle);
        }
        removed
    }

    /// Remove every slot. The handle counter keeps counting.
    pub fn remove_all(&self) {
        let mut slots = self.lock();
        debug!("removing {} transactions", slots.txs.len());
        slots.txs.clear();
    }

    /// Number of open slots.
    pub fn count(&self) -> usize {
        self.lock().txs.len()
    }

    /// Open handles in ascending order.
    pub fn handles(&self) -> Vec<Handle> {
        self.lock().txs.keys().copied().collect()
    }

    /// Apply `f` to a copy of the transaction under `handle` and commit
    /// the copy only if `f` succeeds.
    pub(crate) fn update<T, F>(&self, handle: Handle, f: F) -> Result<T, EngineError>
    where
        F: FnOnce(&mut Transaction) -> Result<T, EngineError>,
    {
        let mut slots = self.lock();
        let slot = slots.txs.get_mut(&handle).ok_or(EngineError::NoSuchTransaction(handle))?;
        let mut working = slot.clone();
        let out = f(&mut working)?;
        *slot = working;
        Ok(out)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode raw transaction hex after checking its length.
pub(crate) fn decode_checked(hex: &str, max_hex_len: usize) -> Result<Transaction, EngineError> {
    if hex.len() > max_hex_len {
        warn!("rejecting {} hex chars (max {})", hex.len(), max_hex_len);
        return Err(EngineError::HexTooLong { len: hex.len(), max: max_hex_len });
    }
    Ok(Transaction::from_hex(hex)?)
}

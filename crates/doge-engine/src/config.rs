//! Engine configuration.

use doge_primitives::Network;
use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Longest hex transaction accepted by `store`, `save` and raw signing.
pub const DEFAULT_MAX_HEX_LEN: usize = 100 * 1024;

/// Settings shared by every operation of a `Registry`.
///
/// Missing fields take their default when loaded from JSON, so
/// `{"default_network": "mainnet"}` is a complete config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum hex length of an incoming transaction.
    pub max_hex_len: usize,
    /// Network used when generating keys without an explicit network.
    pub default_network: Network,
}

impl EngineConfig {
    /// Load a config from JSON text.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize this config to JSON text.
    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_hex_len: DEFAULT_MAX_HEX_LEN,
            default_network: Network::Testnet,
        }
    }
}

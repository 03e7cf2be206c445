/// P2PKH address handling.
///
/// Parses and encodes Base58Check pay-to-public-key-hash addresses and
/// maps their version byte to a `Network` ('D' on mainnet, 'n' on testnet).

use std::fmt;
use std::str::FromStr;

use doge_primitives::base58;
use doge_primitives::ec::PublicKey;
use doge_primitives::{Network, PrimitivesError};

use crate::script::Script;
use crate::ScriptError;

/// Decoded payload length: version byte + 20-byte hash.
const PAYLOAD_LEN: usize = 21;

/// A P2PKH address.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address {
    /// The Base58Check text.
    pub address_string: String,
    /// Hash160 of the compressed public key.
    pub public_key_hash: [u8; 20],
    /// The network the version byte belongs to.
    pub network: Network,
}

impl Address {
    /// Parse a Base58Check P2PKH address.
    ///
    /// # Arguments
    /// * `addr` - Address text.
    ///
    /// # Returns
    /// The address, or `InvalidAddress` (bad characters),
    /// `EncodingChecksumFailed`, `InvalidAddressLength`, or
    /// `UnsupportedAddress` for an unknown version byte.
    pub fn from_string(addr: &str) -> Result<Self, ScriptError> {
        let payload = base58::check_decode(addr).map_err(|e| match e {
            PrimitivesError::ChecksumMismatch => ScriptError::EncodingChecksumFailed,
            _ => ScriptError::InvalidAddress(format!("bad encoding for '{}'", addr)),
        })?;
        if payload.len() != PAYLOAD_LEN {
            return Err(ScriptError::InvalidAddressLength(addr.to_string()));
        }
        let network = Network::from_p2pkh_version(payload[0])
            .ok_or_else(|| ScriptError::UnsupportedAddress(addr.to_string()))?;
        let mut public_key_hash = [0u8; 20];
        public_key_hash.copy_from_slice(&payload[1..]);
        Ok(Address { address_string: addr.to_string(), public_key_hash, network })
    }

    /// Parse an address and require it to belong to `network`.
    pub fn from_string_for(addr: &str, network: Network) -> Result<Self, ScriptError> {
        let parsed = Self::from_string(addr)?;
        if parsed.network != network {
            return Err(ScriptError::WrongNetwork { address: addr.to_string(), expected: network });
        }
        Ok(parsed)
    }

    /// Build an address from a public key hash.
    ///
    /// # Arguments
    /// * `hash` - Hash160 of the public key.
    /// * `network` - Selects the version byte.
    pub fn from_public_key_hash(hash: &[u8; 20], network: Network) -> Self {
        let mut payload = Vec::with_capacity(PAYLOAD_LEN);
        payload.push(network.params().p2pkh_version);
        payload.extend_from_slice(hash);
        Address {
            address_string: base58::check_encode(&payload),
            public_key_hash: *hash,
            network,
        }
    }

    /// Build the address of a public key (compressed form).
    pub fn from_public_key(key: &PublicKey, network: Network) -> Self {
        Self::from_public_key_hash(&key.hash160(), network)
    }

    /// The P2PKH locking script paying this address.
    pub fn locking_script(&self) -> Script {
        Script::p2pkh_lock(&self.public_key_hash)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address_string)
    }
}

impl FromStr for Address {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::from_string(s)
    }
}

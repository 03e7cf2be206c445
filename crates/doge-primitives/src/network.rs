//! Dogecoin network chain parameters.
//!
//! Each network carries the version bytes used when encoding addresses,
//! WIF private keys and BIP32 extended keys. Everything that is
//! network-dependent takes a `Network` value rather than a boolean flag.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::PrimitivesError;

/// Version bytes and prefixes for one network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainParams {
    /// Short network name ("main", "testnet3").
    pub name: &'static str,
    /// Version byte of P2PKH addresses.
    pub p2pkh_version: u8,
    /// Version byte of P2SH addresses.
    pub p2sh_version: u8,
    /// Leading byte of WIF-encoded private keys.
    pub wif_prefix: u8,
    /// BIP32 version of serialized extended private keys.
    pub bip32_private: u32,
    /// BIP32 version of serialized extended public keys.
    pub bip32_public: u32,
}

const MAINNET_PARAMS: ChainParams = ChainParams {
    name: "main",
    p2pkh_version: 0x1e,          // 'D'
    p2sh_version: 0x16,           // '9' or 'A'
    wif_prefix: 0x9e,             // 'Q' when compressed
    bip32_private: 0x02fa_c398,   // "dgpv"
    bip32_public: 0x02fa_cafd,    // "dgub"
};

const TESTNET_PARAMS: ChainParams = ChainParams {
    name: "testnet3",
    p2pkh_version: 0x71,          // 'n'
    p2sh_version: 0xc4,           // '2'
    wif_prefix: 0xf1,             // 'c' when compressed
    bip32_private: 0x0435_8394,   // "tprv"
    bip32_public: 0x0435_87cf,    // "tpub"
};

/// A Dogecoin network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Dogecoin mainnet.
    Mainnet,
    /// Dogecoin testnet.
    Testnet,
}

impl Network {
    /// All supported networks, mainnet first.
    pub const ALL: [Network; 2] = [Network::Mainnet, Network::Testnet];

    /// Return the chain parameters of this network.
    pub fn params(&self) -> &'static ChainParams {
        match self {
            Network::Mainnet => &MAINNET_PARAMS,
            Network::Testnet => &TESTNET_PARAMS,
        }
    }

    /// Find the network whose P2PKH version byte is `version`.
    pub fn from_p2pkh_version(version: u8) -> Option<Network> {
        Self::ALL.into_iter().find(|n| n.params().p2pkh_version == version)
    }

    /// Find the network whose WIF prefix is `prefix`.
    pub fn from_wif_prefix(prefix: u8) -> Option<Network> {
        Self::ALL.into_iter().find(|n| n.params().wif_prefix == prefix)
    }

    /// Find the network and key kind for a BIP32 version field.
    ///
    /// # Returns
    /// `(network, is_private)`, or `None` for an unknown version.
    pub fn from_bip32_version(version: u32) -> Option<(Network, bool)> {
        Self::ALL.into_iter().find_map(|n| {
            let p = n.params();
            if p.bip32_private == version {
                Some((n, true))
            } else if p.bip32_public == version {
                Some((n, false))
            } else {
                None
            }
        })
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}

impl FromStr for Network {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(Network::Mainnet),
            "testnet" | "testnet3" | "test" => Ok(Network::Testnet),
            other => Err(PrimitivesError::UnknownNetwork(other.to_string())),
        }
    }
}

//! BIP32 hierarchical deterministic keys.
//!
//! Master key generation from a seed, private and public child derivation,
//! derivation-path parsing and the 78-byte Base58Check serialization with
//! per-network version bytes ("dgpv"/"dgub" on mainnet, "tprv"/"tpub" on
//! testnet).

use std::fmt;
use std::str::FromStr;

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

use crate::base58;
use crate::ec::{PrivateKey, PublicKey};
use crate::hash::{hash160, hmac_sha512};
use crate::network::Network;
use crate::PrimitivesError;

/// First hardened child index.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Length of a serialized extended key before the checksum.
const SERIALIZED_LEN: usize = 78;

/// HMAC key used to derive the master node from a seed.
const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// Seed length used by `ExtendedKey::generate_master`.
pub const DEFAULT_SEED_LEN: usize = 32;

// ---------------------------------------------------------------------------
// ChildNumber / DerivationPath
// ---------------------------------------------------------------------------

/// One step of a derivation path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChildNumber {
    /// Non-hardened index below 2^31.
    Normal(u32),
    /// Hardened index; stored without the 2^31 offset.
    Hardened(u32),
}

impl ChildNumber {
    /// The raw 32-bit index, with the hardened offset applied.
    pub fn to_index(self) -> u32 {
        match self {
            ChildNumber::Normal(i) => i,
            ChildNumber::Hardened(i) => i | HARDENED_OFFSET,
        }
    }

    /// Interpret a raw 32-bit index.
    pub fn from_index(index: u32) -> Self {
        if index & HARDENED_OFFSET != 0 {
            ChildNumber::Hardened(index & !HARDENED_OFFSET)
        } else {
            ChildNumber::Normal(index)
        }
    }

    /// `true` for hardened steps.
    pub fn is_hardened(self) -> bool {
        matches!(self, ChildNumber::Hardened(_))
    }
}

impl fmt::Display for ChildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildNumber::Normal(i) => write!(f, "{}", i),
            ChildNumber::Hardened(i) => write!(f, "{}'", i),
        }
    }
}

/// A derivation path such as `m/44'/3'/0'/0/5`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DerivationPath(Vec<ChildNumber>);

impl DerivationPath {
    /// The BIP44 path `m/44'/3'/account'/change/index` (coin type 3).
    ///
    /// # Arguments
    /// * `account` - Account number (hardened).
    /// * `is_change` - `true` for the internal (change) chain.
    /// * `index` - Address index within the chain.
    pub fn bip44(account: u32, is_change: bool, index: u32) -> Self {
        DerivationPath(vec![
            ChildNumber::Hardened(44),
            ChildNumber::Hardened(3),
            ChildNumber::Hardened(account),
            ChildNumber::Normal(is_change as u32),
            ChildNumber::Normal(index),
        ])
    }

    /// The steps of this path, root first.
    pub fn steps(&self) -> &[ChildNumber] {
        &self.0
    }
}

impl FromStr for DerivationPath {
    type Err = PrimitivesError;

    /// Parse `m` followed by `/`-separated indexes; `'`, `h` or `H` marks a
    /// hardened step.
    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let mut parts = path.split('/');
        if parts.next() != Some("m") {
            return Err(PrimitivesError::InvalidDerivationPath(format!(
                "'{}' must start with m",
                path
            )));
        }
        let mut steps = Vec::new();
        for part in parts {
            let (digits, hardened) = match part.strip_suffix(&['\'', 'h', 'H'][..]) {
                Some(rest) => (rest, true),
                None => (part, false),
            };
            let index: u32 = digits.parse().map_err(|_| {
                PrimitivesError::InvalidDerivationPath(format!("bad index '{}' in '{}'", part, path))
            })?;
            if index >= HARDENED_OFFSET {
                return Err(PrimitivesError::InvalidDerivationPath(format!(
                    "index {} out of range in '{}'",
                    index, path
                )));
            }
            steps.push(if hardened {
                ChildNumber::Hardened(index)
            } else {
                ChildNumber::Normal(index)
            });
        }
        Ok(DerivationPath(steps))
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for step in &self.0 {
            write!(f, "/{}", step)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ExtendedKey
// ---------------------------------------------------------------------------

/// Key material of an extended key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyMaterial {
    /// An extended private key.
    Private(PrivateKey),
    /// An extended public key.
    Public(PublicKey),
}

/// A BIP32 node: key material plus chain code and position metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedKey {
    network: Network,
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_number: u32,
    chain_code: [u8; 32],
    key: KeyMaterial,
}

impl ExtendedKey {
    /// Derive the master node from seed bytes.
    ///
    /// # Arguments
    /// * `seed` - 16 to 64 bytes of seed entropy.
    /// * `network` - Network whose version bytes are used on serialization.
    ///
    /// # Returns
    /// The master private node, or `InvalidPrivateKey` for the
    /// (astronomically unlikely) seed that yields an invalid key.
    pub fn from_seed(seed: &[u8], network: Network) -> Result<Self, PrimitivesError> {
        if !(16..=64).contains(&seed.len()) {
            return Err(PrimitivesError::InvalidKeyLength { expected: DEFAULT_SEED_LEN, got: seed.len() });
        }
        let mut i = hmac_sha512(MASTER_HMAC_KEY, seed);
        let key = PrivateKey::from_bytes(&i[..32]);
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&i[32..]);
        i.zeroize();
        Ok(ExtendedKey {
            network,
            depth: 0,
            parent_fingerprint: [0; 4],
            child_number: 0,
            chain_code,
            key: KeyMaterial::Private(key?),
        })
    }

    /// Generate a master node from a fresh random 32-byte seed.
    pub fn generate_master(network: Network) -> Self {
        let mut seed = [0u8; DEFAULT_SEED_LEN];
        loop {
            OsRng.fill_bytes(&mut seed);
            if let Ok(master) = Self::from_seed(&seed, network) {
                seed.zeroize();
                return master;
            }
        }
    }

    /// The network this node serializes for.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Depth below the master node.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Raw child index this node was derived with.
    pub fn child_number(&self) -> ChildNumber {
        ChildNumber::from_index(self.child_number)
    }

    /// `true` if the node carries a private key.
    pub fn is_private(&self) -> bool {
        matches!(self.key, KeyMaterial::Private(_))
    }

    /// The private key, if present.
    pub fn private_key(&self) -> Option<&PrivateKey> {
        match &self.key {
            KeyMaterial::Private(k) => Some(k),
            KeyMaterial::Public(_) => None,
        }
    }

    /// The node's public key.
    pub fn public_key(&self) -> PublicKey {
        match &self.key {
            KeyMaterial::Private(k) => k.public_key(),
            KeyMaterial::Public(k) => k.clone(),
        }
    }

    /// First four bytes of Hash160 of the public key.
    pub fn fingerprint(&self) -> [u8; 4] {
        let h = hash160(&self.public_key().to_compressed());
        [h[0], h[1], h[2], h[3]]
    }

    /// Return the public-only counterpart of this node.
    pub fn neuter(&self) -> ExtendedKey {
        ExtendedKey { key: KeyMaterial::Public(self.public_key()), ..self.clone() }
    }

    /// Derive one child.
    ///
    /// # Arguments
    /// * `child` - Normal or hardened step.
    ///
    /// # Returns
    /// The child node. Hardened derivation from a public node fails with
    /// `HardenedFromPublic`; an invalid intermediate key fails with
    /// `InvalidChild`.
    pub fn derive_child(&self, child: ChildNumber) -> Result<ExtendedKey, PrimitivesError> {
        let index = child.to_index();
        let mut data = Vec::with_capacity(37);
        match (&self.key, child.is_hardened()) {
            (KeyMaterial::Private(k), true) => {
                data.push(0);
                data.extend_from_slice(&k.to_bytes());
            }
            (KeyMaterial::Public(_), true) => {
                return Err(PrimitivesError::HardenedFromPublic(index & !HARDENED_OFFSET));
            }
            _ => data.extend_from_slice(&self.public_key().to_compressed()),
        }
        data.extend_from_slice(&index.to_be_bytes());

        let mut i = hmac_sha512(&self.chain_code, &data);
        data.zeroize();
        let mut tweak = [0u8; 32];
        tweak.copy_from_slice(&i[..32]);
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&i[32..]);
        i.zeroize();

        // IL must itself be a valid scalar.
        let valid_tweak = PrivateKey::from_bytes(&tweak).is_ok();
        let key = if !valid_tweak {
            Err(PrimitivesError::InvalidChild(index))
        } else {
            match &self.key {
                KeyMaterial::Private(k) => k
                    .add_tweak(&tweak)
                    .map(KeyMaterial::Private)
                    .map_err(|_| PrimitivesError::InvalidChild(index)),
                KeyMaterial::Public(k) => k
                    .add_tweak(&tweak)
                    .map(KeyMaterial::Public)
                    .map_err(|_| PrimitivesError::InvalidChild(index)),
            }
        };
        tweak.zeroize();

        Ok(ExtendedKey {
            network: self.network,
            depth: self.depth.wrapping_add(1),
            parent_fingerprint: self.fingerprint(),
            child_number: index,
            chain_code,
            key: key?,
        })
    }

    /// Derive along every step of `path`.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<ExtendedKey, PrimitivesError> {
        path.steps()
            .iter()
            .try_fold(self.clone(), |node, step| node.derive_child(*step))
    }

    /// Serialize to Base58Check.
    ///
    /// # Returns
    /// "dgpv.../dgub..." on mainnet, "tprv.../tpub..." on testnet,
    /// depending on whether the node holds a private key.
    pub fn to_base58(&self) -> String {
        let params = self.network.params();
        let mut raw = Vec::with_capacity(SERIALIZED_LEN);
        let version = if self.is_private() { params.bip32_private } else { params.bip32_public };
        raw.extend_from_slice(&version.to_be_bytes());
        raw.push(self.depth);
        raw.extend_from_slice(&self.parent_fingerprint);
        raw.extend_from_slice(&self.child_number.to_be_bytes());
        raw.extend_from_slice(&self.chain_code);
        match &self.key {
            KeyMaterial::Private(k) => {
                raw.push(0);
                raw.extend_from_slice(&k.to_bytes());
            }
            KeyMaterial::Public(k) => raw.extend_from_slice(&k.to_compressed()),
        }
        let out = base58::check_encode(&raw);
        raw.zeroize();
        out
    }

    /// Parse a Base58Check extended key, inferring the network from its
    /// version bytes.
    ///
    /// # Returns
    /// The node, or `InvalidExtendedKey` for a wrong length, an unknown
    /// version, or malformed key data.
    pub fn from_base58(text: &str) -> Result<Self, PrimitivesError> {
        let mut raw = base58::check_decode(text)?;
        let parsed = Self::parse_raw(&raw);
        raw.zeroize();
        parsed
    }

    fn parse_raw(raw: &[u8]) -> Result<Self, PrimitivesError> {
        if raw.len() != SERIALIZED_LEN {
            return Err(PrimitivesError::InvalidExtendedKey(format!(
                "expected {} bytes, got {}",
                SERIALIZED_LEN,
                raw.len()
            )));
        }
        let version = u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]);
        let (network, is_private) = Network::from_bip32_version(version).ok_or_else(|| {
            PrimitivesError::InvalidExtendedKey(format!("unknown version {:#010x}", version))
        })?;
        let depth = raw[4];
        let parent_fingerprint = [raw[5], raw[6], raw[7], raw[8]];
        let child_number = u32::from_be_bytes([raw[9], raw[10], raw[11], raw[12]]);
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&raw[13..45]);
        let key_data = &raw[45..];
        let key = if is_private {
            if key_data[0] != 0 {
                return Err(PrimitivesError::InvalidExtendedKey(
                    "private key data must start with 0x00".to_string(),
                ));
            }
            KeyMaterial::Private(PrivateKey::from_bytes(&key_data[1..])?)
        } else {
            KeyMaterial::Public(PublicKey::from_bytes(key_data)?)
        };
        Ok(ExtendedKey { network, depth, parent_fingerprint, child_number, chain_code, key })
    }
}

impl fmt::Display for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl FromStr for ExtendedKey {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExtendedKey::from_base58(s)
    }
}

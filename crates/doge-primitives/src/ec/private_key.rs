//! secp256k1 private key with WIF encoding.
//!
//! Wraps the k256 signing key and adds network-tagged Wallet Import Format
//! encoding. Only the compressed WIF form (prefix, 32-byte key, `0x01`
//! flag, checksum) is produced or accepted.

use k256::ecdsa::SigningKey;
use k256::elliptic_curve::ops::Reduce;
use k256::{Scalar, U256};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

use crate::base58;
use crate::ec::public_key::PublicKey;
use crate::ec::signature::Signature;
use crate::network::Network;
use crate::PrimitivesError;

/// Length of a serialized private key scalar.
pub const PRIVATE_KEY_LEN: usize = 32;

/// Flag byte marking a WIF key whose public key is used compressed.
const COMPRESSED_FLAG: u8 = 0x01;

/// Decoded WIF payload length: prefix + key + compression flag.
const WIF_PAYLOAD_LEN: usize = 1 + PRIVATE_KEY_LEN + 1;

/// A secp256k1 private key.
#[derive(Clone)]
pub struct PrivateKey {
    inner: SigningKey,
}

impl PrivateKey {
    /// Generate a random private key.
    ///
    /// Draws 32 bytes from the OS random source and retries while the value
    /// is zero or not below the curve order.
    ///
    /// # Returns
    /// A new `PrivateKey`.
    pub fn generate() -> Self {
        let mut bytes = [0u8; PRIVATE_KEY_LEN];
        loop {
            OsRng.fill_bytes(&mut bytes);
            if let Ok(key) = Self::from_bytes(&bytes) {
                bytes.zeroize();
                return key;
            }
        }
    }

    /// Create a private key from a 32-byte big-endian scalar.
    ///
    /// # Arguments
    /// * `bytes` - The scalar bytes.
    ///
    /// # Returns
    /// The key, or `InvalidPrivateKey` if the length is wrong or the scalar
    /// is zero or out of range.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != PRIVATE_KEY_LEN {
            return Err(PrimitivesError::InvalidKeyLength {
                expected: PRIVATE_KEY_LEN,
                got: bytes.len(),
            });
        }
        let inner = SigningKey::from_slice(bytes)
            .map_err(|e| PrimitivesError::InvalidPrivateKey(e.to_string()))?;
        Ok(PrivateKey { inner })
    }

    /// Create a private key from a 64-character hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let mut bytes = hex::decode(hex_str)?;
        let key = Self::from_bytes(&bytes);
        bytes.zeroize();
        key
    }

    /// Decode a WIF string and report the network it belongs to.
    ///
    /// # Arguments
    /// * `wif` - Base58Check WIF text.
    ///
    /// # Returns
    /// `(key, network)` on success. Fails with `InvalidBase58`,
    /// `ChecksumMismatch`, `InvalidWif` (wrong length or missing
    /// compression flag) or `UnknownWifPrefix`.
    pub fn decode_wif(wif: &str) -> Result<(Self, Network), PrimitivesError> {
        let mut payload = base58::check_decode(wif)?;
        if payload.len() != WIF_PAYLOAD_LEN {
            let len = payload.len();
            payload.zeroize();
            return Err(PrimitivesError::InvalidWif(format!(
                "expected {} payload bytes, got {}",
                WIF_PAYLOAD_LEN, len
            )));
        }
        if payload[WIF_PAYLOAD_LEN - 1] != COMPRESSED_FLAG {
            payload.zeroize();
            return Err(PrimitivesError::InvalidWif(
                "missing compression flag".to_string(),
            ));
        }
        let prefix = payload[0];
        let key = Self::from_bytes(&payload[1..1 + PRIVATE_KEY_LEN]);
        payload.zeroize();
        let network =
            Network::from_wif_prefix(prefix).ok_or(PrimitivesError::UnknownWifPrefix(prefix))?;
        Ok((key?, network))
    }

    /// Decode a WIF string that must belong to `network`.
    ///
    /// # Returns
    /// The key, or `UnknownWifPrefix` if the prefix is for another network.
    pub fn from_wif(wif: &str, network: Network) -> Result<Self, PrimitivesError> {
        let (key, found) = Self::decode_wif(wif)?;
        if found != network {
            return Err(PrimitivesError::UnknownWifPrefix(found.params().wif_prefix));
        }
        Ok(key)
    }

    /// Encode as compressed WIF for `network`.
    ///
    /// # Arguments
    /// * `network` - Selects the WIF prefix byte.
    ///
    /// # Returns
    /// Base58Check text ("Q..." on mainnet, "c..." on testnet).
    pub fn to_wif(&self, network: Network) -> String {
        let mut payload = Vec::with_capacity(WIF_PAYLOAD_LEN);
        payload.push(network.params().wif_prefix);
        payload.extend_from_slice(&self.to_bytes());
        payload.push(COMPRESSED_FLAG);
        let wif = base58::check_encode(&payload);
        payload.zeroize();
        wif
    }

    /// Serialize as a 32-byte big-endian scalar.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.inner.to_bytes().into()
    }

    /// Serialize as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Derive the corresponding public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_verifying_key(*self.inner.verifying_key())
    }

    /// Sign a 32-byte digest with a deterministic, low-S signature.
    pub fn sign(&self, digest: &[u8; 32]) -> Result<Signature, PrimitivesError> {
        Signature::sign(digest, self)
    }

    /// Add `tweak` to this key modulo the curve order.
    ///
    /// # Returns
    /// The tweaked key, or `InvalidPrivateKey` if the result is zero.
    pub fn add_tweak(&self, tweak: &[u8; 32]) -> Result<PrivateKey, PrimitivesError> {
        let sum = self.to_scalar() + scalar_from_bytes(tweak);
        Self::from_bytes(&sum.to_bytes())
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.inner
    }

    pub(crate) fn to_scalar(&self) -> Scalar {
        *self.inner.as_nonzero_scalar().as_ref()
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey").finish_non_exhaustive()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PrivateKey {}

/// Interpret 32 big-endian bytes as a scalar, reducing modulo the order.
pub(crate) fn scalar_from_bytes(bytes: &[u8; 32]) -> Scalar {
    <Scalar as Reduce<U256>>::reduce(U256::from_be_slice(bytes))
}

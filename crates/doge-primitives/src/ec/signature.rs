//! ECDSA signatures with DER serialization.
//!
//! Signing uses RFC6979 deterministic nonces over a 32-byte prehashed
//! digest and always yields the low-S form, so the same key and digest
//! produce byte-identical DER output.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa;

use crate::ec::private_key::PrivateKey;
use crate::ec::public_key::PublicKey;
use crate::PrimitivesError;

/// An ECDSA signature over secp256k1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    inner: ecdsa::Signature,
}

impl Signature {
    /// Sign a 32-byte digest.
    ///
    /// # Arguments
    /// * `digest` - The prehashed message, e.g. a transaction sighash.
    /// * `key` - The signing key.
    ///
    /// # Returns
    /// A low-S signature, or `InvalidSignature` if signing fails.
    pub fn sign(digest: &[u8; 32], key: &PrivateKey) -> Result<Self, PrimitivesError> {
        let sig: ecdsa::Signature = key
            .signing_key()
            .sign_prehash(digest)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;
        Ok(Signature { inner: sig.normalize_s().unwrap_or(sig) })
    }

    /// Verify against a 32-byte digest and public key.
    pub fn verify(&self, digest: &[u8; 32], key: &PublicKey) -> bool {
        key.verifying_key().verify_prehash(digest, &self.inner).is_ok()
    }

    /// Parse a DER-encoded signature.
    ///
    /// # Arguments
    /// * `bytes` - `0x30 len 0x02 rlen r 0x02 slen s`, without a sighash byte.
    ///
    /// # Returns
    /// The signature, or `InvalidSignature` on malformed DER or out-of-range
    /// components.
    pub fn from_der(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let inner = ecdsa::Signature::from_der(bytes)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;
        Ok(Signature { inner })
    }

    /// Serialize as minimal DER.
    pub fn to_der(&self) -> Vec<u8> {
        self.inner.to_der().as_bytes().to_vec()
    }

    /// `true` if S is in the lower half of the curve order.
    pub fn is_low_s(&self) -> bool {
        self.inner.normalize_s().is_none()
    }
}

/// Script type: the locking and unlocking programs carried by transaction
/// outputs and inputs.
///
/// Only standard pay-to-public-key-hash scripts are built here, but any
/// byte sequence round-trips unchanged through the codec.

use std::fmt;

use doge_primitives::ec::{PublicKey, Signature};

use crate::chunk::{decode_script, push_data_prefix, ScriptChunk};
use crate::opcodes::*;
use crate::ScriptError;

/// Length of a standard P2PKH locking script.
pub const P2PKH_SCRIPT_LEN: usize = 25;

/// A script, represented as a byte vector newtype.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Script(Vec<u8>);

impl Script {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Create an empty script.
    pub fn new() -> Self {
        Script(Vec::new())
    }

    /// Create a script from a hex string.
    ///
    /// # Arguments
    /// * `hex_str` - e.g. "76a914...88ac".
    ///
    /// # Returns
    /// The script, or `InvalidHex`.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        let bytes = hex::decode(hex_str).map_err(|e| ScriptError::InvalidHex(e.to_string()))?;
        Ok(Script(bytes))
    }

    /// Create a script from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }

    /// Build the P2PKH locking script for a public key hash.
    ///
    /// # Arguments
    /// * `pubkey_hash` - Hash160 of a compressed public key.
    ///
    /// # Returns
    /// `OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG`.
    pub fn p2pkh_lock(pubkey_hash: &[u8; 20]) -> Self {
        let mut b = Vec::with_capacity(P2PKH_SCRIPT_LEN);
        b.extend_from_slice(&[OP_DUP, OP_HASH160, OP_DATA_20]);
        b.extend_from_slice(pubkey_hash);
        b.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
        Script(b)
    }

    /// Build the P2PKH unlocking script.
    ///
    /// # Arguments
    /// * `signature` - The DER signature.
    /// * `sighash_byte` - Low byte of the sighash type, appended to the DER.
    /// * `public_key` - Pushed in compressed form.
    ///
    /// # Returns
    /// `push(der || sighash_byte) push(pubkey)`.
    pub fn p2pkh_unlock(
        signature: &Signature,
        sighash_byte: u8,
        public_key: &PublicKey,
    ) -> Result<Self, ScriptError> {
        let mut sig = signature.to_der();
        sig.push(sighash_byte);
        let mut script = Script::new();
        script.append_push_data(&sig)?;
        script.append_push_data(&public_key.to_compressed())?;
        Ok(script)
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    /// Encode the script as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Borrow the underlying bytes.
    pub fn to_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if the script has no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    // -----------------------------------------------------------------------
    // Classification
    // -----------------------------------------------------------------------

    /// `true` for the exact 25-byte P2PKH template.
    pub fn is_p2pkh(&self) -> bool {
        let b = &self.0;
        b.len() == P2PKH_SCRIPT_LEN
            && b[0] == OP_DUP
            && b[1] == OP_HASH160
            && b[2] == OP_DATA_20
            && b[23] == OP_EQUALVERIFY
            && b[24] == OP_CHECKSIG
    }

    /// Extract the public key hash of a P2PKH script.
    ///
    /// # Returns
    /// The 20-byte hash, or `NotP2PKH`.
    pub fn public_key_hash(&self) -> Result<[u8; 20], ScriptError> {
        if !self.is_p2pkh() {
            return Err(ScriptError::NotP2PKH);
        }
        let mut out = [0u8; 20];
        out.copy_from_slice(&self.0[3..23]);
        Ok(out)
    }

    /// Parse into chunks.
    pub fn chunks(&self) -> Result<Vec<ScriptChunk>, ScriptError> {
        decode_script(&self.0)
    }

    /// Copy of this script with every OP_CODESEPARATOR removed.
    ///
    /// Push payloads that happen to contain the `0xab` byte are kept.
    ///
    /// # Returns
    /// The filtered script, or `DataTooSmall` if a push is truncated.
    pub fn without_code_separators(&self) -> Result<Script, ScriptError> {
        let mut out = Vec::with_capacity(self.0.len());
        for chunk in self.chunks()? {
            if chunk.op == OP_CODESEPARATOR && chunk.data.is_none() {
                continue;
            }
            chunk.append_to(&mut out);
        }
        Ok(Script(out))
    }

    // -----------------------------------------------------------------------
    // Building
    // -----------------------------------------------------------------------

    /// Append a data push using the smallest push opcode.
    pub fn append_push_data(&mut self, data: &[u8]) -> Result<(), ScriptError> {
        let prefix = push_data_prefix(data.len())?;
        self.0.extend_from_slice(&prefix);
        self.0.extend_from_slice(data);
        Ok(())
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

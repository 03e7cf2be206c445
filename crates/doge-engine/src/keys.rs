//! Keypair, address and HD key helpers.
//!
//! Verification functions return `bool` and fail closed: any decode error,
//! checksum mismatch or network mismatch yields `false`.

use log::debug;

use doge_primitives::bip32::{DerivationPath, ExtendedKey};
use doge_primitives::ec::PrivateKey;
use doge_primitives::{EccContext, Network};
use doge_script::Address;

use crate::EngineError;

/// Generate a random keypair.
///
/// # Returns
/// `(wif_private_key, p2pkh_address)` for `network`.
pub fn generate_keypair(network: Network) -> (String, String) {
    let _ecc = EccContext::global().session();
    let key = PrivateKey::generate();
    let address = Address::from_public_key(&key.public_key(), network);
    debug!("generated {} keypair {}", network, address);
    (key.to_wif(network), address.to_string())
}

/// Generate a random HD master key.
///
/// # Returns
/// `(extended_private_key, p2pkh_address)` where the address belongs to
/// the master node's own public key.
pub fn generate_hd_master_keypair(network: Network) -> (String, String) {
    let _ecc = EccContext::global().session();
    let master = ExtendedKey::generate_master(network);
    let address = Address::from_public_key(&master.public_key(), network);
    debug!("generated {} HD master {}", network, address);
    (master.to_base58(), address.to_string())
}

/// P2PKH address of the node an extended key encodes.
///
/// No child step is taken; the network comes from the key's version bytes.
pub fn derive_child_public_key(extended_key: &str) -> Result<String, EngineError> {
    let node = parse_extended(extended_key)?;
    Ok(Address::from_public_key(&node.public_key(), node.network()).to_string())
}

/// `true` if `wif` is a `network` key whose compressed public key hashes
/// to `address`.
pub fn verify_keypair(wif: &str, address: &str, network: Network) -> bool {
    let Ok(key) = PrivateKey::from_wif(wif, network) else {
        return false;
    };
    let Ok(address) = Address::from_string_for(address, network) else {
        return false;
    };
    address.public_key_hash == key.public_key().hash160()
}

/// `true` if `extended_key` is a `network` key whose node address is
/// `address`.
pub fn verify_hd_master_keypair(extended_key: &str, address: &str, network: Network) -> bool {
    let Ok(node) = ExtendedKey::from_base58(extended_key) else {
        return false;
    };
    if node.network() != network {
        return false;
    }
    let Ok(address) = Address::from_string_for(address, network) else {
        return false;
    };
    address.public_key_hash == node.public_key().hash160()
}

/// `true` if `address` is a well-formed P2PKH address of a known network.
pub fn verify_address(address: &str) -> bool {
    Address::from_string(address).is_ok()
}

/// Hex of the P2PKH locking script paying `address`.
pub fn p2pkh_to_script_hash(address: &str) -> Result<String, EngineError> {
    Ok(Address::from_string(address)?.locking_script().to_hex())
}

/// Hex of the P2PKH locking script paying the key encoded by `wif`.
pub fn private_key_wif_to_script_hash(wif: &str) -> Result<String, EngineError> {
    let (key, network) =
        PrivateKey::decode_wif(wif).map_err(|e| EngineError::InvalidKey(e.to_string()))?;
    Ok(Address::from_public_key(&key.public_key(), network).locking_script().to_hex())
}

/// Derive the extended key at `path` below `extended_key`.
///
/// # Arguments
/// * `extended_key` - Serialized BIP32 key (`dgpv`, `dgub`, `tprv`, `tpub`).
/// * `path` - Derivation path such as `m/44'/3'/0'/0/0`.
/// * `want_private` - Return the private form; requires a private input.
///
/// # Returns
/// The serialized derived key.
pub fn derive_hd_address_by_path(
    extended_key: &str,
    path: &str,
    want_private: bool,
) -> Result<String, EngineError> {
    let node = parse_extended(extended_key)?;
    let path: DerivationPath = path.parse()?;
    derive_serialized(&node, &path, want_private)
}

/// Derive the BIP44 key `m/44'/3'/account'/is_change/index`.
pub fn derive_bip44_key(
    extended_key: &str,
    account: u32,
    is_change: bool,
    index: u32,
    want_private: bool,
) -> Result<String, EngineError> {
    let node = parse_extended(extended_key)?;
    derive_serialized(&node, &DerivationPath::bip44(account, is_change, index), want_private)
}

fn parse_extended(extended_key: &str) -> Result<ExtendedKey, EngineError> {
    ExtendedKey::from_base58(extended_key).map_err(|e| EngineError::InvalidKey(e.to_string()))
}

fn derive_serialized(
    node: &ExtendedKey,
    path: &DerivationPath,
    want_private: bool,
) -> Result<String, EngineError> {
    if want_private && !node.is_private() {
        return Err(EngineError::InvalidKey(
            "private derivation from a public extended key".to_string(),
        ));
    }
    let child = node.derive_path(path)?;
    debug!("derived {} at depth {}", path, child.depth());
    if want_private {
        Ok(child.to_base58())
    } else {
        Ok(child.neuter().to_base58())
    }
}

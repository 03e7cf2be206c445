//! End-to-end workspace flows against the libdogecoin testnet vectors.

use doge_primitives::Network;
use doge_transaction::sighash::SIGHASH_ALL;
use doge_transaction::Koinu;

use crate::config::EngineConfig;
use crate::keys::*;
use crate::registry::Registry;
use crate::signer::sign_raw_transaction;
use crate::EngineError;

const WIF: &str = "ci5prbqz7jXyFPVWKkHhPq4a9N8Dag3TpeRfuqqC2Nfr7gSqx1fy";
const UTXO_SCRIPT: &str = "76a914d8c43e6f68ca4ea1e9b93da2d1e3a95118fa4a7c88ac";
const EXTERNAL: &str = "nbGfXLskPh7eM1iG5zz5EfDkkNTo9TRmde";
const INTERNAL: &str = "noxKJyGPugPRN4wqvrwsrtYXuQCk7yQEsy";

const TXID_2: &str = "b4455e7b7b7acb51fb6feba7a2702c42a5100f61f61abafa31851ed6ae076074";
const TXID_10: &str = "42113bdc65fc2943cf0359ea1a24ced0b6b0b5290db4c63a3329c6601c4616e2";

const RAW_TX_2: &str = "0100000001e298a076ea26489c4ea60b34cb79a386a16aeef17cd646e9bdc3e4486b4abadf0100000068453042021e623cf9ebc2e2736343827c2dda22a85c41347d5fe17e4a1dfa57ebb3eb0e022075baa343944021a24a8a99c5a90b3af2fd47b92bd1e1fe0f7dc1a5cb95086df0012102ac1447c59fd7b96cee31e4a22ec051cf393d76bc3f275bcd5aa7580377d32e14feffffff02208d360b890000001976a914a4a942c99c94522a025b2b8cfd2edd149fb4995488ac00c2eb0b000000001976a914d8c43e6f68ca4ea1e9b93da2d1e3a95118fa4a7c88ac96fe3700";

const EMPTY: &str = "01000000000000000000";
const SINGLE_UTXO: &str = "0100000001746007aed61e8531faba1af6610f10a5422c70a2a7eb6ffb51cb7a7b7b5e45b40100000000ffffffff0000000000";
const DOUBLE_UTXO: &str = "0100000002746007aed61e8531faba1af6610f10a5422c70a2a7eb6ffb51cb7a7b7b5e45b40100000000ffffffffe216461c60c629333ac6b40d29b5b0b6d0ce241aea5903cf4329fc65dc3b11420100000000ffffffff0000000000";
const DOUBLE_UTXO_ONE_OUTPUT: &str = "0100000002746007aed61e8531faba1af6610f10a5422c70a2a7eb6ffb51cb7a7b7b5e45b40100000000ffffffffe216461c60c629333ac6b40d29b5b0b6d0ce241aea5903cf4329fc65dc3b11420100000000ffffffff010065cd1d000000001976a9144da2f8202789567d402f7f717c01d98837e4325488ac00000000";
const UNSIGNED: &str = "0100000002746007aed61e8531faba1af6610f10a5422c70a2a7eb6ffb51cb7a7b7b5e45b40100000000ffffffffe216461c60c629333ac6b40d29b5b0b6d0ce241aea5903cf4329fc65dc3b11420100000000ffffffff020065cd1d000000001976a9144da2f8202789567d402f7f717c01d98837e4325488ac30b4b529000000001976a914d8c43e6f68ca4ea1e9b93da2d1e3a95118fa4a7c88ac00000000";
const FIRST_INPUT_SIGNED: &str = "0100000002746007aed61e8531faba1af6610f10a5422c70a2a7eb6ffb51cb7a7b7b5e45b4010000006b48304502210090bddac300243d16dca5e38ab6c80d5848e0d710d77702223bacd6682654f6fe02201b5c2e8b1143d8a807d604dc18068b4278facce561c302b0c66a4f2a5a4aa66f0121031dc1e49cfa6ae15edd6fa871a91b1f768e6f6cab06bf7a87ac0d8beb9229075bffffffffe216461c60c629333ac6b40d29b5b0b6d0ce241aea5903cf4329fc65dc3b11420100000000ffffffff020065cd1d000000001976a9144da2f8202789567d402f7f717c01d98837e4325488ac30b4b529000000001976a914d8c43e6f68ca4ea1e9b93da2d1e3a95118fa4a7c88ac00000000";
const FULLY_SIGNED: &str = "0100000002746007aed61e8531faba1af6610f10a5422c70a2a7eb6ffb51cb7a7b7b5e45b4010000006b48304502210090bddac300243d16dca5e38ab6c80d5848e0d710d77702223bacd6682654f6fe02201b5c2e8b1143d8a807d604dc18068b4278facce561c302b0c66a4f2a5a4aa66f0121031dc1e49cfa6ae15edd6fa871a91b1f768e6f6cab06bf7a87ac0d8beb9229075bffffffffe216461c60c629333ac6b40d29b5b0b6d0ce241aea5903cf4329fc65dc3b1142010000006a47304402200e19c2a66846109aaae4d29376040fc4f7af1a519156fe8da543dc6f03bb50a102203a27495aba9eead2f154e44c25b52ccbbedef084f0caf1deedaca87efd77e4e70121031dc1e49cfa6ae15edd6fa871a91b1f768e6f6cab06bf7a87ac0d8beb9229075bffffffff020065cd1d000000001976a9144da2f8202789567d402f7f717c01d98837e4325488ac30b4b529000000001976a914d8c43e6f68ca4ea1e9b93da2d1e3a95118fa4a7c88ac00000000";
const SINGLE_UTXO_SIGNED: &str = "0100000001e216461c60c629333ac6b40d29b5b0b6d0ce241aea5903cf4329fc65dc3b1142010000006b483045022100e22ad3aba33c15a6f24f68c059369c9d6d4e8bc9a76af5ef589e483fa0c14ce202206cfacacf81f97766a3451df6bd073482fbeba379d441120ce3d13ee4cf154ec10121031dc1e49cfa6ae15edd6fa871a91b1f768e6f6cab06bf7a87ac0d8beb9229075bffffffff019810993b000000001976a9144da2f8202789567d402f7f717c01d98837e4325488ac00000000";

const MASTER: &str = "dgpv51eADS3spNJh7z2oc8LgNLeJiwiPNgdEFcdtAhtCqDQ76SwphcQq74jZCRTZ2nF5RpmKx9P4Mm55RTopNQePWiSBfzyJ3jgRoxVbVLF6BCY";
const BIP44_MASTER: &str = "dgpv51eADS3spNJh8h13wso3DdDAw3EJRqWvftZyjTNCFEG7gqV6zsZmucmJR6xZfvgfmzUthVC6LNicBeNNDQdLiqjQJjPeZnxG8uW3Q3gCA3e";

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn two_input_workspace(reg: &Registry) -> u64 {
    let h = reg.start();
    reg.add_utxo(h, TXID_2, 1).unwrap();
    reg.add_utxo(h, TXID_10, 1).unwrap();
    reg.add_output(h, EXTERNAL, "5").unwrap();
    h
}

// -----------------------------------------------------------------------
// Registry
// -----------------------------------------------------------------------

#[test]
fn test_start_get_empty() {
    let reg = Registry::new();
    let h = reg.start();
    assert_eq!(reg.get(h).as_deref(), Some(EMPTY));
}

#[test]
fn test_consecutive_handles_with_clears() {
    let reg = Registry::new();
    let a = reg.start();
    let b = reg.start();
    reg.clear(a);
    let c = reg.start();
    reg.clear(b);
    let d = reg.start();
    assert_eq!((b, c, d), (a + 1, a + 2, a + 3));
}

#[test]
fn test_idempotent_clear() {
    let reg = Registry::new();
    let a = reg.start();
    let b = reg.store(SINGLE_UTXO).unwrap();
    assert!(reg.clear(a));
    assert!(!reg.clear(a));
    assert!(!reg.clear(999));
    assert_eq!(reg.get(a), None);
    assert_eq!(reg.get(b).as_deref(), Some(SINGLE_UTXO));
}

#[test]
fn test_oversized_save_leaves_slot() {
    init_logger();
    let reg = Registry::new();
    let h = reg.store(SINGLE_UTXO).unwrap();
    let huge = "x".repeat(102_401);
    assert!(matches!(reg.save(h, &huge), Err(EngineError::HexTooLong { len: 102_401, max: 102_400 })));
    assert_eq!(reg.get(h).as_deref(), Some(SINGLE_UTXO));

    let empty = reg.start();
    assert!(reg.save(empty, &huge).is_err());
    assert_eq!(reg.get(empty).as_deref(), Some(EMPTY));
}

#[test]
fn test_malformed_save_leaves_slot() {
    let reg = Registry::new();
    let h = reg.store(DOUBLE_UTXO).unwrap();
    assert!(reg.save(h, &SINGLE_UTXO[..SINGLE_UTXO.len() - 2]).is_err());
    assert!(reg.save(h, "0100000001").is_err());
    assert_eq!(reg.get(h).as_deref(), Some(DOUBLE_UTXO));
}

#[test]
fn test_non_canonical_hex_rejected() {
    let reg = Registry::new();
    assert!(matches!(reg.store("01000000fd00000000000000"), Err(EngineError::Transaction(_))));
    let h = reg.store(SINGLE_UTXO).unwrap();
    assert!(reg.save(h, "01000000fd00000000000000").is_err());
    assert_eq!(reg.get(h).as_deref(), Some(SINGLE_UTXO));
}

#[test]
fn test_configured_limit() {
    let reg = Registry::with_config(EngineConfig { max_hex_len: 20, ..EngineConfig::default() });
    assert!(reg.store(EMPTY).is_ok());
    assert!(matches!(reg.store(SINGLE_UTXO), Err(EngineError::HexTooLong { .. })));
}

#[test]
fn test_txid_of_slot() {
    let reg = Registry::new();
    let h = reg.store(RAW_TX_2).unwrap();
    assert_eq!(reg.txid(h).as_deref(), Some(TXID_2));
    assert_eq!(reg.txid(h + 1), None);
}

// -----------------------------------------------------------------------
// Builder
// -----------------------------------------------------------------------

#[test]
fn test_build_step_by_step() {
    let reg = Registry::new();
    let h = reg.start();
    reg.add_utxo(h, TXID_2, 1).unwrap();
    assert_eq!(reg.get(h).as_deref(), Some(SINGLE_UTXO));
    reg.add_utxo(h, TXID_10, 1).unwrap();
    assert_eq!(reg.get(h).as_deref(), Some(DOUBLE_UTXO));
    reg.add_output(h, EXTERNAL, "5").unwrap();
    assert_eq!(reg.get(h).as_deref(), Some(DOUBLE_UTXO_ONE_OUTPUT));
    let finalized = reg.finalize(h, EXTERNAL, ".00226", "12.0", INTERNAL).unwrap();
    assert_eq!(finalized, UNSIGNED);
    assert_eq!(reg.get(h).as_deref(), Some(UNSIGNED));
    assert!(UNSIGNED.contains("30b4b52900000000"));
}

#[test]
fn test_finalize_failure_keeps_slot() {
    let reg = Registry::new();
    let h = two_input_workspace(&reg);
    assert!(reg.finalize(h, EXTERNAL, ".00226", "5.0", INTERNAL).is_err());
    assert!(reg.finalize(h, "bogus", ".00226", "12.0", INTERNAL).is_err());
    assert!(reg.finalize(h, EXTERNAL, "fee", "12.0", INTERNAL).is_err());
    assert_eq!(reg.get(h).as_deref(), Some(DOUBLE_UTXO_ONE_OUTPUT));
}

// -----------------------------------------------------------------------
// Signing
// -----------------------------------------------------------------------

#[test]
fn test_build_and_sign_transaction() {
    init_logger();
    let reg = Registry::new();
    let h = two_input_workspace(&reg);
    reg.finalize(h, EXTERNAL, ".00226", "12.0", INTERNAL).unwrap();
    let amounts = [Koinu(200_000_000), Koinu(1_000_000_000)];
    reg.sign_transaction(h, &amounts, UTXO_SCRIPT, WIF).unwrap();
    assert_eq!(reg.get(h).as_deref(), Some(FULLY_SIGNED));
}

#[test]
fn test_single_input_sign_transaction() {
    let reg = Registry::new();
    let h = reg.start();
    reg.add_utxo(h, TXID_10, 1).unwrap();
    reg.add_output(h, EXTERNAL, "9.99887").unwrap();
    reg.finalize(h, EXTERNAL, ".00113", "10.0", INTERNAL).unwrap();
    reg.sign_transaction(h, &[Koinu(1_000_000_000)], UTXO_SCRIPT, WIF).unwrap();
    assert_eq!(reg.get(h).as_deref(), Some(SINGLE_UTXO_SIGNED));

    let stored = reg.store(SINGLE_UTXO_SIGNED).unwrap();
    assert_eq!(stored, h + 1);
    assert_eq!(reg.get(h), reg.get(stored));
    reg.clear(stored);
    assert_eq!(reg.get(stored), None);
}

#[test]
fn test_sign_raw_in_turn() {
    let config = EngineConfig::default();
    let reg = Registry::new();
    let h = reg.store(UNSIGNED).unwrap();

    let first = sign_raw_transaction(&config, 0, &reg.get(h).unwrap(), UTXO_SCRIPT, SIGHASH_ALL, WIF).unwrap();
    assert_eq!(first, FIRST_INPUT_SIGNED);
    reg.save(h, &first).unwrap();

    let both = sign_raw_transaction(&config, 1, &reg.get(h).unwrap(), UTXO_SCRIPT, SIGHASH_ALL, WIF).unwrap();
    assert_eq!(both, FULLY_SIGNED);
}

#[test]
fn test_sign_indexed_raw_transaction() {
    let reg = Registry::new();
    let h = reg.start();
    let signed = reg
        .sign_indexed_raw_transaction(h, 0, UNSIGNED, UTXO_SCRIPT, SIGHASH_ALL, WIF)
        .unwrap();
    assert_eq!(signed, FIRST_INPUT_SIGNED);
    assert_eq!(reg.get(h).as_deref(), Some(FIRST_INPUT_SIGNED));
}

#[test]
fn test_sign_input_bad_key_leaves_slot() {
    init_logger();
    let reg = Registry::new();
    let h = reg.store(UNSIGNED).unwrap();
    let bad = "ci5prbqz7jXyFPVWKkHhPq4a9N8Dag3TpeRfuqqC2Nfr7gSqx1fx";
    assert!(matches!(
        reg.sign_input(h, 0, UTXO_SCRIPT, SIGHASH_ALL, Koinu(200_000_000), bad),
        Err(EngineError::InvalidKey(_))
    ));
    assert_eq!(reg.get(h).as_deref(), Some(UNSIGNED));

    let hex = reg.sign_input(h, 0, UTXO_SCRIPT, SIGHASH_ALL, Koinu(200_000_000), WIF).unwrap();
    assert_eq!(hex, FIRST_INPUT_SIGNED);
}

#[test]
fn test_sign_transaction_is_atomic() {
    let reg = Registry::new();
    let h = reg.store(UNSIGNED).unwrap();
    assert!(reg.sign_transaction(h, &[Koinu(1)], UTXO_SCRIPT, WIF).is_err());
    assert!(reg.sign_transaction(h, &[Koinu(1), Koinu(2)], "51", WIF).is_err());
    assert_eq!(reg.get(h).as_deref(), Some(UNSIGNED));
}

#[test]
fn test_failure_on_one_handle_spares_others() {
    let reg = Registry::new();
    let a = reg.store(UNSIGNED).unwrap();
    let b = reg.store(DOUBLE_UTXO).unwrap();
    assert!(reg.sign_input(b, 5, UTXO_SCRIPT, SIGHASH_ALL, Koinu::ZERO, WIF).is_err());
    assert_eq!(reg.get(a).as_deref(), Some(UNSIGNED));
    assert_eq!(reg.get(b).as_deref(), Some(DOUBLE_UTXO));
}

// -----------------------------------------------------------------------
// Keys and addresses
// -----------------------------------------------------------------------

#[test]
fn test_script_hash_helpers() {
    assert_eq!(p2pkh_to_script_hash(INTERNAL).unwrap(), UTXO_SCRIPT);
    assert_ne!(p2pkh_to_script_hash(EXTERNAL).unwrap(), UTXO_SCRIPT);
    assert_eq!(private_key_wif_to_script_hash(WIF).unwrap(), UTXO_SCRIPT);
    assert!(p2pkh_to_script_hash("nope").is_err());
    assert!(matches!(private_key_wif_to_script_hash("nope"), Err(EngineError::InvalidKey(_))));
}

#[test]
fn test_fixture_keypair() {
    assert!(verify_keypair(WIF, INTERNAL, Network::Testnet));
    assert!(!verify_keypair(WIF, EXTERNAL, Network::Testnet));
    assert!(verify_keypair(
        "QWgNKvA5LPD1HpopRFghjz6jPipHRAUrLjqTt7paxYX8cTbu5eRs",
        "D7AM5jDQ7xRRK7bMCZ87e4BsFxHxCdDbXd",
        Network::Mainnet
    ));
    assert!(!verify_keypair(
        "QWgNKvA5LPD1HpopRFghjz6jPipHRAUrLjqTt7paxYX8cTbu5eRs",
        "DCncxpcZW3GEyqs17KrqAfs4cR844JkimG",
        Network::Mainnet
    ));
}

#[test]
fn test_hd_master_verification() {
    assert!(verify_hd_master_keypair(MASTER, "DJt45oTXDxBiJBRZeMtXm4wu4kc5yPePYn", Network::Mainnet));
    assert!(!verify_hd_master_keypair(MASTER, "DDDXCMUCXCFK3UHXsjqSkzwoqt79K6Rn6k", Network::Mainnet));
    assert!(!verify_hd_master_keypair(MASTER, "DJt45oTXDxBiJBRZeMtXm4wu4kc5yPePYn", Network::Testnet));
}

#[test]
fn test_derive_child_public_key() {
    assert_eq!(
        derive_child_public_key("dgpv51eADS3spNJhA6LG5QycrFmQQtxg7ztFJQuamYiytZ4x4FUC7pG5B7fUTHBDB7g6oGaCVwuGF2i75r1DQKyFSauAHUGBAi89NaggpdUP3yK").unwrap(),
        "DEByFfUQ3AxcFFet9afr8wxxedQysRduWN"
    );
    assert_eq!(
        derive_child_public_key("tprv8ZgxMBicQKsPeM5HaRoH4AuGX2Jsf8rgQvcFGCvjQxvAn1Bv8SAx8cPQsnmKsB6WjvGWsNiNsrNS2d3quUkYpK2ofctFw87SXodGhBPHiUM").unwrap(),
        "noBtVVtAvvh5oapFjHHyTSxxEUTykUZ3oR"
    );
    assert!(matches!(derive_child_public_key("dgpv51"), Err(EngineError::InvalidKey(_))));
}

#[test]
fn test_invalid_addresses() {
    assert!(verify_address(INTERNAL));
    assert!(verify_address("DJt45oTXDxBiJBRZeMtXm4wu4kc5yPePYn"));
    assert!(!verify_address("Dasdfasdfasdfasdfasdfasdfasdfasdfx"));
    assert!(!verify_address("DP6xxxDJxxxJAaWucRfsPvXLPGRyF3DdeP"));
}

#[test]
fn test_bip44_vectors() {
    let cases = [
        (0, false, 0,
         "dgpv5BeiZXttUioRMzXUhD3s2uE9F23EhAwFu9meZeY9G99YS6hJCsQ9u6PRsAG3qfVwB1T7aQTVGLsmpxMiczV1dRDgzpbUxR7utpTRmN41iV7",
         "dgub8vXjuDpn2sTkerBdjSfq9kmjhaQsXHxyBkYrikw84GCYz9ozcdwvYPo5SSDWqZUVT5d4jrG8CHiGsC1M7pdETPhoKiQa92znT2vG9YaytBH"),
        (0, true, 0,
         "dgpv5B5FdsPKQH8hK3vUo5ZR9ZXktfUxv1PStiM2TfnwH9oct5nJwAUx28356eNXoUwcNwzvfVRSDVh85aV3CQdKpQo2Vm8MKyz7KsNAXTEMbeS",
         "dgub8uxGyZKCxRo2buadqKBPGR5MMDrbk8RABK8EcnBv5GrdS8u1Lw2ifRSifsT3wuVRsK45b9kugWkd2cREzkJLiGvwbY5txG2dKfsY3bndC93"),
        (1, false, 1,
         "dgpv5Ckgu5gakCr2g8NwFsi9aXXgBTXvzoFxwi8ybQHRmutQzYDoa8y4QD6w94EEYFtinVGD3ZzZG89t8pedriw9L8VgPYKeQsUHoZQaKcSEqwr",
         "dgub8wdiEmcUJMWMxz36J7L7hP5Ge1uZpvHgEJvBkWgQa2wRYbLVyuWq3WWaiK3ZgYs893RqrgZN3QgRghPXkpRr7kdT44XVSaJuwMF1PTHi2mQ"),
        (1, true, 1,
         "dgpv5CnqDfc6af4vKYLZQfyGgYYVQcgkiGwqAm1qEirxruSwXwSQJoTLjSckPkbZDXRQs7X83esTtoBEmy4zr4UgJBHb8T1EMc6HYCsWgKk4JRh",
         "dgub8wfrZMXz8ojFcPziSubEoQ65sB4PYPyYTMo3PqFwf2Vx5zZ6ia17Nk2Py25c3dvq1e7ZnfBrurCS5wuagzRoBCXhJ2NeGU54NBytvuUuRyA"),
    ];
    for (account, is_change, index, private, public) in cases {
        assert_eq!(derive_bip44_key(BIP44_MASTER, account, is_change, index, true).unwrap(), private);
        assert_eq!(derive_bip44_key(BIP44_MASTER, account, is_change, index, false).unwrap(), public);
        let path = format!("m/44'/3'/{}'/{}/{}", account, is_change as u8, index);
        assert_eq!(derive_hd_address_by_path(BIP44_MASTER, &path, false).unwrap(), public);
    }
}

#[test]
fn test_crypto_context_session_around_signing() {
    let ctx = doge_primitives::EccContext::global();
    let config = EngineConfig::default();
    sign_raw_transaction(&config, 0, UNSIGNED, UTXO_SCRIPT, SIGHASH_ALL, WIF).unwrap();
    generate_keypair(Network::Testnet);
    let session = ctx.session();
    assert!(ctx.is_started());
    drop(session);
}

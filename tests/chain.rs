use cipherstack::cipher;
use cipherstack::error::CipherStackError;
use cipherstack::keys::KeyMap;
use cipherstack::metrics::NullSampler;
use cipherstack::pipeline::{
    decrypt_chain, decrypt_with_mode, encrypt_chain, encrypt_with_mode,
};
use cipherstack::policy::{Algorithm, SecurityMode};

#[test]
fn lightweight_chain_roundtrip() {
    let text = "Layered encryption, lightweight tier.";
    let run = encrypt_with_mode(text, SecurityMode::Lightweight).unwrap();
    let back = decrypt_with_mode(&run.text, SecurityMode::Lightweight, &run.keys).unwrap();
    assert_eq!(back.text, text);
}

#[test]
fn balanced_chain_roundtrip() {
    let text = "Layered encryption, balanced tier. \u{00e9}\u{00e8}!";
    let run = encrypt_with_mode(text, SecurityMode::Balanced).unwrap();
    assert_eq!(run.layers.len(), 3);
    let back = decrypt_with_mode(&run.text, SecurityMode::Balanced, &run.keys).unwrap();
    assert_eq!(back.text, text);
}

#[test]
fn high_chain_roundtrip() {
    // A pre-generated 1024-bit RSA key keeps the suite fast; the chain
    // logic is identical at any modulus size.
    let mut keys = KeyMap::new();
    keys.insert(
        Algorithm::Rsa,
        cipher::generate_key(Algorithm::Rsa, SecurityMode::Lightweight).unwrap(),
    );

    let mode = SecurityMode::High;
    let text = "All five layers, in order, and back again.";
    let run = encrypt_chain(text, mode.chain(), &keys, mode, &NullSampler).unwrap();
    assert_eq!(run.layers.len(), 5);

    let back = decrypt_chain(&run.text, mode.chain(), &run.keys, mode, &NullSampler).unwrap();
    assert_eq!(back.text, text);
}

#[test]
fn concrete_lightweight_scenario() {
    // caesar SHIFT-7 then vigenere KEY, decrypted vigenere then caesar
    let mode = SecurityMode::Lightweight;
    let chain = [Algorithm::Caesar, Algorithm::Vigenere];
    let mut keys = KeyMap::new();
    keys.insert(Algorithm::Caesar, "SHIFT-7".into());
    keys.insert(Algorithm::Vigenere, "KEY".into());

    let run = encrypt_chain("Hello World", &chain, &keys, mode, &NullSampler).unwrap();
    let back = decrypt_chain(&run.text, &chain, &run.keys, mode, &NullSampler).unwrap();
    assert_eq!(back.text, "Hello World");
}

#[test]
fn encryption_manifest_is_ascending_and_complete() {
    let run = encrypt_with_mode("manifest", SecurityMode::Balanced).unwrap();
    let chain = SecurityMode::Balanced.chain();
    for (index, layer) in run.layers.iter().enumerate() {
        assert_eq!(layer.order, index + 1);
        assert_eq!(layer.algorithm, chain[index]);
        assert_eq!(layer.key, run.keys[&layer.algorithm]);
    }
}

#[test]
fn decryption_manifest_reflects_reverse_processing() {
    let mode = SecurityMode::Balanced;
    let run = encrypt_with_mode("ordering", mode).unwrap();
    let back = decrypt_with_mode(&run.text, mode, &run.keys).unwrap();

    let chain = mode.chain();
    for (index, layer) in back.layers.iter().enumerate() {
        assert_eq!(layer.order, index + 1);
        assert_eq!(layer.algorithm, chain[chain.len() - 1 - index]);
    }
}

#[test]
fn missing_keys_reported_up_front_with_all_absentees() {
    let mode = SecurityMode::Balanced;
    let run = encrypt_with_mode("will lose keys", mode).unwrap();

    let mut keys = run.keys.clone();
    keys.remove(&Algorithm::Aes);
    keys.remove(&Algorithm::Blowfish);

    let err = decrypt_with_mode(&run.text, mode, &keys).unwrap_err();
    match err {
        CipherStackError::MissingKeys(missing) => {
            assert!(missing.contains(&Algorithm::Aes));
            assert!(missing.contains(&Algorithm::Blowfish));
            assert_eq!(missing.len(), 2);
        }
        other => panic!("expected MissingKeys, got {:?}", other),
    }
}

#[test]
fn corrupted_ciphertext_fails_with_layer_context() {
    let mode = SecurityMode::Balanced;
    let run = encrypt_with_mode("layer context", mode).unwrap();

    // '!' breaks the outermost base64 envelope; blowfish is the last
    // encryption layer, so it is decryption layer 1
    let mut tampered = run.text.clone();
    tampered.push('!');

    let err = decrypt_with_mode(&tampered, mode, &run.keys).unwrap_err();
    match err {
        CipherStackError::LayerFailure {
            order,
            algorithm,
            mode: failed_mode,
            ..
        } => {
            assert_eq!(order, 1);
            assert_eq!(algorithm, Algorithm::Blowfish);
            assert_eq!(failed_mode, mode);
        }
        other => panic!("expected LayerFailure, got {:?}", other),
    }
}

#[test]
fn empty_plaintext_roundtrips_through_chain() {
    for mode in [SecurityMode::Lightweight, SecurityMode::Balanced] {
        let run = encrypt_with_mode("", mode).unwrap();
        let back = decrypt_with_mode(&run.text, mode, &run.keys).unwrap();
        assert_eq!(back.text, "");
    }
}

#[test]
fn per_layer_samples_cover_the_chain() {
    let run = encrypt_with_mode("timed", SecurityMode::Balanced).unwrap();
    assert_eq!(run.samples.len(), 3);
    let metrics = run.metrics();
    let sum: f64 = run.samples.iter().map(|s| s.seconds).sum();
    assert!((metrics.total_seconds - sum).abs() < f64::EPSILON);
}

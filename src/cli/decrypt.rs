use crate::error::Result;
use crate::keys::KeyBundle;
use crate::metrics::ProcStatusSampler;
use crate::pipeline::{decrypt_chain, ChainRun};
use std::path::Path;

/// Decrypt a ciphertext file using a key bundle
///
/// The bundle supplies both the mode (and therefore the chain to reverse)
/// and the keys. The up-front key check inside the pipeline reports every
/// missing algorithm before any cipher work runs.
pub fn decrypt_file(input_path: &Path, output_path: &Path, keys_path: &Path) -> Result<ChainRun> {
    let ciphertext = std::fs::read_to_string(input_path)?;
    let bundle = KeyBundle::from_json(&std::fs::read_to_string(keys_path)?)?;

    let run = decrypt_chain(
        &ciphertext,
        bundle.mode.chain(),
        &bundle.keys,
        bundle.mode,
        &ProcStatusSampler,
    )?;

    std::fs::write(output_path, &run.text)?;
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::encrypt::{encrypt_file, EncryptOptions};
    use crate::error::CipherStackError;
    use crate::policy::SecurityMode;
    use tempfile::tempdir;

    #[test]
    fn test_decrypt_roundtrip_through_files() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("plain.txt");
        let ciphertext = dir.path().join("cipher.txt");
        let keys = dir.path().join("keys.json");
        let recovered = dir.path().join("recovered.txt");

        let original = "File-level round trip, with punctuation!";
        std::fs::write(&input, original).unwrap();

        let options = EncryptOptions {
            mode: SecurityMode::Lightweight,
        };
        encrypt_file(&input, &ciphertext, &keys, &options).unwrap();
        decrypt_file(&ciphertext, &recovered, &keys).unwrap();

        assert_eq!(std::fs::read_to_string(&recovered).unwrap(), original);
    }

    #[test]
    fn test_decrypt_with_incomplete_bundle_fails_up_front() {
        let dir = tempdir().unwrap();
        let ciphertext = dir.path().join("cipher.txt");
        let keys = dir.path().join("keys.json");
        let recovered = dir.path().join("recovered.txt");

        std::fs::write(&ciphertext, "irrelevant").unwrap();
        // Bundle with no keys at all
        std::fs::write(
            &keys,
            KeyBundle::new(SecurityMode::Lightweight).to_json().unwrap(),
        )
        .unwrap();

        let err = decrypt_file(&ciphertext, &recovered, &keys).unwrap_err();
        match err {
            CipherStackError::MissingKeys(missing) => {
                assert_eq!(missing.len(), SecurityMode::Lightweight.chain().len());
            }
            other => panic!("expected MissingKeys, got {:?}", other),
        }
        assert!(!recovered.exists());
    }
}

use crate::cipher;
use crate::error::Result;
use crate::keys::KeyBundle;
use crate::policy::SecurityMode;
use std::path::Path;

/// Options for the keygen command
#[derive(Debug, Clone)]
pub struct KeygenOptions {
    pub mode: SecurityMode,
}

impl Default for KeygenOptions {
    fn default() -> Self {
        Self {
            mode: SecurityMode::default(),
        }
    }
}

/// Generate a key for every algorithm in the mode's chain
///
/// Keys are generated one at a time in chain order; RSA is the slow one.
pub fn generate_bundle(options: &KeygenOptions) -> Result<KeyBundle> {
    let mut bundle = KeyBundle::new(options.mode);
    for &algorithm in options.mode.chain() {
        let key = cipher::generate_key(algorithm, options.mode)?;
        bundle.keys.insert(algorithm, key);
    }
    Ok(bundle)
}

/// Generate a bundle and write it to the keys file
pub fn keygen_to_file(keys_path: &Path, options: &KeygenOptions) -> Result<KeyBundle> {
    let bundle = generate_bundle(options)?;
    std::fs::write(keys_path, bundle.to_json()?)?;
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_bundle_covers_the_whole_chain() {
        let options = KeygenOptions {
            mode: SecurityMode::Lightweight,
        };
        let bundle = generate_bundle(&options).unwrap();
        assert_eq!(bundle.mode, SecurityMode::Lightweight);
        for algorithm in SecurityMode::Lightweight.chain() {
            assert!(bundle.keys.contains_key(algorithm));
        }
        assert_eq!(bundle.keys.len(), SecurityMode::Lightweight.chain().len());
    }

    #[test]
    fn test_keygen_writes_readable_bundle() {
        let dir = tempdir().unwrap();
        let keys_path = dir.path().join("keys.json");

        let options = KeygenOptions {
            mode: SecurityMode::Lightweight,
        };
        keygen_to_file(&keys_path, &options).unwrap();

        let raw = std::fs::read_to_string(&keys_path).unwrap();
        let restored = KeyBundle::from_json(&raw).unwrap();
        assert_eq!(restored.mode, SecurityMode::Lightweight);
        assert_eq!(restored.keys.len(), 2);
    }
}

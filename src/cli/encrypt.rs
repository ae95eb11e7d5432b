use crate::error::{CipherStackError, Result};
use crate::keys::{KeyBundle, KeyMap};
use crate::metrics::ProcStatusSampler;
use crate::pipeline::{encrypt_chain, ChainRun};
use crate::policy::SecurityMode;
use std::path::Path;

/// Options for the encrypt command
#[derive(Debug, Clone)]
pub struct EncryptOptions {
    pub mode: SecurityMode,
}

impl Default for EncryptOptions {
    fn default() -> Self {
        Self {
            mode: SecurityMode::default(),
        }
    }
}

/// Encrypt a text file through the mode's chain
///
/// If the keys file exists its keys are reused (it must have been generated
/// for the same mode); missing keys are generated during the run. The
/// bundle is written back afterwards so freshly generated keys are never
/// lost — without them the ciphertext is unrecoverable.
pub fn encrypt_file(
    input_path: &Path,
    output_path: &Path,
    keys_path: &Path,
    options: &EncryptOptions,
) -> Result<ChainRun> {
    let plaintext = std::fs::read_to_string(input_path)?;

    let keys = if keys_path.exists() {
        let bundle = KeyBundle::from_json(&std::fs::read_to_string(keys_path)?)?;
        if bundle.mode != options.mode {
            return Err(CipherStackError::ModeMismatch {
                bundle: bundle.mode,
                requested: options.mode,
            });
        }
        bundle.keys
    } else {
        KeyMap::new()
    };

    let run = encrypt_chain(
        &plaintext,
        options.mode.chain(),
        &keys,
        options.mode,
        &ProcStatusSampler,
    )?;

    std::fs::write(output_path, &run.text)?;
    let bundle = KeyBundle {
        mode: options.mode,
        keys: run.keys.clone(),
    };
    std::fs::write(keys_path, bundle.to_json()?)?;

    Ok(run)
}

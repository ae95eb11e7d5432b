use crate::policy::{Algorithm, SecurityMode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CipherStackError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Unknown security mode: {0}. Expected high, balanced, or lightweight")]
    UnknownMode(String),

    #[error("Invalid {algorithm} key: {detail}")]
    InvalidKeyFormat { algorithm: Algorithm, detail: String },

    #[error("RSA key is incomplete: missing {0}. Regenerate keys for this mode")]
    IncompleteKey(String),

    #[error("RSA key is corrupt: {0}. Regenerate keys for this mode")]
    CorruptKey(String),

    #[error("Vigenere key must not be empty")]
    EmptyKey,

    #[error("Hill key matrix is not invertible modulo 26, so no inverse matrix exists")]
    KeyNotInvertible,

    #[error("Missing keys for: {}. Generate keys for every chain algorithm before decrypting", join_algorithms(.0))]
    MissingKeys(Vec<Algorithm>),

    #[error("{algorithm} cipher failed: {cause}")]
    AdapterFailure { algorithm: Algorithm, cause: String },

    #[error(
        "layer {order} ({algorithm}, {mode} mode) failed: {cause}. \
         Check that the keys and mode match the ones used to encrypt"
    )]
    LayerFailure {
        order: usize,
        algorithm: Algorithm,
        mode: SecurityMode,
        cause: String,
    },

    #[error("Key bundle was generated for {bundle} mode but {requested} mode was requested. Regenerate keys")]
    ModeMismatch {
        bundle: SecurityMode,
        requested: SecurityMode,
    },
}

fn join_algorithms(algorithms: &[Algorithm]) -> String {
    algorithms
        .iter()
        .map(|a| a.name())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, CipherStackError>;

//! CipherStack - Mode-Driven Multi-Layer Cipher Pipeline
//!
//! A pedagogical demonstrator that encrypts text through an ordered chain
//! of cipher algorithms and decrypts by walking the same chain in exact
//! reverse. A security mode picks both the chain and each algorithm's key
//! strength.
//!
//! ## Layer Chains
//!
//! ```text
//! high:        Input → AES → RSA → Vigenere → Blowfish → Caesar → Output
//! balanced:    Input → AES → Vigenere → Blowfish → Output
//! lightweight: Input → Caesar → Vigenere → Output
//! ```
//!
//! Each layer's output feeds the next layer's input, so decryption must
//! reverse the exact chain with the exact keys. The Hill cipher is a
//! first-class registry algorithm with its own key generation, usable
//! standalone; it stays out of the default chains because its letter-stream
//! format cannot carry the base64 envelopes the delegated ciphers emit.
//!
//! ## Example
//!
//! ```no_run
//! use cipherstack::pipeline::{decrypt_with_mode, encrypt_with_mode};
//! use cipherstack::policy::SecurityMode;
//!
//! let run = encrypt_with_mode("Hello World", SecurityMode::Lightweight).unwrap();
//! let back = decrypt_with_mode(&run.text, SecurityMode::Lightweight, &run.keys).unwrap();
//! assert_eq!(back.text, "Hello World");
//! ```

pub mod cipher;
pub mod cli;
pub mod error;
pub mod keys;
pub mod metrics;
pub mod pipeline;
pub mod policy;

pub use error::{CipherStackError, Result};
pub use keys::{KeyBundle, KeyMap};
pub use pipeline::{
    decrypt_chain, decrypt_with_mode, encrypt_chain, encrypt_with_mode, ChainRun, EncryptionLayer,
};
pub use policy::{Algorithm, SecurityMode};

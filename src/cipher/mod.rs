//! Algorithm registry and dispatcher
//!
//! One capability set per algorithm — generate a key, encrypt, decrypt —
//! selected by matching on the closed [`Algorithm`] enum so the compiler
//! checks exhaustiveness. Key-format validation happens here, at the
//! dispatch boundary, before any cipher work runs.

pub mod aes;
pub mod blowfish;
pub mod caesar;
pub mod hill;
pub mod rsa;
pub mod vigenere;

use crate::error::Result;
use crate::keys::RsaKeyPair;
use crate::policy::{Algorithm, SecurityMode};

/// Generate a fresh key for one algorithm at the strength the mode selects
pub fn generate_key(algorithm: Algorithm, mode: SecurityMode) -> Result<String> {
    match algorithm {
        Algorithm::Aes => Ok(aes::generate_key(mode)),
        Algorithm::Rsa => rsa::generate_key(mode),
        Algorithm::Hill => hill::generate_key().to_json(),
        Algorithm::Vigenere => Ok(vigenere::generate_key(mode)),
        Algorithm::Blowfish => Ok(blowfish::generate_key(mode)),
        Algorithm::Caesar => Ok(caesar::generate_key(mode)),
    }
}

/// Encrypt one layer, validating the key format first
pub fn encrypt(
    algorithm: Algorithm,
    plaintext: &str,
    key: &str,
    mode: SecurityMode,
) -> Result<String> {
    match algorithm {
        Algorithm::Aes => aes::encrypt(plaintext, key, mode),
        Algorithm::Rsa => {
            let pair = RsaKeyPair::parse(key)?;
            rsa::encrypt(plaintext, &pair)
        }
        Algorithm::Hill => {
            let key = hill::HillKey::from_json(key)?;
            hill::encrypt(plaintext, &key)
        }
        Algorithm::Vigenere => {
            let offsets = vigenere::key_offsets(key)?;
            Ok(vigenere::encrypt(plaintext, &offsets))
        }
        Algorithm::Blowfish => blowfish::encrypt(plaintext, key, mode),
        Algorithm::Caesar => {
            let shift = caesar::parse_shift(key)?;
            Ok(caesar::encrypt(plaintext, shift))
        }
    }
}

/// Decrypt one layer, validating the key format first
pub fn decrypt(
    algorithm: Algorithm,
    ciphertext: &str,
    key: &str,
    mode: SecurityMode,
) -> Result<String> {
    match algorithm {
        Algorithm::Aes => aes::decrypt(ciphertext, key, mode),
        Algorithm::Rsa => {
            let pair = RsaKeyPair::parse(key)?;
            rsa::decrypt(ciphertext, &pair)
        }
        Algorithm::Hill => {
            let key = hill::HillKey::from_json(key)?;
            hill::decrypt(ciphertext, &key)
        }
        Algorithm::Vigenere => {
            let offsets = vigenere::key_offsets(key)?;
            Ok(vigenere::decrypt(ciphertext, &offsets))
        }
        Algorithm::Blowfish => blowfish::decrypt(ciphertext, key, mode),
        Algorithm::Caesar => {
            let shift = caesar::parse_shift(key)?;
            Ok(caesar::decrypt(ciphertext, shift))
        }
    }
}

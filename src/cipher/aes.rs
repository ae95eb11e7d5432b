//! AES-CBC adapter
//!
//! The opaque key string is hex-encoded random bytes at the mode's bit
//! length. The working key is derived per message with PBKDF2-HMAC-SHA-256
//! over the key string and a fresh salt, so the envelope is
//! `base64(salt || iv || ciphertext)` and every layer output stays text.

use crate::error::{CipherStackError, Result};
use crate::policy::{Algorithm, SecurityMode};
use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::{Aes128, Aes192, Aes256};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;

const SALT_LEN: usize = 16;
const IV_LEN: usize = 16;

/// Generate a hex key string of the mode's AES bit length
pub fn generate_key(mode: SecurityMode) -> String {
    let mut bytes = vec![0u8; mode.aes_bits() / 8];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Encrypt UTF-8 text into the salted base64 envelope
pub fn encrypt(plaintext: &str, key: &str, mode: SecurityMode) -> Result<String> {
    let mut salt = [0u8; SALT_LEN];
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut iv);

    let derived = derive_key(key, &salt, mode);
    let ciphertext = encrypt_blocks(plaintext.as_bytes(), &derived, &iv)?;

    let mut envelope = Vec::with_capacity(SALT_LEN + IV_LEN + ciphertext.len());
    envelope.extend_from_slice(&salt);
    envelope.extend_from_slice(&iv);
    envelope.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(envelope))
}

/// Open the salted base64 envelope back to UTF-8 text
pub fn decrypt(ciphertext: &str, key: &str, mode: SecurityMode) -> Result<String> {
    let raw = BASE64
        .decode(ciphertext)
        .map_err(|e| adapter_error(format!("ciphertext is not valid base64: {}", e)))?;
    if raw.len() < SALT_LEN + IV_LEN {
        return Err(adapter_error(
            "ciphertext is shorter than the salt and IV header".into(),
        ));
    }
    let (salt, rest) = raw.split_at(SALT_LEN);
    let (iv, body) = rest.split_at(IV_LEN);

    let derived = derive_key(key, salt, mode);
    let plaintext = decrypt_blocks(body, &derived, iv)?;
    String::from_utf8(plaintext)
        .map_err(|_| adapter_error("decrypted bytes are not UTF-8; wrong key or mode".into()))
}

/// Derive the working key from the key string and a per-message salt
fn derive_key(key: &str, salt: &[u8], mode: SecurityMode) -> Vec<u8> {
    let mut out = vec![0u8; mode.aes_bits() / 8];
    pbkdf2_hmac::<Sha256>(key.as_bytes(), salt, mode.pbkdf2_rounds(), &mut out);
    out
}

fn encrypt_blocks(plaintext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
    let ciphertext = match key.len() {
        16 => cbc::Encryptor::<Aes128>::new_from_slices(key, iv)
            .map_err(|e| adapter_error(e.to_string()))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        24 => cbc::Encryptor::<Aes192>::new_from_slices(key, iv)
            .map_err(|e| adapter_error(e.to_string()))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        32 => cbc::Encryptor::<Aes256>::new_from_slices(key, iv)
            .map_err(|e| adapter_error(e.to_string()))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        other => {
            return Err(adapter_error(format!(
                "unsupported AES key length {} bytes",
                other
            )))
        }
    };
    Ok(ciphertext)
}

fn decrypt_blocks(ciphertext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
    let result = match key.len() {
        16 => cbc::Decryptor::<Aes128>::new_from_slices(key, iv)
            .map_err(|e| adapter_error(e.to_string()))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        24 => cbc::Decryptor::<Aes192>::new_from_slices(key, iv)
            .map_err(|e| adapter_error(e.to_string()))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        32 => cbc::Decryptor::<Aes256>::new_from_slices(key, iv)
            .map_err(|e| adapter_error(e.to_string()))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        other => {
            return Err(adapter_error(format!(
                "unsupported AES key length {} bytes",
                other
            )))
        }
    };
    result.map_err(|_| adapter_error("padding check failed; wrong key or corrupted ciphertext".into()))
}

fn adapter_error(cause: String) -> CipherStackError {
    CipherStackError::AdapterFailure {
        algorithm: Algorithm::Aes,
        cause,
    }
}

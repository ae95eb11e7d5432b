//! Blowfish-CBC adapter
//!
//! Same envelope discipline as the AES adapter but with Blowfish's 8-byte
//! block: `base64(salt || iv || ciphertext)` with a 16-byte salt and an
//! 8-byte IV. Blowfish accepts variable key lengths, so the PBKDF2 output
//! is sized directly from the mode (448/256/128 bits).

use crate::error::{CipherStackError, Result};
use crate::policy::{Algorithm, SecurityMode};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use blowfish::cipher::{
    block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, InnerIvInit, KeyInit,
};
use blowfish::Blowfish;
use pbkdf2::pbkdf2_hmac;
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;

const SALT_LEN: usize = 16;

/// Blowfish block size
const IV_LEN: usize = 8;

/// Generate a hex key string of the mode's Blowfish bit length
pub fn generate_key(mode: SecurityMode) -> String {
    let mut bytes = vec![0u8; mode.blowfish_bits() / 8];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Encrypt UTF-8 text into the salted base64 envelope
pub fn encrypt(plaintext: &str, key: &str, mode: SecurityMode) -> Result<String> {
    let mut salt = [0u8; SALT_LEN];
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut iv);

    // Blowfish takes variable key lengths (4-56 bytes), so the cipher is
    // built from the slice first and handed to the CBC wrapper
    let derived = derive_key(key, &salt, mode);
    let cipher: Blowfish = Blowfish::new_from_slice(&derived).map_err(|e| adapter_error(e.to_string()))?;
    let ciphertext = cbc::Encryptor::inner_iv_slice_init(cipher, &iv)
        .map_err(|e| adapter_error(e.to_string()))?
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

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
    let cipher: Blowfish = Blowfish::new_from_slice(&derived).map_err(|e| adapter_error(e.to_string()))?;
    let plaintext = cbc::Decryptor::inner_iv_slice_init(cipher, iv)
        .map_err(|e| adapter_error(e.to_string()))?
        .decrypt_padded_vec_mut::<Pkcs7>(body)
        .map_err(|_| {
            adapter_error("padding check failed; wrong key or corrupted ciphertext".into())
        })?;
    String::from_utf8(plaintext)
        .map_err(|_| adapter_error("decrypted bytes are not UTF-8; wrong key or mode".into()))
}

fn derive_key(key: &str, salt: &[u8], mode: SecurityMode) -> Vec<u8> {
    let mut out = vec![0u8; mode.blowfish_bits() / 8];
    pbkdf2_hmac::<Sha256>(key.as_bytes(), salt, mode.pbkdf2_rounds(), &mut out);
    out
}

fn adapter_error(cause: String) -> CipherStackError {
    CipherStackError::AdapterFailure {
        algorithm: Algorithm::Blowfish,
        cause,
    }
}

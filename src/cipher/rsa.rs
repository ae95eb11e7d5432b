//! RSA-OAEP adapter
//!
//! The opaque key string is a JSON pair of PKCS#8 PEM texts. Plaintext is
//! chunked to fit under the OAEP size limit, each chunk encrypted and
//! base64-encoded, and the chunks joined with `|` (not a base64 character),
//! so decryption can split unambiguously.

use crate::error::{CipherStackError, Result};
use crate::keys::RsaKeyPair;
use crate::policy::{Algorithm, SecurityMode};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;

/// OAEP overhead for a SHA-1 digest: 2 * 20 + 2 bytes
const OAEP_OVERHEAD: usize = 42;

/// Chunk separator; the base64 alphabet cannot produce it
const CHUNK_SEPARATOR: &str = "|";

/// Generate a key pair at the mode's modulus size, serialized as JSON PEM
///
/// This is the one latency-heavy generation step in the registry; 4096-bit
/// keys can take seconds.
pub fn generate_key(mode: SecurityMode) -> Result<String> {
    let mut rng = OsRng;
    let private = RsaPrivateKey::new(&mut rng, mode.rsa_bits())
        .map_err(|e| adapter_error(format!("key generation failed: {}", e)))?;
    let public = RsaPublicKey::from(&private);

    let pair = RsaKeyPair {
        public_key: public
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| adapter_error(format!("public key encoding failed: {}", e)))?,
        private_key: private
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| adapter_error(format!("private key encoding failed: {}", e)))?
            .to_string(),
    };
    pair.to_json()
}

/// Encrypt UTF-8 text, chunking to the modulus size minus OAEP overhead
pub fn encrypt(plaintext: &str, pair: &RsaKeyPair) -> Result<String> {
    if plaintext.is_empty() {
        return Ok(String::new());
    }
    let public = RsaPublicKey::from_public_key_pem(&pair.public_key)
        .map_err(|e| CipherStackError::CorruptKey(format!("public key PEM: {}", e)))?;

    let chunk_limit = public.size().saturating_sub(OAEP_OVERHEAD);
    if chunk_limit == 0 {
        return Err(adapter_error(
            "modulus is too small to hold any OAEP payload".into(),
        ));
    }

    let mut rng = OsRng;
    let mut chunks = Vec::new();
    for chunk in plaintext.as_bytes().chunks(chunk_limit) {
        let ciphertext = public
            .encrypt(&mut rng, Oaep::new::<Sha1>(), chunk)
            .map_err(|e| adapter_error(format!("encryption failed: {}", e)))?;
        chunks.push(BASE64.encode(ciphertext));
    }
    Ok(chunks.join(CHUNK_SEPARATOR))
}

/// Decrypt by splitting on the chunk separator and decoding each chunk
pub fn decrypt(ciphertext: &str, pair: &RsaKeyPair) -> Result<String> {
    if ciphertext.is_empty() {
        return Ok(String::new());
    }
    let private = RsaPrivateKey::from_pkcs8_pem(&pair.private_key)
        .map_err(|e| CipherStackError::CorruptKey(format!("private key PEM: {}", e)))?;

    let mut plaintext = Vec::new();
    for chunk in ciphertext.split(CHUNK_SEPARATOR) {
        let raw = BASE64
            .decode(chunk)
            .map_err(|e| adapter_error(format!("chunk is not valid base64: {}", e)))?;
        let decrypted = private
            .decrypt(Oaep::new::<Sha1>(), &raw)
            .map_err(|_| {
                adapter_error("decryption failed; wrong key or corrupted ciphertext".into())
            })?;
        plaintext.extend_from_slice(&decrypted);
    }
    String::from_utf8(plaintext)
        .map_err(|_| adapter_error("decrypted bytes are not UTF-8; wrong key or mode".into()))
}

fn adapter_error(cause: String) -> CipherStackError {
    CipherStackError::AdapterFailure {
        algorithm: Algorithm::Rsa,
        cause,
    }
}

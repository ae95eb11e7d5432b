use crate::error::{CipherStackError, Result};
use crate::policy::{Algorithm, SecurityMode};
use rand::{rngs::OsRng, Rng};

/// Generate an uppercase alphabetic key of the mode's length
pub fn generate_key(mode: SecurityMode) -> String {
    let mut rng = OsRng;
    (0..mode.vigenere_len())
        .map(|_| (b'A' + rng.gen_range(0..26)) as char)
        .collect()
}

/// Validate a key and convert it to per-letter rotation offsets
///
/// The key must be non-empty and alphabetic; case does not matter.
pub fn key_offsets(key: &str) -> Result<Vec<u32>> {
    if key.is_empty() {
        return Err(CipherStackError::EmptyKey);
    }
    key.chars()
        .map(|c| match c {
            'a'..='z' => Ok((c as u8 - b'a') as u32),
            'A'..='Z' => Ok((c as u8 - b'A') as u32),
            other => Err(CipherStackError::InvalidKeyFormat {
                algorithm: Algorithm::Vigenere,
                detail: format!("key must be alphabetic, found {:?}", other),
            }),
        })
        .collect()
}

/// Apply the repeating key forward
///
/// The key index advances only when a letter is processed, so punctuation
/// and spacing never consume a key position.
pub fn encrypt(text: &str, offsets: &[u32]) -> String {
    transform(text, offsets, false)
}

/// Apply the repeating key backward
pub fn decrypt(text: &str, offsets: &[u32]) -> String {
    transform(text, offsets, true)
}

fn transform(text: &str, offsets: &[u32], invert: bool) -> String {
    let mut key_index = 0usize;
    text.chars()
        .map(|c| {
            let base = match c {
                'a'..='z' => b'a',
                'A'..='Z' => b'A',
                other => return other,
            };
            let offset = offsets[key_index % offsets.len()];
            let shift = if invert { (26 - offset % 26) % 26 } else { offset % 26 };
            key_index += 1;
            let position = (c as u8 - base) as u32;
            (base + ((position + shift) % 26) as u8) as char
        })
        .collect()
}

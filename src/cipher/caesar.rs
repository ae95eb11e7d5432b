use crate::error::{CipherStackError, Result};
use crate::policy::{Algorithm, SecurityMode};
use rand::{rngs::OsRng, Rng};

/// Key prefix for the wire form `SHIFT-<integer>`
const KEY_PREFIX: &str = "SHIFT-";

/// Generate a Caesar key with a shift drawn from the mode's range
pub fn generate_key(mode: SecurityMode) -> String {
    let mut rng = OsRng;
    let shift = rng.gen_range(1..=mode.caesar_shift_max());
    format!("{}{}", KEY_PREFIX, shift)
}

/// Parse a `SHIFT-<integer>` key string
pub fn parse_shift(key: &str) -> Result<u32> {
    key.strip_prefix(KEY_PREFIX)
        .and_then(|digits| digits.parse::<u32>().ok())
        .ok_or_else(|| CipherStackError::InvalidKeyFormat {
            algorithm: Algorithm::Caesar,
            detail: format!("expected SHIFT-<integer>, got {:?}", key),
        })
}

/// Rotate alphabetic characters forward by `shift`
///
/// Non-alphabetic characters pass through unchanged; case is preserved.
pub fn encrypt(text: &str, shift: u32) -> String {
    rotate(text, shift % 26)
}

/// Rotate alphabetic characters back by applying the complementary shift
pub fn decrypt(text: &str, shift: u32) -> String {
    rotate(text, (26 - shift % 26) % 26)
}

fn rotate(text: &str, shift: u32) -> String {
    text.chars()
        .map(|c| match c {
            'a'..='z' => shift_from(c, b'a', shift),
            'A'..='Z' => shift_from(c, b'A', shift),
            other => other,
        })
        .collect()
}

fn shift_from(c: char, base: u8, shift: u32) -> char {
    let offset = (c as u8 - base) as u32;
    (base + ((offset + shift) % 26) as u8) as char
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let shift = 7;
        let text = "Hello World";
        let ciphertext = encrypt(text, shift);
        assert_ne!(ciphertext, text);
        assert_eq!(decrypt(&ciphertext, shift), text);
    }

    #[test]
    fn test_known_shift() {
        assert_eq!(encrypt("abc", 1), "bcd");
        assert_eq!(encrypt("XYZ", 3), "ABC");
    }

    #[test]
    fn test_non_alphabetic_pass_through() {
        let text = "a1b2-c3! d4?";
        let ciphertext = encrypt(text, 5);
        for (original, encrypted) in text.chars().zip(ciphertext.chars()) {
            if original.is_ascii_alphabetic() {
                assert_ne!(original, encrypted);
            } else {
                assert_eq!(original, encrypted);
            }
        }
    }

    #[test]
    fn test_case_preserved() {
        let ciphertext = encrypt("AbCd", 9);
        assert!(ciphertext.chars().nth(0).unwrap().is_uppercase());
        assert!(ciphertext.chars().nth(1).unwrap().is_lowercase());
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(encrypt("", 13), "");
        assert_eq!(decrypt("", 13), "");
    }

    #[test]
    fn test_large_shift_wraps() {
        assert_eq!(encrypt("abc", 27), encrypt("abc", 1));
        assert_eq!(decrypt(&encrypt("abc", 100), 100), "abc");
    }

    #[test]
    fn test_parse_shift() {
        assert_eq!(parse_shift("SHIFT-7").unwrap(), 7);
        assert!(parse_shift("shift-7").is_err());
        assert!(parse_shift("SHIFT-").is_err());
        assert!(parse_shift("SHIFT-x").is_err());
        assert!(parse_shift("7").is_err());
    }

    #[test]
    fn test_generated_key_parses_within_range() {
        for mode in crate::policy::SecurityMode::ALL {
            for _ in 0..20 {
                let key = generate_key(mode);
                let shift = parse_shift(&key).unwrap();
                assert!(shift >= 1 && shift <= mode.caesar_shift_max());
            }
        }
    }
}

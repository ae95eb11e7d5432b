//! Hill cipher over blocks of letters modulo 26
//!
//! Arbitrary text is supported by first encoding every character code as a
//! fixed 3-letter base-26 group, then padding the letter stream to a block
//! multiple. The pad length travels as a 2-letter base-26 prefix prepended
//! to the ciphertext, so decryption can trim exactly what was added.

use crate::error::{CipherStackError, Result};
use crate::policy::Algorithm;
use rand::{rngs::OsRng, Rng};

/// Shipped block size: 2x2 key matrices
pub const BLOCK_SIZE: usize = 2;

const MODULUS: i64 = 26;

/// Keygen attempts before falling back to the fixed known-invertible matrix
const MAX_KEYGEN_ATTEMPTS: usize = 100;

/// det = 3*5 - 3*2 = 9, coprime with 26
const FALLBACK_MATRIX: [[i64; BLOCK_SIZE]; BLOCK_SIZE] = [[3, 3], [2, 5]];

/// Highest character code a 3-letter base-26 group can carry (26^3 - 1)
pub const MAX_CHAR_CODE: u32 = 17_575;

/// Letters per encoded character
const LETTERS_PER_CHAR: usize = 3;

/// Letters in the pad-length prefix, carrying a base-26 value 0..=675
const PREFIX_LETTERS: usize = 2;

/// Sentinel letter used for padding ('X')
const PAD_LETTER_VALUE: i64 = 23;

/// An N×N key matrix with entries reduced modulo 26
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HillKey {
    matrix: Vec<Vec<i64>>,
}

impl HillKey {
    /// Build a key from a raw matrix, validating squareness
    pub fn new(matrix: Vec<Vec<i64>>) -> Result<Self> {
        let n = matrix.len();
        if n == 0 || matrix.iter().any(|row| row.len() != n) {
            return Err(CipherStackError::InvalidKeyFormat {
                algorithm: Algorithm::Hill,
                detail: "key must be a non-empty square integer matrix".into(),
            });
        }
        let matrix = matrix
            .into_iter()
            .map(|row| row.into_iter().map(|v| v.rem_euclid(MODULUS)).collect())
            .collect();
        Ok(Self { matrix })
    }

    /// Parse the JSON wire form (an array of integer arrays)
    pub fn from_json(raw: &str) -> Result<Self> {
        let matrix: Vec<Vec<i64>> =
            serde_json::from_str(raw).map_err(|e| CipherStackError::InvalidKeyFormat {
                algorithm: Algorithm::Hill,
                detail: format!("key does not deserialize to an integer matrix: {}", e),
            })?;
        Self::new(matrix)
    }

    /// Serialize to the JSON wire form
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.matrix)?)
    }

    /// Matrix dimension (= cipher block size)
    pub fn size(&self) -> usize {
        self.matrix.len()
    }

    /// Determinant reduced modulo 26
    pub fn determinant(&self) -> i64 {
        determinant(&self.matrix).rem_euclid(MODULUS)
    }

    /// Whether an inverse exists modulo 26
    pub fn is_invertible(&self) -> bool {
        gcd(self.determinant(), MODULUS) == 1
    }

    /// Modular inverse matrix via adjugate / determinant-inverse
    pub fn inverse(&self) -> Result<Self> {
        let det = self.determinant();
        let det_inverse = mod_inverse(det).ok_or(CipherStackError::KeyNotInvertible)?;
        let adjugate = adjugate(&self.matrix);
        let matrix = adjugate
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|v| (v * det_inverse).rem_euclid(MODULUS))
                    .collect()
            })
            .collect();
        Ok(Self { matrix })
    }
}

/// Generate a random invertible key matrix
///
/// Samples entries in [0,25] until the determinant is coprime with 26,
/// falling back to a fixed known-invertible matrix after 100 attempts so a
/// non-invertible matrix is never handed out as the current key.
pub fn generate_key() -> HillKey {
    let mut rng = OsRng;
    for _ in 0..MAX_KEYGEN_ATTEMPTS {
        let matrix: Vec<Vec<i64>> = (0..BLOCK_SIZE)
            .map(|_| (0..BLOCK_SIZE).map(|_| rng.gen_range(0..MODULUS)).collect())
            .collect();
        let key = HillKey { matrix };
        if key.is_invertible() {
            return key;
        }
    }
    HillKey {
        matrix: FALLBACK_MATRIX.iter().map(|row| row.to_vec()).collect(),
    }
}

/// Encrypt text with the key matrix
///
/// Invertibility is not checked here; only decryption requires an inverse.
pub fn encrypt(text: &str, key: &HillKey) -> Result<String> {
    let n = key.size();
    let mut letters = encode_text(text)?;

    let pad = (n - letters.len() % n) % n;
    let prefix_capacity = MODULUS.pow(PREFIX_LETTERS as u32) as usize;
    if pad >= prefix_capacity {
        return Err(adapter_error(format!(
            "block size {} needs more padding than the {}-letter prefix can record",
            n, PREFIX_LETTERS
        )));
    }
    letters.extend(std::iter::repeat(PAD_LETTER_VALUE).take(pad));

    let mut out = String::with_capacity(PREFIX_LETTERS + letters.len());
    out.push(value_to_letter((pad as i64) / MODULUS));
    out.push(value_to_letter((pad as i64) % MODULUS));

    for block in letters.chunks(n) {
        for row in 0..n {
            let sum: i64 = (0..n).map(|col| key.matrix[row][col] * block[col]).sum();
            out.push(value_to_letter(sum.rem_euclid(MODULUS)));
        }
    }
    Ok(out)
}

/// Decrypt text with the inverse of the key matrix
///
/// A non-invertible key fails deterministically; there is no fallback.
pub fn decrypt(text: &str, key: &HillKey) -> Result<String> {
    let inverse = key.inverse()?;
    let n = inverse.size();

    let values: Vec<i64> = text.chars().map(letter_to_value).collect::<Result<_>>()?;
    if values.len() < PREFIX_LETTERS {
        return Err(adapter_error(
            "ciphertext is shorter than the padding prefix".into(),
        ));
    }
    let pad = (values[0] * MODULUS + values[1]) as usize;
    let body = &values[PREFIX_LETTERS..];
    if body.len() % n != 0 {
        return Err(adapter_error(format!(
            "ciphertext body length {} is not a multiple of the block size {}",
            body.len(),
            n
        )));
    }
    // pad is always < n by construction; anything else means the prefix or
    // the key does not belong to this ciphertext
    if pad >= n {
        return Err(adapter_error(format!(
            "padding prefix {} exceeds the block size {}",
            pad, n
        )));
    }

    let mut letters = Vec::with_capacity(body.len());
    for block in body.chunks(n) {
        for row in 0..n {
            let sum: i64 = (0..n)
                .map(|col| inverse.matrix[row][col] * block[col])
                .sum();
            letters.push(sum.rem_euclid(MODULUS));
        }
    }

    if pad > letters.len() {
        return Err(adapter_error(
            "padding prefix exceeds the ciphertext length".into(),
        ));
    }
    letters.truncate(letters.len() - pad);
    decode_text(&letters)
}

/// Encode each character as a 3-letter base-26 group
fn encode_text(text: &str) -> Result<Vec<i64>> {
    let mut letters = Vec::with_capacity(text.chars().count() * LETTERS_PER_CHAR);
    for c in text.chars() {
        let code = c as u32;
        if code > MAX_CHAR_CODE {
            return Err(adapter_error(format!(
                "character {:?} (code {}) is outside the supported range 0..={}",
                c, code, MAX_CHAR_CODE
            )));
        }
        let code = code as i64;
        letters.push(code / (MODULUS * MODULUS));
        letters.push((code / MODULUS) % MODULUS);
        letters.push(code % MODULUS);
    }
    Ok(letters)
}

/// Decode 3-letter base-26 groups back to characters
fn decode_text(letters: &[i64]) -> Result<String> {
    if letters.len() % LETTERS_PER_CHAR != 0 {
        return Err(adapter_error(format!(
            "decrypted letter stream length {} is not a multiple of {}",
            letters.len(),
            LETTERS_PER_CHAR
        )));
    }
    let mut out = String::with_capacity(letters.len() / LETTERS_PER_CHAR);
    for group in letters.chunks(LETTERS_PER_CHAR) {
        let code = (group[0] * MODULUS * MODULUS + group[1] * MODULUS + group[2]) as u32;
        let c = char::from_u32(code)
            .ok_or_else(|| adapter_error(format!("decoded invalid character code {}", code)))?;
        out.push(c);
    }
    Ok(out)
}

fn letter_to_value(c: char) -> Result<i64> {
    match c {
        'A'..='Z' => Ok((c as u8 - b'A') as i64),
        other => Err(adapter_error(format!(
            "ciphertext must be uppercase letters, found {:?}",
            other
        ))),
    }
}

fn value_to_letter(v: i64) -> char {
    (b'A' + v as u8) as char
}

fn adapter_error(cause: String) -> CipherStackError {
    CipherStackError::AdapterFailure {
        algorithm: Algorithm::Hill,
        cause,
    }
}

/// Determinant by cofactor expansion along the first row, generic over size
fn determinant(matrix: &[Vec<i64>]) -> i64 {
    let n = matrix.len();
    match n {
        0 => 1,
        1 => matrix[0][0],
        2 => matrix[0][0] * matrix[1][1] - matrix[0][1] * matrix[1][0],
        _ => (0..n)
            .map(|col| {
                let sign = if col % 2 == 0 { 1 } else { -1 };
                sign * matrix[0][col] * determinant(&minor(matrix, 0, col))
            })
            .sum(),
    }
}

/// The matrix with `row` and `col` removed
fn minor(matrix: &[Vec<i64>], row: usize, col: usize) -> Vec<Vec<i64>> {
    matrix
        .iter()
        .enumerate()
        .filter(|(r, _)| *r != row)
        .map(|(_, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(c, _)| *c != col)
                .map(|(_, v)| *v)
                .collect()
        })
        .collect()
}

/// Transpose of the cofactor matrix
fn adjugate(matrix: &[Vec<i64>]) -> Vec<Vec<i64>> {
    let n = matrix.len();
    let mut out = vec![vec![0i64; n]; n];
    for row in 0..n {
        for col in 0..n {
            let sign = if (row + col) % 2 == 0 { 1 } else { -1 };
            out[col][row] = sign * determinant(&minor(matrix, row, col));
        }
    }
    out
}

/// Multiplicative inverse of `a` modulo 26, if one exists
fn mod_inverse(a: i64) -> Option<i64> {
    let a = a.rem_euclid(MODULUS);
    (1..MODULUS).find(|x| (a * x).rem_euclid(MODULUS) == 1)
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a.abs()
}

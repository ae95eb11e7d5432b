use crate::error::{CipherStackError, Result};
use serde::{Deserialize, Serialize};

/// Cipher algorithms the registry can dispatch to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Aes,
    Rsa,
    Hill,
    Vigenere,
    Blowfish,
    Caesar,
}

impl Algorithm {
    /// Every algorithm the registry knows, in wire-name order
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Aes,
        Algorithm::Rsa,
        Algorithm::Hill,
        Algorithm::Vigenere,
        Algorithm::Blowfish,
        Algorithm::Caesar,
    ];

    /// Lowercase wire name, also used as the key-map key
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Aes => "aes",
            Algorithm::Rsa => "rsa",
            Algorithm::Hill => "hill",
            Algorithm::Vigenere => "vigenere",
            Algorithm::Blowfish => "blowfish",
            Algorithm::Caesar => "caesar",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Algorithm {
    type Err = CipherStackError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "aes" => Ok(Self::Aes),
            "rsa" => Ok(Self::Rsa),
            "hill" => Ok(Self::Hill),
            "vigenere" => Ok(Self::Vigenere),
            "blowfish" => Ok(Self::Blowfish),
            "caesar" => Ok(Self::Caesar),
            _ => Err(CipherStackError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Security mode: a named strength/speed tier
///
/// The mode fixes both the default algorithm chain and the per-algorithm
/// strength parameters. Keys are mode-specific because the sizes differ,
/// so a key bundle records the mode it was generated under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SecurityMode {
    High,
    #[default]
    Balanced,
    Lightweight,
}

impl SecurityMode {
    pub const ALL: [SecurityMode; 3] = [
        SecurityMode::High,
        SecurityMode::Balanced,
        SecurityMode::Lightweight,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SecurityMode::High => "high",
            SecurityMode::Balanced => "balanced",
            SecurityMode::Lightweight => "lightweight",
        }
    }

    /// The ordered algorithm chain this mode encrypts with
    ///
    /// The same list drives key generation and encryption order; decryption
    /// walks it in exact reverse. Hill is deliberately absent from every
    /// default chain: its letter-stream format cannot carry the base64
    /// envelopes the AES/RSA/Blowfish layers emit. It stays fully
    /// dispatchable on its own.
    pub fn chain(self) -> &'static [Algorithm] {
        match self {
            SecurityMode::High => &[
                Algorithm::Aes,
                Algorithm::Rsa,
                Algorithm::Vigenere,
                Algorithm::Blowfish,
                Algorithm::Caesar,
            ],
            SecurityMode::Balanced => {
                &[Algorithm::Aes, Algorithm::Vigenere, Algorithm::Blowfish]
            }
            SecurityMode::Lightweight => &[Algorithm::Caesar, Algorithm::Vigenere],
        }
    }

    /// AES key length in bits
    pub fn aes_bits(self) -> usize {
        match self {
            SecurityMode::High => 256,
            SecurityMode::Balanced => 192,
            SecurityMode::Lightweight => 128,
        }
    }

    /// Blowfish key length in bits
    pub fn blowfish_bits(self) -> usize {
        match self {
            SecurityMode::High => 448,
            SecurityMode::Balanced => 256,
            SecurityMode::Lightweight => 128,
        }
    }

    /// RSA modulus length in bits
    pub fn rsa_bits(self) -> usize {
        match self {
            SecurityMode::High => 4096,
            SecurityMode::Balanced => 2048,
            SecurityMode::Lightweight => 1024,
        }
    }

    /// Vigenere key length in letters
    pub fn vigenere_len(self) -> usize {
        match self {
            SecurityMode::High => 16,
            SecurityMode::Balanced => 12,
            SecurityMode::Lightweight => 8,
        }
    }

    /// Upper bound of the Caesar shift range (inclusive); the range narrows
    /// with weaker modes
    pub fn caesar_shift_max(self) -> u32 {
        match self {
            SecurityMode::High => 25,
            SecurityMode::Balanced => 20,
            SecurityMode::Lightweight => 13,
        }
    }

    /// PBKDF2 iteration count for the symmetric adapters
    pub fn pbkdf2_rounds(self) -> u32 {
        match self {
            SecurityMode::High => 10_000,
            SecurityMode::Balanced => 5_000,
            SecurityMode::Lightweight => 1_000,
        }
    }
}

impl std::fmt::Display for SecurityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for SecurityMode {
    type Err = CipherStackError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "balanced" => Ok(Self::Balanced),
            "lightweight" => Ok(Self::Lightweight),
            _ => Err(CipherStackError::UnknownMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_roundtrip_names() {
        for algorithm in Algorithm::ALL {
            let parsed: Algorithm = algorithm.name().parse().unwrap();
            assert_eq!(algorithm, parsed);
        }
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let err = "rot13".parse::<Algorithm>().unwrap_err();
        assert!(matches!(err, CipherStackError::UnknownAlgorithm(_)));
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("HIGH".parse::<SecurityMode>().unwrap(), SecurityMode::High);
        assert!("paranoid".parse::<SecurityMode>().is_err());
    }

    #[test]
    fn test_chain_lengths() {
        assert_eq!(SecurityMode::High.chain().len(), 5);
        assert_eq!(SecurityMode::Balanced.chain().len(), 3);
        assert_eq!(SecurityMode::Lightweight.chain().len(), 2);
    }

    #[test]
    fn test_chains_have_no_duplicates() {
        for mode in SecurityMode::ALL {
            let chain = mode.chain();
            let mut seen = std::collections::BTreeSet::new();
            for &algorithm in chain {
                assert!(seen.insert(algorithm), "{} repeats in {} chain", algorithm, mode);
            }
        }
    }

    #[test]
    fn test_strength_params_weaken_with_mode() {
        assert!(SecurityMode::High.aes_bits() > SecurityMode::Lightweight.aes_bits());
        assert!(SecurityMode::High.rsa_bits() > SecurityMode::Lightweight.rsa_bits());
        assert!(
            SecurityMode::High.caesar_shift_max() > SecurityMode::Lightweight.caesar_shift_max()
        );
        assert!(SecurityMode::High.pbkdf2_rounds() > SecurityMode::Lightweight.pbkdf2_rounds());
    }
}

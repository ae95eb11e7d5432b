use crate::policy::SecurityMode;
use std::fmt::Write;

/// Render every mode's chain and strength parameters
pub fn describe_modes() -> String {
    let mut out = String::new();
    for mode in SecurityMode::ALL {
        let chain: Vec<&str> = mode.chain().iter().map(|a| a.name()).collect();
        let _ = writeln!(out, "{} ({} layers)", mode, mode.chain().len());
        let _ = writeln!(out, "  chain: {}", chain.join(" -> "));
        let _ = writeln!(
            out,
            "  aes: {} bits, blowfish: {} bits, rsa: {} bits",
            mode.aes_bits(),
            mode.blowfish_bits(),
            mode.rsa_bits()
        );
        let _ = writeln!(
            out,
            "  vigenere: {} letters, caesar shift: 1-{}, pbkdf2 rounds: {}",
            mode.vigenere_len(),
            mode.caesar_shift_max(),
            mode.pbkdf2_rounds()
        );
    }
    out
}

//! Fallback substitution cipher.
//!
//! **This is obfuscation, not encryption.**  ASCII letters are rotated
//! by a shift derived from the passkey; everything else passes through
//! unchanged.  There is no integrity check, so decrypting with the wrong
//! passkey quietly produces the wrong text.  It exists only for builds
//! without the `aead` feature or when the AEAD backend fails its
//! self-test.
//!
//! Ciphertext layout: `<PREFIX>:<shifted text>` where `PREFIX` is a
//! random [`PREFIX_LEN`]-character tag that keeps two records holding
//! the same text distinguishable.  The prefix does not take part in the
//! shift.

use rand::Rng;

use crate::errors::{Result, SecureDataError};

/// Size of the alphabet being rotated.
const ALPHABET_LEN: u32 = 26;

/// Length of the random record prefix.
pub const PREFIX_LEN: usize = 16;

/// Separator between the prefix and the shifted text.
const SEPARATOR: char = ':';

/// Characters the random prefix is drawn from.
const PREFIX_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Caesar-style cipher keyed by the passkey.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstitutionCipher;

impl SubstitutionCipher {
    /// Obfuscate `plaintext` and tag it with a fresh random prefix.
    pub fn seal(&self, plaintext: &str, passkey: &str) -> String {
        let shifted = rotate(plaintext, shift_for(passkey));
        format!("{}{SEPARATOR}{shifted}", random_prefix())
    }

    /// Reverse `seal`.
    ///
    /// Only a missing separator is detectable as a failure.
    pub fn open(&self, ciphertext: &str, passkey: &str) -> Result<String> {
        let (_prefix, body) = ciphertext
            .split_once(SEPARATOR)
            .ok_or(SecureDataError::DecryptionFailed)?;
        Ok(rotate(body, ALPHABET_LEN - shift_for(passkey)))
    }
}

/// Shift derived from the passkey: sum of its character codes mod 26.
pub fn shift_for(passkey: &str) -> u32 {
    let sum: u64 = passkey.chars().map(|c| u64::from(u32::from(c))).sum();
    (sum % u64::from(ALPHABET_LEN)) as u32
}

/// Rotate ASCII letters forward by `shift`, preserving case.
fn rotate(text: &str, shift: u32) -> String {
    text.chars()
        .map(|c| {
            let base = if c.is_ascii_lowercase() {
                b'a'
            } else if c.is_ascii_uppercase() {
                b'A'
            } else {
                return c;
            };
            let offset = (c as u32 - u32::from(base) + shift) % ALPHABET_LEN;
            char::from(base + offset as u8)
        })
        .collect()
}

fn random_prefix() -> String {
    let mut rng = rand::rng();
    (0..PREFIX_LEN)
        .map(|_| char::from(PREFIX_CHARSET[rng.random_range(0..PREFIX_CHARSET.len())]))
        .collect()
}

//! AES-256-GCM authenticated encryption keyed from a passkey.
//!
//! Each call to `seal` derives the key with PBKDF2, generates a fresh
//! random 12-byte nonce and prepends it to the ciphertext.  The result
//! is base64-encoded so it can be shown to users and stored as text.
//!
//! Layout of the decoded byte buffer:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use super::kdf::{derive_key, KdfParams, KEY_LEN};
use crate::errors::{Result, SecureDataError};

/// Size of the AES-256-GCM nonce in bytes.
const NONCE_LEN: usize = 12;

/// Passkey-keyed AES-256-GCM cipher.
#[derive(Debug, Clone)]
pub struct AeadCipher {
    params: KdfParams,
}

impl AeadCipher {
    /// Build a cipher, rejecting weak KDF parameters up front.
    pub fn new(params: KdfParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// The KDF parameters every key is derived with.
    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    /// Encrypt `plaintext` under a key derived from `passkey`.
    pub fn seal(&self, plaintext: &str, passkey: &str) -> Result<String> {
        let key = derive_key(passkey.as_bytes(), &self.params)?;
        let sealed = encrypt(&key[..], plaintext.as_bytes())?;
        Ok(BASE64.encode(sealed))
    }

    /// Decrypt text produced by `seal`.
    ///
    /// Any failure (bad base64, truncated data, wrong passkey, tampered
    /// bytes, non-UTF-8 output) collapses into `DecryptionFailed`.
    pub fn open(&self, ciphertext: &str, passkey: &str) -> Result<String> {
        let sealed = BASE64
            .decode(ciphertext.trim())
            .map_err(|_| SecureDataError::DecryptionFailed)?;
        let key = derive_key(passkey.as_bytes(), &self.params)?;
        let plaintext = decrypt(&key[..], &sealed)?;
        String::from_utf8(plaintext).map_err(|_| SecureDataError::DecryptionFailed)
    }

    /// Run one encrypt/decrypt cycle with a throwaway key.
    ///
    /// Used at startup to confirm the cipher backend actually works
    /// before committing to it.  Skips the KDF, which is validated
    /// separately by `new`.
    pub fn self_test() -> Result<()> {
        let key = [0x5Au8; KEY_LEN];
        let probe = b"securedata-self-test";
        let sealed = encrypt(&key, probe)?;
        let opened = decrypt(&key, &sealed)?;
        if opened != probe {
            return Err(SecureDataError::EncryptionFailed(
                "self-test round trip mismatch".into(),
            ));
        }
        Ok(())
    }
}

/// Encrypt `plaintext` with a 32-byte `key`.
///
/// Returns the nonce prepended to the ciphertext (nonce || ciphertext).
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| SecureDataError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| SecureDataError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

/// Decrypt data that was produced by `encrypt`.
pub fn decrypt(key: &[u8], ciphertext_with_nonce: &[u8]) -> Result<Vec<u8>> {
    if ciphertext_with_nonce.len() < NONCE_LEN {
        return Err(SecureDataError::DecryptionFailed);
    }

    let (nonce_bytes, ciphertext) = ciphertext_with_nonce.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| SecureDataError::DecryptionFailed)?;

    // The auth tag check is what turns a wrong key into an error
    // instead of garbage output.
    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| SecureDataError::DecryptionFailed)
}

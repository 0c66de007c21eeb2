//! Cipher selection.
//!
//! `CipherProvider` is the single interface the vault uses to encrypt
//! and decrypt.  Which variant backs it is decided once, at startup, by
//! `CipherProvider::detect`.

use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(feature = "aead")]
use super::aead::AeadCipher;
use super::kdf::KdfParams;
use super::substitution::SubstitutionCipher;
use crate::errors::Result;

/// Which cipher the host would like to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CipherPreference {
    /// Use AES-256-GCM when available, otherwise fall back.
    #[default]
    Auto,
    /// Always use the substitution cipher.
    Substitution,
}

/// The variant actually in use, for status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherKind {
    Aead,
    Substitution,
}

impl CipherKind {
    /// `false` for the obfuscation-only fallback.
    pub fn is_cryptographic(self) -> bool {
        matches!(self, Self::Aead)
    }

    /// Human-readable description of the scheme.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Aead => "PBKDF2-HMAC-SHA256 + AES-256-GCM",
            Self::Substitution => "substitution cipher (obfuscation only, no integrity check)",
        }
    }
}

impl fmt::Display for CipherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aead => f.write_str("aead"),
            Self::Substitution => f.write_str("substitution"),
        }
    }
}

/// Encrypts and decrypts record text under a passkey.
#[derive(Debug, Clone)]
pub enum CipherProvider {
    #[cfg(feature = "aead")]
    Aead(AeadCipher),
    Substitution(SubstitutionCipher),
}

impl CipherProvider {
    /// Pick the strongest cipher this build can actually run.
    ///
    /// Invalid `params` are an error, never a reason to downgrade. The
    /// substitution fallback is only chosen when the configuration asks
    /// for it, the `aead` feature is not compiled in, or the AEAD backend
    /// fails its self-test.
    pub fn detect(preference: CipherPreference, params: &KdfParams) -> Result<Self> {
        params.validate()?;

        if preference == CipherPreference::Substitution {
            tracing::info!("substitution cipher requested by configuration");
            return Ok(Self::fallback());
        }

        #[cfg(feature = "aead")]
        {
            let cipher = AeadCipher::new(params.clone())?;
            match AeadCipher::self_test() {
                Ok(()) => {
                    tracing::debug!(iterations = params.iterations, "using AES-256-GCM");
                    return Ok(Self::Aead(cipher));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "AEAD self-test failed, falling back");
                }
            }
        }

        #[cfg(not(feature = "aead"))]
        {
            tracing::info!("built without the `aead` feature, falling back");
        }

        Ok(Self::fallback())
    }

    /// The obfuscation-only substitution cipher.
    pub fn fallback() -> Self {
        Self::Substitution(SubstitutionCipher)
    }

    /// Which variant this provider is.
    pub fn kind(&self) -> CipherKind {
        match self {
            #[cfg(feature = "aead")]
            Self::Aead(_) => CipherKind::Aead,
            Self::Substitution(_) => CipherKind::Substitution,
        }
    }

    /// Encrypt `plaintext` under `passkey`.
    pub fn encrypt(&self, plaintext: &str, passkey: &str) -> Result<String> {
        match self {
            #[cfg(feature = "aead")]
            Self::Aead(cipher) => cipher.seal(plaintext, passkey),
            Self::Substitution(cipher) => Ok(cipher.seal(plaintext, passkey)),
        }
    }

    /// Decrypt `ciphertext` under `passkey`.
    ///
    /// Under the substitution variant a wrong passkey is *not* detected.
    pub fn decrypt(&self, ciphertext: &str, passkey: &str) -> Result<String> {
        match self {
            #[cfg(feature = "aead")]
            Self::Aead(cipher) => cipher.open(ciphertext, passkey),
            Self::Substitution(cipher) => cipher.open(ciphertext, passkey),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SecureDataError;

    #[test]
    fn substitution_preference_forces_fallback() {
        let p =
            CipherProvider::detect(CipherPreference::Substitution, &KdfParams::default()).unwrap();
        assert_eq!(p.kind(), CipherKind::Substitution);
        assert!(!p.kind().is_cryptographic());
    }

    #[cfg(feature = "aead")]
    #[test]
    fn auto_prefers_aead() {
        let p = CipherProvider::detect(CipherPreference::Auto, &KdfParams::default()).unwrap();
        assert_eq!(p.kind(), CipherKind::Aead);
        assert!(p.kind().is_cryptographic());
    }

    #[test]
    fn weak_params_are_rejected_not_downgraded() {
        let weak = KdfParams {
            iterations: 50_000,
            ..KdfParams::default()
        };
        for preference in [CipherPreference::Auto, CipherPreference::Substitution] {
            assert!(matches!(
                CipherProvider::detect(preference, &weak),
                Err(SecureDataError::KeyDerivationFailed(_))
            ));
        }
    }

    #[test]
    fn empty_salt_is_rejected() {
        let unsalted = KdfParams {
            salt: Vec::new(),
            ..KdfParams::default()
        };
        assert!(CipherProvider::detect(CipherPreference::Auto, &unsalted).is_err());
    }

    #[cfg(not(feature = "aead"))]
    #[test]
    fn auto_without_feature_falls_back() {
        let p = CipherProvider::detect(CipherPreference::Auto, &KdfParams::default()).unwrap();
        assert_eq!(p.kind(), CipherKind::Substitution);
    }

    #[test]
    fn fallback_roundtrip_through_provider() {
        let p = CipherProvider::fallback();
        let ct = p.encrypt("hello world", "Secret123!").unwrap();
        assert_eq!(p.decrypt(&ct, "Secret123!").unwrap(), "hello world");
    }

    #[test]
    fn preference_parses_lowercase() {
        let p: CipherPreference = serde_json::from_str("\"substitution\"").unwrap();
        assert_eq!(p, CipherPreference::Substitution);
    }
}

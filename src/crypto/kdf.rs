//! Passkey-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! PBKDF2 iterates HMAC-SHA256 many times so every passkey guess costs
//! an attacker the same work it costs us.  The iteration count and salt
//! are configurable via `KdfParams` (loaded from `.securedata.toml` or
//! sensible defaults).

#[cfg(feature = "aead")]
use hmac::Hmac;
#[cfg(feature = "aead")]
use sha2::Sha256;
#[cfg(feature = "aead")]
use zeroize::Zeroizing;

use crate::errors::{Result, SecureDataError};

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Minimum safe iteration count.
pub const MIN_ITERATIONS: u32 = 100_000;

/// Salt used when none is configured.
pub const DEFAULT_SALT: &str = "securedata.v1";

/// Configurable PBKDF2 parameters.
///
/// The salt is fixed per installation rather than per record: the same
/// passkey must always map to the same key so any record stored under it
/// can be decrypted later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KdfParams {
    /// Number of HMAC-SHA256 iterations (default: 100 000).
    pub iterations: u32,
    /// Salt bytes mixed into every derivation.
    pub salt: Vec<u8>,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: MIN_ITERATIONS,
            salt: DEFAULT_SALT.as_bytes().to_vec(),
        }
    }
}

impl KdfParams {
    /// Reject parameters that would make derivation dangerously cheap.
    pub fn validate(&self) -> Result<()> {
        if self.iterations < MIN_ITERATIONS {
            return Err(SecureDataError::KeyDerivationFailed(format!(
                "PBKDF2 iterations must be at least {MIN_ITERATIONS} (got {})",
                self.iterations
            )));
        }
        if self.salt.is_empty() {
            return Err(SecureDataError::KeyDerivationFailed(
                "PBKDF2 salt cannot be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Derive a 32-byte key from a passkey.
///
/// The same passkey + params will always produce the same key.  The
/// returned buffer is wiped when dropped.
#[cfg(feature = "aead")]
pub fn derive_key(passkey: &[u8], params: &KdfParams) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    params.validate()?;

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2::<Hmac<Sha256>>(passkey, &params.salt, params.iterations, &mut key[..])
        .map_err(|e| SecureDataError::KeyDerivationFailed(format!("PBKDF2 failed: {e}")))?;

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "aead")]
    #[test]
    fn same_inputs_same_key() {
        let params = KdfParams::default();
        let k1 = derive_key(b"Secret123!", &params).unwrap();
        let k2 = derive_key(b"Secret123!", &params).unwrap();
        assert_eq!(*k1, *k2);
    }

    #[cfg(feature = "aead")]
    #[test]
    fn different_salt_different_key() {
        let a = KdfParams::default();
        let b = KdfParams {
            salt: b"another-salt".to_vec(),
            ..KdfParams::default()
        };
        let k1 = derive_key(b"Secret123!", &a).unwrap();
        let k2 = derive_key(b"Secret123!", &b).unwrap();
        assert_ne!(*k1, *k2);
    }

    #[test]
    fn rejects_low_iteration_count() {
        let params = KdfParams {
            iterations: 1_000,
            ..KdfParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(SecureDataError::KeyDerivationFailed(_))
        ));
    }

    #[test]
    fn rejects_empty_salt() {
        let params = KdfParams {
            salt: Vec::new(),
            ..KdfParams::default()
        };
        assert!(params.validate().is_err());
    }
}

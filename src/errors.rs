use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in SecureData.
#[derive(Debug, Error)]
pub enum SecureDataError {
    // --- Validation errors ---
    #[error("{0} cannot be empty")]
    EmptyInput(&'static str),

    #[error("Passkey mismatch — passkeys do not match")]
    PasskeyMismatch,

    // --- Access errors ---
    #[error("Incorrect passkey — {remaining_attempts} attempt(s) remaining")]
    AuthFailure { remaining_attempts: u32 },

    #[error("Too many failed attempts — locked for another {retry_after_secs}s")]
    LockedOut { retry_after_secs: u64 },

    #[error("No stored record matches '{0}'")]
    RecordNotFound(String),

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong passkey or corrupted data")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Storage errors ---
    #[error("Could not persist records to {path}: {reason}")]
    Persistence { path: PathBuf, reason: String },

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

impl SecureDataError {
    /// Whether this error is one the caller can fix by re-entering input
    /// (as opposed to an access or integrity problem).
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyInput(_) | Self::PasskeyMismatch)
    }
}

/// Convenience type alias for SecureData results.
pub type Result<T> = std::result::Result<T, SecureDataError>;

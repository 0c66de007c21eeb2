use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::crypto::kdf::{DEFAULT_SALT, MIN_ITERATIONS};
use crate::crypto::{CipherPreference, KdfParams};
use crate::errors::{Result, SecureDataError};
use crate::vault::lockout::{DEFAULT_LOCKOUT_SECS, DEFAULT_MAX_ATTEMPTS};
use crate::vault::{LockoutPolicy, VaultConfig};

/// Environment variable that overrides `master_password`.
pub const MASTER_PASSWORD_ENV: &str = "SECUREDATA_MASTER_PASSWORD";

/// Longest accepted lockout (one year).
const MAX_LOCKOUT_SECS: u64 = 365 * 24 * 60 * 60;

/// Project-level configuration, loaded from `.securedata.toml`.
///
/// Every field has a sensible default so SecureData works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// How long a lockout lasts, in seconds (default: 30).
    #[serde(default = "default_lockout_secs")]
    pub lockout_secs: u64,

    /// Consecutive failed retrievals before locking (default: 3).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Credential that lifts a lockout early.  Unset disables it.
    #[serde(default)]
    pub master_password: Option<String>,

    /// PBKDF2 iteration count (default: 100 000).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// PBKDF2 salt.  Changing it makes existing records undecryptable.
    #[serde(default = "default_salt")]
    pub salt: String,

    /// `auto` or `substitution`.
    #[serde(default)]
    pub cipher: CipherPreference,

    /// Where records are persisted (relative to the project dir).
    #[serde(default = "default_data_file")]
    pub data_file: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_lockout_secs() -> u64 {
    DEFAULT_LOCKOUT_SECS
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_kdf_iterations() -> u32 {
    MIN_ITERATIONS
}

fn default_salt() -> String {
    DEFAULT_SALT.to_string()
}

fn default_data_file() -> String {
    "encrypted_data.json".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            lockout_secs: default_lockout_secs(),
            max_attempts: default_max_attempts(),
            master_password: None,
            kdf_iterations: default_kdf_iterations(),
            salt: default_salt(),
            cipher: CipherPreference::default(),
            data_file: default_data_file(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".securedata.toml";

    /// Load settings from `<project_dir>/.securedata.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed or holds unusable values,
    /// an error is returned.  `SECUREDATA_MASTER_PASSWORD` overrides the
    /// file's master password.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        let mut settings = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            toml::from_str::<Settings>(&contents).map_err(|e| {
                SecureDataError::ConfigError(format!(
                    "Failed to parse {}: {e}",
                    config_path.display()
                ))
            })?
        } else {
            Self::default()
        };

        if let Ok(pw) = std::env::var(MASTER_PASSWORD_ENV) {
            if !pw.is_empty() {
                settings.master_password = Some(pw);
            }
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the vault cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(SecureDataError::ConfigError(
                "max_attempts must be at least 1".into(),
            ));
        }
        if self.lockout_secs > MAX_LOCKOUT_SECS {
            return Err(SecureDataError::ConfigError(format!(
                "lockout_secs cannot exceed {MAX_LOCKOUT_SECS} (got {})",
                self.lockout_secs
            )));
        }
        self.kdf_params()
            .validate()
            .map_err(|e| SecureDataError::ConfigError(e.to_string()))
    }

    /// Build the full path to the data file.
    ///
    /// Example: `project_dir/encrypted_data.json`
    pub fn data_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.data_file)
    }

    /// Convert the KDF settings into crypto-layer params.
    pub fn kdf_params(&self) -> KdfParams {
        KdfParams {
            iterations: self.kdf_iterations,
            salt: self.salt.as_bytes().to_vec(),
        }
    }

    /// Convert into the service-level configuration.
    pub fn vault_config(&self) -> VaultConfig {
        VaultConfig {
            lockout: LockoutPolicy {
                max_attempts: self.max_attempts,
                duration: Duration::seconds(self.lockout_secs.min(MAX_LOCKOUT_SECS) as i64),
            },
            master_password: self.master_password.clone().map(Zeroizing::new),
            kdf: self.kdf_params(),
            cipher: self.cipher,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

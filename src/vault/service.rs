//! High-level store/retrieve operations used by the CLI.
//!
//! `VaultService` ties the hasher, the cipher, the record store and the
//! lockout guard together.  One service is one session: its guard must
//! not be shared with other users, or one user's failures would lock
//! out another.

use std::path::Path;
use std::sync::Arc;

use zeroize::Zeroizing;

use crate::crypto::{
    hash_passkey, verify_passkey, CipherKind, CipherPreference, CipherProvider, KdfParams,
};
use crate::errors::{Result, SecureDataError};

use super::clock::{Clock, SystemClock};
use super::lockout::{LockoutGuard, LockoutPolicy, LockoutStatus};
use super::record::{Record, RecordMetadata};
use super::store::RecordStore;

/// Everything a host can tune about a session.
#[derive(Clone, Default)]
pub struct VaultConfig {
    pub lockout: LockoutPolicy,
    /// Credential that lifts a lockout early.  `None` disables
    /// re-authorization.
    pub master_password: Option<Zeroizing<String>>,
    pub kdf: KdfParams,
    pub cipher: CipherPreference,
}

/// Summary numbers for status displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultStats {
    pub stored_count: usize,
    pub cipher: CipherKind,
    pub lockout: LockoutStatus,
}

/// A single session's view of the vault.
pub struct VaultService {
    cipher: CipherProvider,
    store: RecordStore,
    guard: LockoutGuard,
    master_hash: Option<String>,
    clock: Arc<dyn Clock>,
}

impl VaultService {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Start a session over `store` using wall-clock time.
    pub fn new(config: &VaultConfig, store: RecordStore) -> Result<Self> {
        Self::with_clock(config, store, Arc::new(SystemClock))
    }

    /// Start a session with an explicit time source.
    ///
    /// Fails with `KeyDerivationFailed` when `config.kdf` is below the
    /// iteration floor or has an empty salt.
    pub fn with_clock(
        config: &VaultConfig,
        store: RecordStore,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.kdf.validate()?;
        let cipher = CipherProvider::detect(config.cipher, &config.kdf)?;
        if !cipher.kind().is_cryptographic() {
            tracing::info!("records will only be obfuscated, not encrypted");
        }

        Ok(Self {
            cipher,
            store,
            guard: LockoutGuard::new(config.lockout),
            master_hash: config.master_password.as_ref().map(|pw| hash_passkey(pw)),
            clock,
        })
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Encrypt `plaintext` under `passkey` and keep it.
    ///
    /// Returns the new record's id.
    pub fn store(
        &mut self,
        plaintext: &str,
        passkey: &str,
        confirm_passkey: &str,
    ) -> Result<String> {
        if plaintext.is_empty() {
            return Err(SecureDataError::EmptyInput("data"));
        }
        if passkey.is_empty() {
            return Err(SecureDataError::EmptyInput("passkey"));
        }
        if passkey != confirm_passkey {
            return Err(SecureDataError::PasskeyMismatch);
        }

        let passkey_hash = hash_passkey(passkey);
        let ciphertext = self.cipher.encrypt(plaintext, passkey)?;

        let record = Record::new(ciphertext, passkey_hash, self.clock.now());
        let id = record.id.clone();
        self.store.put(record);

        tracing::debug!(id = %id, cipher = %self.cipher.kind(), "stored record");
        Ok(id)
    }

    /// Decrypt a stored record.
    ///
    /// `record_ref` may be the record id or its full ciphertext.  Only a
    /// passkey mismatch counts against the lockout guard.
    pub fn retrieve(&mut self, record_ref: &str, passkey: &str) -> Result<String> {
        let now = self.clock.now();
        self.guard.check(now)?;

        if record_ref.trim().is_empty() {
            return Err(SecureDataError::EmptyInput("record"));
        }
        if passkey.is_empty() {
            return Err(SecureDataError::EmptyInput("passkey"));
        }

        let record = self
            .store
            .resolve(record_ref)
            .ok_or_else(|| SecureDataError::RecordNotFound(record_ref.trim().to_string()))?;

        if !verify_passkey(passkey, &record.passkey_hash) {
            let remaining_attempts = self.guard.register_failure(now);
            tracing::debug!(id = %record.id, remaining_attempts, "passkey rejected");
            return Err(SecureDataError::AuthFailure { remaining_attempts });
        }

        self.guard.register_success();

        self.cipher
            .decrypt(&record.ciphertext, passkey)
            .inspect_err(|e| {
                tracing::error!(
                    id = %record.id,
                    error = %e,
                    "passkey matched but decryption failed, record may be corrupted"
                );
            })
    }

    /// Lift a lockout with the master credential.
    ///
    /// A wrong master password does not count against the guard; the
    /// returned `AuthFailure` reports the guard's unchanged remaining
    /// attempts.
    pub fn reauthorize(&mut self, master_password: &str) -> Result<()> {
        let Some(expected) = &self.master_hash else {
            return Err(SecureDataError::ConfigError(
                "no master password is configured".into(),
            ));
        };

        if !verify_passkey(master_password, expected) {
            tracing::warn!("master password rejected");
            return Err(SecureDataError::AuthFailure {
                remaining_attempts: self.guard.remaining_attempts(),
            });
        }

        self.guard.reset();
        Ok(())
    }

    /// Write records to the backing file, if there is one.
    pub fn persist(&mut self) -> Result<()> {
        self.store.persist().inspect_err(|e| {
            tracing::error!(error = %e, "failed to persist records");
        })
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn stats(&mut self) -> VaultStats {
        VaultStats {
            stored_count: self.store.count(),
            cipher: self.cipher.kind(),
            lockout: self.lockout_status(),
        }
    }

    pub fn lockout_status(&mut self) -> LockoutStatus {
        self.guard.status(self.clock.now())
    }

    pub fn cipher_kind(&self) -> CipherKind {
        self.cipher.kind()
    }

    /// Whether a master password was configured for re-authorization.
    pub fn can_reauthorize(&self) -> bool {
        self.master_hash.is_some()
    }

    pub fn record(&self, id: &str) -> Option<&Record> {
        self.store.get(id)
    }

    pub fn records(&self) -> Vec<RecordMetadata> {
        self.store.list()
    }

    /// The file records are mirrored to, if any.
    pub fn data_file(&self) -> Option<&Path> {
        self.store.path()
    }
}

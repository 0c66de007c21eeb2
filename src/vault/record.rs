//! Record and RecordMetadata types stored in the vault.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single encrypted record.
///
/// Created once by `VaultService::store` and never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Opaque id minted at creation (UUID v4).
    #[serde(skip)]
    pub id: String,

    /// Output of the active cipher.
    pub ciphertext: String,

    /// Hex SHA-256 of the passkey the record was stored under.
    pub passkey_hash: String,

    /// When this record was stored.
    pub created_at: DateTime<Utc>,
}

impl Record {
    /// Mint a new record with a fresh id.
    pub fn new(ciphertext: String, passkey_hash: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            ciphertext,
            passkey_hash,
            created_at,
        }
    }

    /// Lightweight view without ciphertext or hash.
    pub fn metadata(&self) -> RecordMetadata {
        RecordMetadata {
            id: self.id.clone(),
            created_at: self.created_at,
        }
    }
}

/// Lightweight metadata about a record.
///
/// Returned by `RecordStore::list` so callers can display ids and
/// timestamps without handling ciphertext.
#[derive(Debug, Clone)]
pub struct RecordMetadata {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

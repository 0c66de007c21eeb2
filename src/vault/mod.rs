//! Vault module — passkey-gated record storage.
//!
//! This module provides:
//! - `Record` and `RecordMetadata` types (`record`)
//! - The in-memory, file-mirrored `RecordStore` (`store`)
//! - The failed-attempt `LockoutGuard` and its time sources (`lockout`, `clock`)
//! - `VaultService`, the session object callers use (`service`)

pub mod clock;
pub mod lockout;
pub mod record;
pub mod service;
pub mod store;

// Re-export the most commonly used items.
pub use clock::{Clock, ManualClock, SystemClock};
pub use lockout::{GuardState, LockoutGuard, LockoutPolicy, LockoutStatus};
pub use record::{Record, RecordMetadata};
pub use service::{VaultConfig, VaultService, VaultStats};
pub use store::RecordStore;

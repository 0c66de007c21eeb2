//! Cryptographic primitives for SecureData.
//!
//! This module provides:
//! - SHA-256 passkey digests (`hasher`)
//! - PBKDF2 passkey-based key derivation (`kdf`)
//! - AES-256-GCM authenticated encryption (`aead`, `aead` feature)
//! - The obfuscation-only fallback cipher (`substitution`)
//! - Startup selection between the two ciphers (`provider`)

#[cfg(feature = "aead")]
pub mod aead;
pub mod hasher;
pub mod kdf;
pub mod provider;
pub mod substitution;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{hash_passkey, CipherProvider, ...};
pub use hasher::{hash_passkey, verify_passkey};
pub use kdf::KdfParams;
pub use provider::{CipherKind, CipherPreference, CipherProvider};

//! One-way passkey digests for verification.
//!
//! Records keep `SHA-256(passkey)` as lowercase hex so a retrieval can
//! check the supplied passkey without the passkey itself ever being
//! stored.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Hash a passkey to a fixed-length hex digest.
pub fn hash_passkey(passkey: &str) -> String {
    hex::encode(Sha256::digest(passkey.as_bytes()))
}

/// Check `passkey` against a digest produced by `hash_passkey`.
pub fn verify_passkey(passkey: &str, expected_hash: &str) -> bool {
    let actual = hash_passkey(passkey);
    actual.as_bytes().ct_eq(expected_hash.as_bytes()).into()
}

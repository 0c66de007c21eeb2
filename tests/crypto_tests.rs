//! Integration tests for the SecureData crypto module.

use securedata::crypto::substitution::{shift_for, SubstitutionCipher};
use securedata::crypto::{hash_passkey, verify_passkey, CipherKind, CipherProvider};
use securedata::errors::SecureDataError;

// ---------------------------------------------------------------------------
// Passkey hashing
// ---------------------------------------------------------------------------

#[test]
fn hash_is_deterministic_and_distinct() {
    let passkeys = ["Secret123!", "secret123!", "Secret123", "", " "];
    for pk in passkeys {
        assert_eq!(hash_passkey(pk), hash_passkey(pk));
    }
    for (i, a) in passkeys.iter().enumerate() {
        for b in &passkeys[i + 1..] {
            assert_ne!(hash_passkey(a), hash_passkey(b), "{a:?} vs {b:?}");
        }
    }
}

#[test]
fn verify_passkey_against_stored_hash() {
    let stored = hash_passkey("Secret123!");
    assert!(verify_passkey("Secret123!", &stored));
    assert!(!verify_passkey("Secret123", &stored));
}

// ---------------------------------------------------------------------------
// Fallback cipher
// ---------------------------------------------------------------------------

#[test]
fn fallback_roundtrip_keeps_non_letters() {
    let provider = CipherProvider::fallback();
    assert_eq!(provider.kind(), CipherKind::Substitution);

    let text = "Meet at 10:30, gate B — bring ID!";
    let sealed = provider.encrypt(text, "Secret123!").expect("encrypt");
    assert_eq!(provider.decrypt(&sealed, "Secret123!").expect("decrypt"), text);
}

#[test]
fn fallback_ciphertext_hides_letters_when_shift_nonzero() {
    assert_ne!(shift_for("Secret123!"), 0);
    let sealed = SubstitutionCipher.seal("hello world", "Secret123!");
    assert!(!sealed.contains("hello"));
}

#[test]
fn fallback_rejects_malformed_record() {
    let provider = CipherProvider::fallback();
    assert!(matches!(
        provider.decrypt("missing-separator", "pk"),
        Err(SecureDataError::DecryptionFailed)
    ));
}

// ---------------------------------------------------------------------------
// Preferred cipher (AES-256-GCM)
// ---------------------------------------------------------------------------

#[cfg(feature = "aead")]
mod aead {
    use super::*;
    use securedata::crypto::{CipherPreference, KdfParams};

    fn provider() -> CipherProvider {
        CipherProvider::detect(CipherPreference::Auto, &KdfParams::default()).unwrap()
    }

    #[test]
    fn detect_selects_aead() {
        assert_eq!(provider().kind(), CipherKind::Aead);
    }

    #[test]
    fn roundtrip() {
        let p = provider();
        for text in ["hello world", "ünïcödé ✓", "a"] {
            let sealed = p.encrypt(text, "Secret123!").expect("encrypt");
            assert_eq!(p.decrypt(&sealed, "Secret123!").expect("decrypt"), text);
        }
    }

    #[test]
    fn same_plaintext_encrypts_differently() {
        let p = provider();
        let a = p.encrypt("hello world", "Secret123!").unwrap();
        let b = p.encrypt("hello world", "Secret123!").unwrap();
        assert_ne!(a, b, "fresh nonce per encryption");
    }

    #[test]
    fn wrong_passkey_is_an_error_not_garbage() {
        let p = provider();
        let sealed = p.encrypt("hello world", "Secret123!").unwrap();
        for wrong in ["wrong", "Secret123", "secret123!"] {
            assert!(matches!(
                p.decrypt(&sealed, wrong),
                Err(SecureDataError::DecryptionFailed)
            ));
        }
    }

    #[test]
    fn tampered_ciphertext_fails() {
        use base64::engine::general_purpose::STANDARD as BASE64;
        use base64::Engine;

        let p = provider();
        let sealed = p.encrypt("hello world", "Secret123!").unwrap();
        let mut bytes = BASE64.decode(&sealed).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let tampered = BASE64.encode(bytes);

        assert!(p.decrypt(&tampered, "Secret123!").is_err());
    }

    #[test]
    fn different_salt_cannot_decrypt() {
        let p = provider();
        let other = CipherProvider::detect(
            CipherPreference::Auto,
            &KdfParams {
                salt: b"a-different-salt".to_vec(),
                ..KdfParams::default()
            },
        )
        .unwrap();
        let sealed = p.encrypt("hello world", "Secret123!").unwrap();
        assert!(other.decrypt(&sealed, "Secret123!").is_err());
    }
}

// ============================
// tests/unit/password_tests.rs
// ============================
//! Unit tests for password strength and hashing
use release_backend_lib::auth::password::{
    check_strength, hash_password, verify_password, CredentialHasher, ScryptHasher,
    WEAK_PASSWORD_MESSAGE,
};
use scrypt::Params;

#[test]
fn test_strength_rules() {
    assert!(check_strength("Abcdef1$"));
    assert!(check_strength("Zz9*Zz9*Zz9*"));

    // One rule missing at a time
    assert!(!check_strength("Abcde1$"));
    assert!(!check_strength("abcdef1$"));
    assert!(!check_strength("ABCDEF1$"));
    assert!(!check_strength("Abcdefg$"));
    assert!(!check_strength("Abcdefg1"));

    // Symbols outside the accepted set do not count
    assert!(!check_strength("Abcdef1?"));
    assert!(!check_strength("Abcdef1 "));
    assert!(!check_strength(""));
}

#[test]
fn test_length_counts_characters_not_utf16_units() {
    // Eight UTF-16 units but only six characters
    assert!(!check_strength("Ab1$\u{1F600}\u{1F600}"));
    assert!(check_strength("Ab1$\u{1F600}\u{1F600}xy"));
}

#[test]
fn test_weak_message_mentions_every_rule() {
    assert!(WEAK_PASSWORD_MESSAGE.contains("8 or more characters"));
    assert!(WEAK_PASSWORD_MESSAGE.contains("CAPITAL"));
}

#[test]
fn test_hash_is_salted() {
    let params = Params::new(4, 8, 1, 32).unwrap();
    let first = hash_password("Abcdef1$", params).unwrap();
    let second = hash_password("Abcdef1$", params).unwrap();

    assert_ne!(first, second);
    assert!(first.starts_with("$scrypt$"));
    assert!(verify_password("Abcdef1$", &first).unwrap());
    assert!(verify_password("Abcdef1$", &second).unwrap());
    assert!(!verify_password("abcdef1$", &first).unwrap());
}

#[tokio::test]
async fn test_hasher_trait_object() {
    let hasher: Box<dyn CredentialHasher> = Box::new(ScryptHasher::new(4).unwrap());
    let hash = hasher.hash("Abcdef1$").await.unwrap();

    assert!(!hash.contains("Abcdef1$"));
    assert!(hasher.verify("Abcdef1$", &hash).await.unwrap());
    assert!(!hasher.verify("Abcdef1%", &hash).await.unwrap());
    assert!(hasher.verify("Abcdef1$", "plaintext").await.is_err());
}

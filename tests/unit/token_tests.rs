// =========================
// tests/unit/token_tests.rs
// =========================
//! Unit tests for token issuing and verification
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use release_backend_lib::auth::{TokenPayload, TokenService, TOKEN_ISSUER};
use release_backend_lib::config::AuthSettings;
use serde_json::json;
use std::time::Duration;

const SECRET: &[u8] = b"token-tests-secret";
const HOUR: Duration = Duration::from_secs(3_600);

#[test]
fn test_from_settings() {
    let mut settings = AuthSettings::default();
    settings.jwt_secret = "s3cret".to_string();
    settings.jwt_algorithm = "HS384".to_string();

    let tokens = TokenService::from_settings(&settings).unwrap();
    assert_eq!(tokens.algorithm(), Algorithm::HS384);

    settings.jwt_algorithm = "ES256".to_string();
    assert!(TokenService::from_settings(&settings).is_err());

    settings.jwt_algorithm = "HS256".to_string();
    settings.jwt_secret.clear();
    assert!(TokenService::from_settings(&settings).is_err());
}

#[test]
fn test_payload_wire_names() {
    let payload = TokenPayload::new("a@b.com", 1_700_000_000);
    let value = serde_json::to_value(&payload).unwrap();
    assert_eq!(
        value,
        json!({ "iss": TOKEN_ISSUER, "email": "a@b.com", "exp": 1_700_000_000 })
    );
    assert!(payload.is_expired_at(1_700_000_000));
    assert!(!payload.is_expired_at(1_699_999_999));
}

#[test]
fn test_foreign_tokens_rejected() {
    let tokens = TokenService::new(SECRET, Algorithm::HS256).unwrap();
    let exp = chrono::Utc::now().timestamp() + 600;

    // Correct key and algorithm, but no issuer
    let no_issuer = encode(
        &Header::new(Algorithm::HS256),
        &json!({ "email": "a@b.com", "exp": exp }),
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap();
    assert!(tokens.verify(&no_issuer).is_none());

    // No exp claim
    let no_exp = encode(
        &Header::new(Algorithm::HS256),
        &json!({ "iss": TOKEN_ISSUER, "email": "a@b.com" }),
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap();
    assert!(tokens.verify(&no_exp).is_none());

    // Hand-built payload accepted when everything matches
    let good = encode(
        &Header::new(Algorithm::HS256),
        &json!({ "iss": TOKEN_ISSUER, "email": "a@b.com", "exp": exp }),
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap();
    assert_eq!(tokens.verify(&good).unwrap().email, "a@b.com");
}

#[test]
fn test_services_do_not_trust_each_other() {
    let a = TokenService::new(SECRET, Algorithm::HS256).unwrap();
    let b = TokenService::new(b"another-secret", Algorithm::HS256).unwrap();
    let c = TokenService::new(SECRET, Algorithm::HS512).unwrap();

    let token = a.issue("a@b.com", HOUR).unwrap();
    assert!(a.verify(&token).is_some());
    assert!(b.verify(&token).is_none());
    assert!(c.verify(&token).is_none());
}

#[test]
fn test_verify_never_panics_on_junk() {
    let tokens = TokenService::new(SECRET, Algorithm::HS256).unwrap();
    for junk in ["", ".", "..", "a.b.c", "eyJhbGciOiJIUzI1NiJ9..", "\u{0}\u{1}"] {
        assert!(tokens.verify(junk).is_none());
    }
}

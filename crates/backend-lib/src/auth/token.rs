// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
//! Signed identity tokens.
//!
//! `TokenService` is a pure crypto primitive: it signs payloads and checks
//! signatures, algorithm and issuer. It deliberately does not look at `exp`;
//! the caller decides what an expired token means.
use crate::config::AuthSettings;
use crate::error::AppError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Issuer claim stamped on every token
pub const TOKEN_ISSUER: &str = "Release";

/// Claims carried inside a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    #[serde(rename = "iss")]
    pub issuer: String,
    pub email: String,
    /// Expiry as seconds since the Unix epoch
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl TokenPayload {
    pub fn new(email: impl Into<String>, expires_at: i64) -> Self {
        Self {
            issuer: TOKEN_ISSUER.to_string(),
            email: email.into(),
            expires_at,
        }
    }

    /// A token is expired from its `exp` second onwards
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at <= now
    }
}

/// Whether `algorithm` signs with a shared secret
pub fn is_hmac(algorithm: Algorithm) -> bool {
    matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)
}

/// Current time in epoch seconds
pub fn now_epoch_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Issues and verifies HMAC-signed JWTs
///
/// Built once at startup and shared read-only between request tasks.
#[derive(Clone)]
pub struct TokenService {
    algorithm: Algorithm,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Create a token service for an HMAC algorithm
    pub fn new(secret: &[u8], algorithm: Algorithm) -> Result<Self, AppError> {
        if !is_hmac(algorithm) {
            return Err(AppError::Config(format!(
                "{algorithm:?} is not an HMAC algorithm"
            )));
        }
        if secret.is_empty() {
            return Err(AppError::Config("token secret is empty".to_string()));
        }

        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_issuer(&[TOKEN_ISSUER]);

        Ok(Self {
            algorithm,
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// Create a token service from the `[auth]` settings
    pub fn from_settings(settings: &AuthSettings) -> Result<Self, AppError> {
        let algorithm = Algorithm::from_str(&settings.jwt_algorithm).map_err(|_| {
            AppError::Config(format!("unknown algorithm '{}'", settings.jwt_algorithm))
        })?;
        Self::new(settings.jwt_secret.as_bytes(), algorithm)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Issue a token for `email` that expires `ttl` from now
    pub fn issue(&self, email: &str, ttl: Duration) -> Result<String, AppError> {
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let payload = TokenPayload::new(email, now_epoch_secs().saturating_add(ttl));
        self.sign(&payload)
    }

    /// Sign an explicit payload
    pub fn sign(&self, payload: &TokenPayload) -> Result<String, AppError> {
        encode(&Header::new(self.algorithm), payload, &self.encoding)
            .map_err(|e| AppError::Token(e.to_string()))
    }

    /// Verify a token and return its payload
    ///
    /// Any failure (malformed token, bad signature, other algorithm, foreign
    /// issuer) yields `None`. Expiry is not checked here.
    pub fn verify(&self, token: &str) -> Option<TokenPayload> {
        match decode::<TokenPayload>(token, &self.decoding, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!(error = %e, "token rejected");
                None
            }
        }
    }
}

// ============================
// crates/backend-lib/src/auth/authenticator.rs
// ============================
//! Decides whether a request is authenticated, by token or by credentials.
use super::password::CredentialHasher;
use super::token::{now_epoch_secs, TokenService};
use crate::error::AppError;
use crate::storage::UserStore;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// What the caller presents
#[derive(Debug, Clone)]
pub enum AuthRequest {
    /// A previously issued token
    Token(String),
    /// Email and plaintext password
    Credentials { email: String, password: String },
}

/// Why an attempt was refused
///
/// The HTTP layer collapses all of these into one answer so that callers
/// cannot probe which emails are registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Empty email, password or token
    MissingCredentials,
    /// Signature, algorithm, issuer or format check failed
    InvalidToken,
    /// Well-formed token past its `exp`
    Expired,
    /// No account for the email
    UnknownAccount,
    /// Account exists but the password does not match
    WrongPassword,
}

/// Result of an authentication attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Granted { email: String },
    Denied(DenyReason),
}

impl AuthOutcome {
    pub fn is_granted(&self) -> bool {
        matches!(self, AuthOutcome::Granted { .. })
    }

    /// Email of the authenticated account, if any
    pub fn email(&self) -> Option<&str> {
        match self {
            AuthOutcome::Granted { email } => Some(email),
            AuthOutcome::Denied(_) => None,
        }
    }
}

/// Composes the token service, credential store and password hasher
///
/// Read-only with respect to the store.
#[derive(Clone)]
pub struct Authenticator {
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<TokenService>,
    store_timeout: Duration,
}

impl Authenticator {
    pub fn new(
        store: Arc<dyn UserStore>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<TokenService>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
            store_timeout,
        }
    }

    /// Authenticate a request
    ///
    /// Denials are `Ok`; `Err` is reserved for store or hasher failures.
    pub async fn authenticate(&self, request: AuthRequest) -> Result<AuthOutcome, AppError> {
        match request {
            AuthRequest::Token(token) => self.by_token(&token).await,
            AuthRequest::Credentials { email, password } => {
                self.by_credentials(&email, &password).await
            },
        }
    }

    async fn by_token(&self, token: &str) -> Result<AuthOutcome, AppError> {
        if token.is_empty() {
            return Ok(AuthOutcome::Denied(DenyReason::MissingCredentials));
        }

        let Some(payload) = self.tokens.verify(token) else {
            return Ok(AuthOutcome::Denied(DenyReason::InvalidToken));
        };

        if payload.is_expired_at(now_epoch_secs()) {
            tracing::debug!(email = %payload.email, "token expired");
            return Ok(AuthOutcome::Denied(DenyReason::Expired));
        }

        if !self.bounded(self.store.exists(&payload.email)).await? {
            tracing::debug!(email = %payload.email, "token for unknown account");
            return Ok(AuthOutcome::Denied(DenyReason::UnknownAccount));
        }

        Ok(AuthOutcome::Granted {
            email: payload.email,
        })
    }

    async fn by_credentials(&self, email: &str, password: &str) -> Result<AuthOutcome, AppError> {
        if email.is_empty() || password.is_empty() {
            return Ok(AuthOutcome::Denied(DenyReason::MissingCredentials));
        }

        if !self.bounded(self.store.exists(email)).await? {
            return Ok(AuthOutcome::Denied(DenyReason::UnknownAccount));
        }

        // The record can disappear between the two reads
        let Some(record) = self.bounded(self.store.get(email)).await? else {
            return Ok(AuthOutcome::Denied(DenyReason::UnknownAccount));
        };

        if self.hasher.verify(password, &record.password_hash).await? {
            Ok(AuthOutcome::Granted {
                email: record.email,
            })
        } else {
            Ok(AuthOutcome::Denied(DenyReason::WrongPassword))
        }
    }

    /// Run a store call under the configured deadline
    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, AppError>>,
    ) -> Result<T, AppError> {
        tokio::time::timeout(self.store_timeout, call).await?
    }
}

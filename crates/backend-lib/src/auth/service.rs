// =============
// crates/backend-lib/src/auth/service.rs
// =============
//! This module defines the `AccountService` trait, which orchestrates signup,
//! login and auto-login on top of the authenticator.
use super::authenticator::{AuthOutcome, DenyReason};
use super::password::WEAK_PASSWORD_MESSAGE;
use crate::error::AppError;
use async_trait::async_trait;
use release_common::{LoginRequest, Notice, SignupRequest};
use std::time::Duration;

/// A freshly issued token and how long it is valid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub ttl: Duration,
}

/// Reasons a signup is refused before anything is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupRejection {
    MissingFields,
    EmailTaken,
    PasswordMismatch,
    WeakPassword,
}

impl SignupRejection {
    /// Notice shown to the user
    pub fn notice(&self) -> Notice {
        match self {
            SignupRejection::MissingFields => Notice::error("Please provide all required fields."),
            SignupRejection::EmailTaken => Notice::info("Email already exists. Please login."),
            SignupRejection::PasswordMismatch => Notice::error("Both passwords should match."),
            SignupRejection::WeakPassword => Notice::warning(WEAK_PASSWORD_MESSAGE).with_time(5000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupOutcome {
    Registered { email: String, session: IssuedToken },
    Rejected(SignupRejection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    LoggedIn { email: String, session: IssuedToken },
    Denied(DenyReason),
}

impl LoginOutcome {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, LoginOutcome::LoggedIn { .. })
    }
}

#[async_trait]
pub trait AccountService: Send + Sync {
    /// Register a new account and issue its first token
    async fn signup(&self, request: SignupRequest) -> Result<SignupOutcome, AppError>;

    /// Check credentials, then issue and persist a new token
    async fn login(&self, request: LoginRequest) -> Result<LoginOutcome, AppError>;

    /// Check a previously issued token; never mutates the store
    async fn auto_login(&self, token: Option<&str>) -> Result<AuthOutcome, AppError>;
}

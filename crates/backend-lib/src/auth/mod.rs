// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.
pub mod authenticator;
pub mod password;
mod service;
mod service_impl;
pub mod token;

pub use authenticator::{AuthOutcome, AuthRequest, Authenticator, DenyReason};
pub use password::{
    check_strength, hash_password, verify_password, CredentialHasher, ScryptHasher,
    MIN_PASSWORD_LENGTH,
};
pub use service::{AccountService, IssuedToken, LoginOutcome, SignupOutcome, SignupRejection};
pub use service_impl::{DefaultAccounts, SessionPolicy};
pub use token::{TokenPayload, TokenService, TOKEN_ISSUER};

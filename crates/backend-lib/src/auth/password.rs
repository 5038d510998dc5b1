// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing, verification and strength checking.
use crate::error::AppError;
use async_trait::async_trait;
use scrypt::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Params, Scrypt,
};

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Symbols accepted as the required special character
pub const PASSWORD_SYMBOLS: &[char] = &['!', '@', '#', '$', '%', '^', '&', '*'];

/// Message shown when a password fails [`check_strength`]
pub const WEAK_PASSWORD_MESSAGE: &str = "Password is weak. Password should be 8 or more characters, must contain a CAPITAL letter, a small letter, a Number, and a $pecial Symbol at least.";

/// Check if a password is strong enough to register with
///
/// Requires at least 8 characters with an ASCII uppercase letter, an ASCII
/// lowercase letter, an ASCII digit and one of `!@#$%^&*`.
pub fn check_strength(password: &str) -> bool {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return false;
    }

    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return false;
    }

    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return false;
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }

    if !password.chars().any(|c| PASSWORD_SYMBOLS.contains(&c)) {
        return false;
    }

    true
}

/// One-way password hashing
///
/// Implementations must be safe to call from async request handlers; CPU-heavy
/// work belongs on the blocking pool.
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing string
    async fn hash(&self, plain: &str) -> Result<String, AppError>;

    /// Check a plaintext password against a stored hash
    ///
    /// `Ok(false)` means the password does not match. An unreadable stored
    /// hash is an error, not a mismatch.
    async fn verify(&self, plain: &str, hash: &str) -> Result<bool, AppError>;
}

const SCRYPT_BLOCK_SIZE: u32 = 8;
const SCRYPT_PARALLELISM: u32 = 1;
const SCRYPT_OUTPUT_LEN: usize = 32;

/// scrypt hasher producing PHC strings (`$scrypt$ln=..,r=..,p=..$salt$hash`)
#[derive(Debug, Clone)]
pub struct ScryptHasher {
    params: Params,
}

impl ScryptHasher {
    /// Create a hasher with the given cost (log2 of N)
    pub fn new(cost: u8) -> Result<Self, AppError> {
        let params = Params::new(cost, SCRYPT_BLOCK_SIZE, SCRYPT_PARALLELISM, SCRYPT_OUTPUT_LEN)
            .map_err(|e| AppError::Config(format!("invalid scrypt cost {cost}: {e}")))?;
        Ok(Self { params })
    }
}

/// Hash a password using scrypt with explicit parameters
pub fn hash_password(plain: &str, params: Params) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password_customized(plain.as_bytes(), None, None, params, &salt)
        .map_err(|e| AppError::Hashing(e.to_string()))?
        .to_string();
    Ok(hash)
}

/// Verify a password against a PHC hash string
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Hashing(format!("unreadable hash: {e}")))?;
    match Scrypt.verify_password(plain.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(scrypt::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::Hashing(e.to_string())),
    }
}

#[async_trait]
impl CredentialHasher for ScryptHasher {
    async fn hash(&self, plain: &str) -> Result<String, AppError> {
        let plain = zeroize::Zeroizing::new(plain.to_owned());
        let params = self.params;
        tokio::task::spawn_blocking(move || hash_password(&plain, params)).await?
    }

    async fn verify(&self, plain: &str, hash: &str) -> Result<bool, AppError> {
        let plain = zeroize::Zeroizing::new(plain.to_owned());
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || verify_password(&plain, &hash)).await?
    }
}

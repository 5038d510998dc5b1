// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
//!
//! Settings are layered with figment: built-in defaults, then a TOML file,
//! then `RELEASE_`-prefixed environment variables (`__` separates nested
//! keys), and finally the variable names used by the legacy deployment
//! (`JWT_SIGN_KEY`, `JWT_SIGN_ALGORITHM`, `DB_USERS_TABLE`, `PORT`).
//!
//! `DB_URI` is not read. In the legacy deployment it was a database
//! connection string, not a directory.
use crate::error::AppError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Storage path that selects the in-memory credential store
pub const MEMORY_STORE: &str = "memory";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// HTTP listener
    pub server: ServerSettings,
    /// Credential store location
    pub storage: StorageSettings,
    /// Token and password policy
    pub auth: AuthSettings,
    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Data directory, or `memory` for a process-local store
    pub path: String,
    /// Name of the users table (file stem under `path`)
    pub table: String,
    /// Upper bound on a single store operation
    pub timeout_ms: u64,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// HMAC signing secret
    pub jwt_secret: String,
    /// Signing algorithm name (HS256, HS384 or HS512)
    pub jwt_algorithm: String,
    /// Lifetime of the token issued at signup
    pub signup_token_ttl_secs: u64,
    /// Lifetime of the token issued at interactive login
    pub login_token_ttl_secs: u64,
    /// Lifetime of the client-readable `loggedIn` cookie
    pub logged_in_cookie_ttl_secs: u64,
    /// scrypt cost parameter (log2 of N)
    pub hash_cost: u8,
}

/// Where user records live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    FlatFile { root: PathBuf, table: String },
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            storage: StorageSettings::default(),
            auth: AuthSettings::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: "data".to_string(),
            table: "users".to_string(),
            timeout_ms: 5_000,
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_algorithm: "HS256".to_string(),
            signup_token_ttl_secs: 60 * 60 * 24 * 7, // 7 days
            login_token_ttl_secs: 60 * 60,           // 1 hour
            logged_in_cookie_ttl_secs: 60 * 60 * 24 * 7,
            hash_cost: 15,
        }
    }
}

// Keeps the secret out of logs.
impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("signup_token_ttl_secs", &self.signup_token_ttl_secs)
            .field("login_token_ttl_secs", &self.login_token_ttl_secs)
            .field("logged_in_cookie_ttl_secs", &self.logged_in_cookie_ttl_secs)
            .field("hash_cost", &self.hash_cost)
            .finish()
    }
}

impl AuthSettings {
    pub fn signup_token_ttl(&self) -> Duration {
        Duration::from_secs(self.signup_token_ttl_secs)
    }

    pub fn login_token_ttl(&self) -> Duration {
        Duration::from_secs(self.login_token_ttl_secs)
    }

    pub fn logged_in_cookie_ttl(&self) -> Duration {
        Duration::from_secs(self.logged_in_cookie_ttl_secs)
    }
}

impl StorageSettings {
    pub fn backend(&self) -> StorageBackend {
        if self.path == MEMORY_STORE {
            StorageBackend::Memory
        } else {
            StorageBackend::FlatFile {
                root: PathBuf::from(&self.path),
                table: self.table.clone(),
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Settings {
    /// Load settings from `config.toml` in the working directory and the environment
    pub fn load() -> Result<Self, AppError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load settings from an explicit TOML file and the environment
    ///
    /// A missing file is not an error; defaults and the environment still apply.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let settings: Settings = Self::figment(path.as_ref()).extract()?;
        Ok(settings)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("RELEASE_").split("__"))
            .merge(Env::raw().only(&["JWT_SIGN_KEY"]).map(|_| "auth.jwt_secret".into()))
            .merge(Env::raw().only(&["JWT_SIGN_ALGORITHM"]).map(|_| "auth.jwt_algorithm".into()))
            .merge(Env::raw().only(&["DB_USERS_TABLE"]).map(|_| "storage.table".into()))
            .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()))
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<(), AppError> {
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(AppError::Config(format!(
                "unknown log level '{}'",
                self.log_level
            )));
        }

        if self.auth.jwt_secret.is_empty() {
            return Err(AppError::Config(
                "auth.jwt_secret must be set (JWT_SIGN_KEY)".to_string(),
            ));
        }

        let algorithm = jsonwebtoken::Algorithm::from_str(&self.auth.jwt_algorithm)
            .map_err(|_| AppError::Config(format!("unknown algorithm '{}'", self.auth.jwt_algorithm)))?;
        if !crate::auth::token::is_hmac(algorithm) {
            return Err(AppError::Config(format!(
                "algorithm '{}' needs a key pair; only HS256, HS384 and HS512 are supported",
                self.auth.jwt_algorithm
            )));
        }

        if self.auth.signup_token_ttl_secs == 0
            || self.auth.login_token_ttl_secs == 0
            || self.auth.logged_in_cookie_ttl_secs == 0
        {
            return Err(AppError::Config("token and cookie TTLs must be positive".to_string()));
        }

        if !(1..=20).contains(&self.auth.hash_cost) {
            return Err(AppError::Config(format!(
                "auth.hash_cost must be between 1 and 20, got {}",
                self.auth.hash_cost
            )));
        }

        // Never echo the value back; a connection string may carry a password
        if self.storage.path.contains("://") {
            return Err(AppError::Config(
                "storage.path must be a directory or `memory`, not a connection URI".to_string(),
            ));
        }

        if self.storage.timeout_ms == 0 {
            return Err(AppError::Config("storage.timeout_ms must be positive".to_string()));
        }

        if self.storage.path != MEMORY_STORE && self.storage.table.trim().is_empty() {
            return Err(AppError::Config("storage.table must not be empty".to_string()));
        }

        Ok(())
    }

    /// Socket address to bind
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid bind address: {e}")))
    }
}

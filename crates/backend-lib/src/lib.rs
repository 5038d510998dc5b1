// ============================
// release-backend-lib/src/lib.rs
// ============================
//! Core functionality for the Release account server: signup, login and
//! token-based auto-login over HTTP.

pub mod auth;
pub mod config;
pub mod cookies;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod router;
pub mod storage;

use crate::auth::{AccountService, DefaultAccounts, ScryptHasher, SessionPolicy, TokenService};
use crate::config::Settings;
use crate::error::AppError;
use crate::storage::{open_store, UserStore};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Signup / login orchestration
    pub accounts: Arc<dyn AccountService>,
    /// Configuration settings
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create application state with the store selected by `config`
    pub async fn new(config: &Settings) -> Result<Self, AppError> {
        // Before anything touches the filesystem
        config.validate()?;
        let store = open_store(&config.storage.backend()).await?;
        Self::with_store(store, config)
    }

    /// Create application state around an existing store
    pub fn with_store(store: Arc<dyn UserStore>, config: &Settings) -> Result<Self, AppError> {
        config.validate()?;

        let tokens = Arc::new(TokenService::from_settings(&config.auth)?);
        let hasher = Arc::new(ScryptHasher::new(config.auth.hash_cost)?);
        let accounts = Arc::new(DefaultAccounts::new(
            store,
            hasher,
            tokens,
            SessionPolicy::from_settings(config),
            config.storage.timeout(),
        ));

        Ok(Self {
            accounts,
            settings: Arc::new(config.clone()),
        })
    }
}

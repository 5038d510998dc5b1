// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! Credential store abstraction with in-memory and flat-file implementations.
use crate::config::StorageBackend;
use crate::error::AppError;
use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs as tokio_fs, sync::RwLock};

/// A registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique key
    pub email: String,
    /// PHC-formatted password hash
    pub password_hash: String,
    /// Last token issued to this account
    #[serde(default)]
    pub session_token: Option<String>,
}

/// Partial update applied by [`UserStore::update`]; `None` fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub session_token: Option<String>,
}

impl UserPatch {
    pub fn session_token(token: impl Into<String>) -> Self {
        Self {
            session_token: Some(token.into()),
        }
    }

    fn apply(self, record: &mut UserRecord) {
        if let Some(token) = self.session_token {
            record.session_token = Some(token);
        }
    }
}

/// Trait for credential store backends
///
/// Implementations own email uniqueness: `insert` of an existing email must
/// fail with [`AppError::DuplicateEmail`]. Connectivity problems surface as
/// [`AppError::Store`] and never as "not found".
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Whether an account with this email exists
    async fn exists(&self, email: &str) -> Result<bool, AppError>;

    /// Fetch an account by email
    async fn get(&self, email: &str) -> Result<Option<UserRecord>, AppError>;

    /// Insert a new account
    async fn insert(&self, record: UserRecord) -> Result<(), AppError>;

    /// Apply a patch to the account with this email; returns whether one was found
    async fn update(&self, email: &str, patch: UserPatch) -> Result<bool, AppError>;
}

/// Build the store selected by configuration
pub async fn open_store(backend: &StorageBackend) -> Result<Arc<dyn UserStore>, AppError> {
    match backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryUserStore::new())),
        StorageBackend::FlatFile { root, table } => {
            Ok(Arc::new(FlatFileUserStore::open(root, table).await?))
        },
    }
}

/// Process-local store, used for tests and throwaway deployments
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<DashMap<String, UserRecord>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn exists(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.users.contains_key(email))
    }

    async fn get(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        Ok(self.users.get(email).map(|r| r.value().clone()))
    }

    async fn insert(&self, record: UserRecord) -> Result<(), AppError> {
        match self.users.entry(record.email.clone()) {
            Entry::Occupied(_) => Err(AppError::DuplicateEmail(record.email)),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            },
        }
    }

    async fn update(&self, email: &str, patch: UserPatch) -> Result<bool, AppError> {
        match self.users.get_mut(email) {
            Some(mut record) => {
                patch.apply(&mut record);
                Ok(true)
            },
            None => Ok(false),
        }
    }
}

/// Flat-file store keeping one JSON table per file (`<root>/<table>.json`)
///
/// The whole table is held in memory behind a lock; every mutation rewrites
/// the file through a temporary sibling and a rename.
#[derive(Debug, Clone)]
pub struct FlatFileUserStore {
    path: PathBuf,
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl FlatFileUserStore {
    /// Open (or create) the table `table` under `root`
    pub async fn open<P: AsRef<Path>>(root: P, table: &str) -> Result<Self, AppError> {
        let root = root.as_ref().to_path_buf();
        tokio_fs::create_dir_all(&root).await?;
        let path = root.join(format!("{table}.json"));

        let users = if tokio_fs::try_exists(&path).await? {
            let content = tokio_fs::read_to_string(&path).await?;
            let records: Vec<UserRecord> = if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&content)?
            };
            records.into_iter().map(|r| (r.email.clone(), r)).collect()
        } else {
            HashMap::new()
        };

        tracing::info!(path = %path.display(), users = users.len(), "opened credential store");

        Ok(Self {
            path,
            users: Arc::new(RwLock::new(users)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the table to disk; caller holds the write lock
    async fn persist(&self, users: &HashMap<String, UserRecord>) -> Result<(), AppError> {
        let mut records: Vec<&UserRecord> = users.values().collect();
        records.sort_by(|a, b| a.email.cmp(&b.email));
        let json = serde_json::to_string_pretty(&records)?;

        let tmp = self.path.with_extension("json.tmp");
        tokio_fs::write(&tmp, json).await?;
        tokio_fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for FlatFileUserStore {
    async fn exists(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.users.read().await.contains_key(email))
    }

    async fn get(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn insert(&self, record: UserRecord) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        if users.contains_key(&record.email) {
            return Err(AppError::DuplicateEmail(record.email));
        }
        let email = record.email.clone();
        users.insert(email.clone(), record);

        if let Err(e) = self.persist(&users).await {
            // Keep memory and disk in agreement
            users.remove(&email);
            return Err(AppError::Store(e.to_string()));
        }
        Ok(())
    }

    async fn update(&self, email: &str, patch: UserPatch) -> Result<bool, AppError> {
        let mut users = self.users.write().await;
        let Some(record) = users.get_mut(email) else {
            return Ok(false);
        };
        let previous = record.clone();
        patch.apply(record);

        if let Err(e) = self.persist(&users).await {
            users.insert(email.to_string(), previous);
            return Err(AppError::Store(e.to_string()));
        }
        Ok(true)
    }
}

//! Credential persistence
//!
//! The engine reads candidates through [`CredentialStore`] and writes attempt
//! outcomes back through [`CredentialStore::apply_update`]. The master key of
//! the system tier comes from a separate [`SystemConfigSource`].
//!
//! Two implementations ship with the crate:
//! - [`InMemoryCredentialStore`] for tests and embedding
//! - [`JsonFileCredentialStore`] persisting to a JSON document on disk

mod file;
mod memory;
mod update;

pub use file::JsonFileCredentialStore;
pub use memory::{InMemoryCredentialStore, StaticSystemConfig};
pub use update::CredentialUpdate;

use crate::credential::{ApiSecret, CredentialRecord, NewCredential};
use async_trait::async_trait;
use thiserror::Error;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Credential store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Credential not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Queryable collection of credential records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Active, enabled records owned by `owner_id`, least recently used first
    async fn personal_credentials(&self, owner_id: &str) -> StoreResult<Vec<CredentialRecord>>;

    /// Active, enabled records marked global or lacking both owner and
    /// global marker, least recently used first
    async fn global_credentials(&self) -> StoreResult<Vec<CredentialRecord>>;

    /// Plaintext secret for a stored record
    async fn reveal_secret(&self, id: &str) -> StoreResult<ApiSecret>;

    /// Atomically apply `update` to the record with `id`
    async fn apply_update(&self, id: &str, update: CredentialUpdate) -> StoreResult<()>;

    /// Every record regardless of status, in insertion order
    async fn list_credentials(&self) -> StoreResult<Vec<CredentialRecord>>;

    /// Create a new record and return its metadata
    async fn insert_credential(&self, credential: NewCredential) -> StoreResult<CredentialRecord>;
}

/// Singleton system configuration holding the optional master key
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SystemConfigSource: Send + Sync {
    async fn master_secret(&self) -> StoreResult<Option<ApiSecret>>;
}

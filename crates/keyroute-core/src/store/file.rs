//! JSON file credential store
//!
//! Persists credentials and the system master key in one JSON document:
//!
//! ```json
//! {
//!   "system": { "master_api_key": "..." },
//!   "credentials": [
//!     { "id": "...", "owner_id": "alice", "is_global": false, "secret": "...", ... }
//!   ]
//! }
//! ```
//!
//! The document is re-read on every query so external edits are picked up.
//! Writes are serialized through a mutex and replace the file atomically.

use super::{CredentialStore, CredentialUpdate, StoreError, StoreResult, SystemConfigSource};
use crate::credential::sort_least_recently_used;
use crate::credential::{ApiSecret, CredentialRecord, NewCredential};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Default, Serialize, Deserialize)]
struct SystemSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    master_api_key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    #[serde(flatten)]
    record: CredentialRecord,
    secret: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialsDocument {
    #[serde(default)]
    system: SystemSection,
    #[serde(default)]
    credentials: Vec<StoredEntry>,
}

/// Credential store persisted as a JSON document
#[derive(Debug)]
pub struct JsonFileCredentialStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Set or clear the system master key
    pub async fn set_master_secret(&self, master: Option<ApiSecret>) -> StoreResult<()> {
        self.mutate(|doc| {
            doc.system.master_api_key = master.map(|secret| secret.expose().to_string());
            Ok(())
        })
        .await
    }

    async fn load(&self) -> StoreResult<CredentialsDocument> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(CredentialsDocument::default()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "credentials file missing, starting empty");
                Ok(CredentialsDocument::default())
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn save(&self, doc: &CredentialsDocument) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(doc)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut CredentialsDocument) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await?;
        let result = change(&mut doc)?;
        self.save(&doc).await?;
        Ok(result)
    }

    async fn query(
        &self,
        filter: impl Fn(&CredentialRecord) -> bool,
    ) -> StoreResult<Vec<CredentialRecord>> {
        let doc = self.load().await?;
        let mut records: Vec<CredentialRecord> = doc
            .credentials
            .into_iter()
            .map(|entry| entry.record)
            .filter(|record| record.is_eligible() && filter(record))
            .collect();
        sort_least_recently_used(&mut records);
        Ok(records)
    }
}

#[async_trait]
impl CredentialStore for JsonFileCredentialStore {
    async fn personal_credentials(&self, owner_id: &str) -> StoreResult<Vec<CredentialRecord>> {
        self.query(|record| record.is_owned_by(owner_id)).await
    }

    async fn global_credentials(&self) -> StoreResult<Vec<CredentialRecord>> {
        self.query(CredentialRecord::is_shared).await
    }

    async fn reveal_secret(&self, id: &str) -> StoreResult<ApiSecret> {
        let doc = self.load().await?;
        doc.credentials
            .into_iter()
            .find(|entry| entry.record.id == id)
            .map(|entry| ApiSecret::new(entry.secret))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn apply_update(&self, id: &str, update: CredentialUpdate) -> StoreResult<()> {
        self.mutate(|doc| {
            let entry = doc
                .credentials
                .iter_mut()
                .find(|entry| entry.record.id == id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            update.apply_to(&mut entry.record);
            Ok(())
        })
        .await
    }

    async fn list_credentials(&self) -> StoreResult<Vec<CredentialRecord>> {
        let doc = self.load().await?;
        let records = doc.credentials.into_iter().map(|entry| entry.record);
        Ok(records.collect())
    }

    async fn insert_credential(&self, credential: NewCredential) -> StoreResult<CredentialRecord> {
        let record = credential.to_record(uuid::Uuid::new_v4().to_string(), Utc::now());
        let entry = StoredEntry {
            record: record.clone(),
            secret: credential.secret.expose().to_string(),
        };
        self.mutate(move |doc| {
            doc.credentials.push(entry);
            Ok(())
        })
        .await?;
        Ok(record)
    }
}

#[async_trait]
impl SystemConfigSource for JsonFileCredentialStore {
    async fn master_secret(&self) -> StoreResult<Option<ApiSecret>> {
        let doc = self.load().await?;
        Ok(doc.system.master_api_key.and_then(ApiSecret::non_empty))
    }
}

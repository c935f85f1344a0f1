//! In-memory credential store

use super::{CredentialStore, CredentialUpdate, StoreError, StoreResult, SystemConfigSource};
use crate::credential::sort_least_recently_used;
use crate::credential::{ApiSecret, CredentialRecord, NewCredential};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug)]
struct StoredRow {
    record: CredentialRecord,
    secret: ApiSecret,
}

/// Credential store backed by a lock-protected vector.
///
/// Updates are applied under the write lock, which makes every
/// [`CredentialUpdate`] atomic with respect to concurrent requests.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    rows: RwLock<Vec<StoredRow>>,
    writes: AtomicUsize,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a single record
    pub fn get(&self, id: &str) -> Option<CredentialRecord> {
        self.rows
            .read()
            .iter()
            .find(|row| row.record.id == id)
            .map(|row| row.record.clone())
    }

    /// Number of updates applied since creation
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn query(&self, filter: impl Fn(&CredentialRecord) -> bool) -> Vec<CredentialRecord> {
        let mut records: Vec<CredentialRecord> = self
            .rows
            .read()
            .iter()
            .map(|row| &row.record)
            .filter(|record| record.is_eligible() && filter(*record))
            .cloned()
            .collect();
        sort_least_recently_used(&mut records);
        records
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn personal_credentials(&self, owner_id: &str) -> StoreResult<Vec<CredentialRecord>> {
        Ok(self.query(|record| record.is_owned_by(owner_id)))
    }

    async fn global_credentials(&self) -> StoreResult<Vec<CredentialRecord>> {
        Ok(self.query(CredentialRecord::is_shared))
    }

    async fn reveal_secret(&self, id: &str) -> StoreResult<ApiSecret> {
        self.rows
            .read()
            .iter()
            .find(|row| row.record.id == id)
            .map(|row| row.secret.clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn apply_update(&self, id: &str, update: CredentialUpdate) -> StoreResult<()> {
        let mut rows = self.rows.write();
        let row = rows
            .iter_mut()
            .find(|row| row.record.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        update.apply_to(&mut row.record);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn list_credentials(&self) -> StoreResult<Vec<CredentialRecord>> {
        let rows = self.rows.read();
        Ok(rows.iter().map(|row| row.record.clone()).collect())
    }

    async fn insert_credential(&self, credential: NewCredential) -> StoreResult<CredentialRecord> {
        let record = credential.to_record(uuid::Uuid::new_v4().to_string(), Utc::now());
        self.rows.write().push(StoredRow {
            record: record.clone(),
            secret: credential.secret,
        });
        Ok(record)
    }
}

/// System configuration held in memory
#[derive(Debug, Default)]
pub struct StaticSystemConfig {
    master: RwLock<Option<ApiSecret>>,
}

impl StaticSystemConfig {
    pub fn new(master: Option<ApiSecret>) -> Self {
        Self {
            master: RwLock::new(master),
        }
    }

    /// Configuration without a master key
    pub fn empty() -> Self {
        Self::default()
    }

    /// Replace the master key; takes effect on the next sourcing call
    pub fn set_master_secret(&self, master: Option<ApiSecret>) {
        *self.master.write() = master;
    }
}

#[async_trait]
impl SystemConfigSource for StaticSystemConfig {
    async fn master_secret(&self) -> StoreResult<Option<ApiSecret>> {
        Ok(self.master.read().clone())
    }
}

//! Candidate credentials handed to the dispatcher

use super::record::{CredentialRecord, CredentialScope};
use super::secret::ApiSecret;
use crate::error::RouteResult;
use crate::store::CredentialStore;
use std::fmt;
use std::sync::Arc;

/// A credential persisted in a [`CredentialStore`].
///
/// Carries the record metadata and a handle to the owning store; the secret
/// is fetched from the store each time it is revealed.
#[derive(Clone)]
pub struct StoredCredential {
    record: CredentialRecord,
    store: Arc<dyn CredentialStore>,
}

impl StoredCredential {
    pub fn new(record: CredentialRecord, store: Arc<dyn CredentialStore>) -> Self {
        Self { record, store }
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn record(&self) -> &CredentialRecord {
        &self.record
    }

    pub(crate) fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Fetch the plaintext secret from the store
    pub async fn reveal_secret(&self) -> RouteResult<ApiSecret> {
        Ok(self.store.reveal_secret(&self.record.id).await?)
    }
}

impl fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredential")
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}

/// A credential whose secret is held directly, outside any store
#[derive(Debug, Clone)]
pub struct InlineCredential {
    secret: ApiSecret,
    origin: String,
}

impl InlineCredential {
    pub fn new(secret: ApiSecret, origin: impl Into<String>) -> Self {
        Self {
            secret,
            origin: origin.into(),
        }
    }

    /// Where the secret was read from (config key, environment variable, ...)
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn secret(&self) -> &ApiSecret {
        &self.secret
    }
}

/// One candidate credential, tagged with the tier it was sourced from
#[derive(Debug, Clone)]
pub enum Credential {
    Personal(StoredCredential),
    Global(StoredCredential),
    System(InlineCredential),
    Ephemeral(InlineCredential),
}

impl Credential {
    /// Sourcing tier
    pub fn scope(&self) -> CredentialScope {
        match self {
            Credential::Personal(_) => CredentialScope::Personal,
            Credential::Global(_) => CredentialScope::Global,
            Credential::System(_) => CredentialScope::System,
            Credential::Ephemeral(_) => CredentialScope::Ephemeral,
        }
    }

    /// Store identifier; `None` for credentials that live outside the store
    pub fn id(&self) -> Option<&str> {
        self.stored().map(StoredCredential::id)
    }

    /// The stored credential behind this candidate, if any
    pub fn stored(&self) -> Option<&StoredCredential> {
        match self {
            Credential::Personal(stored) | Credential::Global(stored) => Some(stored),
            Credential::System(_) | Credential::Ephemeral(_) => None,
        }
    }

    /// Whether attempt outcomes are written back to the store
    pub fn is_recordable(&self) -> bool {
        self.stored().is_some()
    }

    /// Produce the secret for a provider call
    pub async fn reveal_secret(&self) -> RouteResult<ApiSecret> {
        match self {
            Credential::Personal(stored) | Credential::Global(stored) => {
                stored.reveal_secret().await
            }
            Credential::System(inline) | Credential::Ephemeral(inline) => {
                Ok(inline.secret().clone())
            }
        }
    }

    /// Log-safe description, e.g. `personal:3f2a...` or `ephemeral(GEMINI_API_KEY)`
    pub fn describe(&self) -> String {
        match self {
            Credential::Personal(stored) | Credential::Global(stored) => {
                format!("{}:{}", self.scope(), stored.id())
            }
            Credential::System(inline) | Credential::Ephemeral(inline) => {
                format!("{}({})", self.scope(), inline.origin())
            }
        }
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

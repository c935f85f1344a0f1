//! Tiered credential sourcing with an ephemeral fallback

use crate::credential::{
    ApiSecret, Credential, CredentialRecord, InlineCredential, StoredCredential,
    sort_least_recently_used,
};
use crate::store::{CredentialStore, SystemConfigSource};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Origin reported for the synthesized system credential
const SYSTEM_ORIGIN: &str = "system-config";

/// Builds the ordered candidate list for a requester.
///
/// Tiers are concatenated, never interleaved:
/// 1. personal credentials of the requester
/// 2. global and legacy shared credentials
/// 3. the system master key, if configured
/// 4. the process fallback key, only when 1-3 produced nothing
///
/// Within tiers 1 and 2 the least recently used credential comes first.
pub struct KeySourcer {
    store: Arc<dyn CredentialStore>,
    system: Arc<dyn SystemConfigSource>,
    fallback: Option<InlineCredential>,
}

impl KeySourcer {
    pub fn new(store: Arc<dyn CredentialStore>, system: Arc<dyn SystemConfigSource>) -> Self {
        Self {
            store,
            system,
            fallback: None,
        }
    }

    /// Set the process-level fallback key.
    ///
    /// The secret is captured here, once. `KeyRouter::from_config` passes the
    /// value `EngineConfig` read from the environment at startup, so a key
    /// exported later is not seen until the router is rebuilt.
    pub fn with_fallback(mut self, secret: Option<ApiSecret>, origin: impl Into<String>) -> Self {
        let origin = origin.into();
        self.fallback = secret.map(|secret| InlineCredential::new(secret, origin));
        self
    }

    /// Ordered candidates for `requester_id`.
    ///
    /// Never fails: an unreachable store degrades to empty tiers and the
    /// fallback key still applies.
    pub async fn source_credentials(&self, requester_id: &str) -> Vec<Credential> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        match self.store.personal_credentials(requester_id).await {
            Ok(records) => {
                self.push_stored(&mut candidates, &mut seen, records, Credential::Personal)
            }
            Err(e) => {
                warn!(requester = requester_id, error = %e, "personal credential query failed")
            }
        }

        match self.store.global_credentials().await {
            Ok(records) => {
                self.push_stored(&mut candidates, &mut seen, records, Credential::Global)
            }
            Err(e) => warn!(error = %e, "global credential query failed"),
        }

        match self.system.master_secret().await {
            Ok(Some(secret)) => {
                let system = InlineCredential::new(secret, SYSTEM_ORIGIN);
                candidates.push(Credential::System(system));
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "system configuration unavailable"),
        }

        if candidates.is_empty() {
            if let Some(fallback) = &self.fallback {
                debug!(
                    origin = fallback.origin(),
                    "using ephemeral fallback credential"
                );
                candidates.push(Credential::Ephemeral(fallback.clone()));
            }
        }

        debug!(
            requester = requester_id,
            candidates = candidates.len(),
            "sourced credentials"
        );
        candidates
    }

    fn push_stored(
        &self,
        candidates: &mut Vec<Credential>,
        seen: &mut HashSet<String>,
        mut records: Vec<CredentialRecord>,
        tier: fn(StoredCredential) -> Credential,
    ) {
        // Stores already filter and order; repeat both so a lax store cannot
        // hand out revoked or disabled records.
        records.retain(CredentialRecord::is_eligible);
        sort_least_recently_used(&mut records);

        for record in records {
            if !seen.insert(record.id.clone()) {
                warn!(
                    credential = %record.id,
                    "duplicate credential in sourcing result, skipped"
                );
                continue;
            }
            candidates.push(tier(StoredCredential::new(record, self.store.clone())));
        }
    }
}

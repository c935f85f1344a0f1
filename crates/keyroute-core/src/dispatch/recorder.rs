//! Persisting attempt outcomes back to the credential store

use super::classifier::FailureClass;
use super::outcome::AttemptOutcome;
use crate::credential::{Credential, CredentialStatus};
use crate::provider::sanitize_provider_error_text;
use crate::store::CredentialUpdate;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// Writes the effect of each attempt to the credential's store.
///
/// Only stored credentials are recorded; system and ephemeral credentials
/// are skipped. Store write failures are logged and swallowed so they never
/// abort a dispatch.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutcomeRecorder;

impl OutcomeRecorder {
    pub fn new() -> Self {
        Self
    }

    /// Store update implied by `outcome` at time `now`
    pub fn update_for(outcome: &AttemptOutcome, now: DateTime<Utc>) -> CredentialUpdate {
        let update = CredentialUpdate::new().touched_at(now);
        match outcome {
            AttemptOutcome::Success { .. } => update
                .with_usage_increment()
                .with_status(CredentialStatus::Active),
            AttemptOutcome::Transient { .. } | AttemptOutcome::Unknown { .. } => update,
            AttemptOutcome::Permanent { error } => {
                let error = sanitize_provider_error_text(error);
                update
                    .with_status(CredentialStatus::Revoked)
                    .with_enabled(false)
                    .with_last_error(format!("{}: {}", FailureClass::Permanent, error))
            }
        }
    }

    /// Record `outcome` against `credential`
    pub async fn record(&self, credential: &Credential, outcome: &AttemptOutcome) {
        let Some(stored) = credential.stored() else {
            return;
        };

        let update = Self::update_for(outcome, Utc::now());
        let revoking = update.status == Some(CredentialStatus::Revoked);

        match stored.store().apply_update(stored.id(), update).await {
            Ok(()) if revoking => {
                warn!(credential = %credential, "credential rejected by provider, revoked");
            }
            Ok(()) => {
                debug!(
                    credential = %credential,
                    success = outcome.is_success(),
                    "attempt recorded"
                );
            }
            Err(e) => {
                warn!(credential = %credential, error = %e, "failed to record attempt outcome");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::{ApiSecret, InlineCredential, NewCredential, StoredCredential};
    use crate::store::{CredentialStore, InMemoryCredentialStore, MockCredentialStore, StoreError};
    use std::sync::Arc;

    async fn personal(store: &Arc<InMemoryCredentialStore>) -> Credential {
        let record = store
            .insert_credential(NewCredential::personal("u1", ApiSecret::new("k")))
            .await
            .unwrap();
        Credential::Personal(StoredCredential::new(record, store.clone()))
    }

    #[tokio::test]
    async fn test_success_increments_usage() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let credential = personal(&store).await;
        let id = credential.id().unwrap().to_string();

        OutcomeRecorder::new()
            .record(&credential, &AttemptOutcome::success("text"))
            .await;

        let record = store.get(&id).unwrap();
        assert_eq!(record.usage_count, 1);
        assert_eq!(record.status, CredentialStatus::Active);
        assert!(record.last_used_at.is_some());
    }

    #[tokio::test]
    async fn test_transient_only_touches_timestamp() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let credential = personal(&store).await;
        let id = credential.id().unwrap().to_string();
        let before = Utc::now();

        OutcomeRecorder::new()
            .record(
                &credential,
                &AttemptOutcome::Transient {
                    error: "429".into(),
                },
            )
            .await;

        let record = store.get(&id).unwrap();
        assert_eq!(record.usage_count, 0);
        assert_eq!(record.status, CredentialStatus::Active);
        assert!(record.enabled);
        assert!(record.last_used_at.unwrap() >= before);
        assert!(record.last_error.is_none());
    }

    #[tokio::test]
    async fn test_unknown_matches_transient() {
        let now = Utc::now();
        assert_eq!(
            OutcomeRecorder::update_for(&AttemptOutcome::Unknown { error: "?".into() }, now),
            OutcomeRecorder::update_for(&AttemptOutcome::Transient { error: "q".into() }, now),
        );
    }

    #[tokio::test]
    async fn test_permanent_revokes() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let credential = personal(&store).await;
        let id = credential.id().unwrap().to_string();

        OutcomeRecorder::new()
            .record(
                &credential,
                &AttemptOutcome::Permanent {
                    error: "401 Unauthorized".into(),
                },
            )
            .await;

        let record = store.get(&id).unwrap();
        assert_eq!(record.status, CredentialStatus::Revoked);
        assert!(!record.enabled);
        assert_eq!(
            record.last_error.as_deref(),
            Some("permanent: 401 Unauthorized")
        );
        assert!(store.personal_credentials("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_inline_credentials_are_never_written() {
        let credential = Credential::Ephemeral(InlineCredential::new(ApiSecret::new("e"), "env"));
        // No store exists to write to; recording must simply return.
        OutcomeRecorder::new()
            .record(&credential, &AttemptOutcome::success("ok"))
            .await;
    }

    #[tokio::test]
    async fn test_store_failure_is_swallowed() {
        let mut mock = MockCredentialStore::new();
        mock.expect_apply_update()
            .times(1)
            .returning(|_, _| Err(StoreError::Unavailable("down".into())));
        let record =
            NewCredential::global(ApiSecret::new("k")).to_record("id-1".into(), Utc::now());
        let credential = Credential::Global(StoredCredential::new(record, Arc::new(mock)));

        OutcomeRecorder::new()
            .record(&credential, &AttemptOutcome::success("ok"))
            .await;
    }
}

//! The credential × model attempt loop

use super::classifier::classify;
use super::decision::{AttemptCursor, AttemptDecision};
use super::outcome::AttemptOutcome;
use super::recorder::OutcomeRecorder;
use super::request::GenerationRequest;
use crate::credential::{ApiSecret, Credential, CredentialScope};
use crate::error::{RouteError, RouteResult};
use crate::provider::{GenerationProvider, redact_secret, sanitize_provider_error_text};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Successful generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutput {
    pub text: String,
    /// Model that produced the text
    pub model: String,
    /// Tier of the credential that produced the text
    pub scope: CredentialScope,
    /// Store id of that credential, if stored
    pub credential_id: Option<String>,
    /// Provider calls made, including the successful one
    pub attempts: usize,
}

/// Runs one request against an ordered candidate list
pub struct GenerationDispatcher {
    provider: Arc<dyn GenerationProvider>,
    recorder: OutcomeRecorder,
    default_models: Vec<String>,
}

impl GenerationDispatcher {
    pub fn new(provider: Arc<dyn GenerationProvider>, default_models: Vec<String>) -> Self {
        Self {
            provider,
            recorder: OutcomeRecorder::new(),
            default_models,
        }
    }

    /// Try each (credential, model) pair in order until one succeeds.
    ///
    /// # Errors
    ///
    /// - `NoCredentialsAvailable` if `credentials` is empty; no provider call is made
    /// - `InvalidInput` if the request resolves to no models
    /// - `AggregateFailure` carrying the last failure message once every pair failed
    #[instrument(
        skip_all,
        fields(provider = %self.provider.name(), candidates = credentials.len())
    )]
    pub async fn dispatch(
        &self,
        request: &GenerationRequest,
        credentials: &[Credential],
    ) -> RouteResult<GenerationOutput> {
        if credentials.is_empty() {
            warn!("no credentials available, skipping generation");
            return Err(RouteError::NoCredentialsAvailable);
        }

        let models = request.resolve_models(&self.default_models);
        if models.is_empty() {
            return Err(RouteError::invalid_input_field(
                "no models configured for generation",
                "models",
            ));
        }

        let mut cursor = AttemptCursor::new(credentials.len(), models.len());
        let mut attempts = 0;
        let mut last_error: Option<String> = None;

        while let Some(position) = cursor.position() {
            let credential = &credentials[position.credential];
            let model = &models[position.model];

            let decision = match credential.reveal_secret().await {
                Ok(secret) => {
                    attempts += 1;
                    let outcome = self
                        .attempt(credential, &secret, model, request.prompt(), attempts)
                        .await;
                    if let Some(error) = outcome.error_message() {
                        last_error = Some(error.to_string());
                    }
                    self.recorder.record(credential, &outcome).await;
                    AttemptDecision::for_outcome(outcome)
                }
                Err(e) => {
                    warn!(
                        credential = %credential,
                        error = %e,
                        "could not reveal credential secret, skipping"
                    );
                    last_error = Some(e.to_string());
                    AttemptDecision::NextCredential
                }
            };

            match cursor.advance(decision) {
                AttemptDecision::Succeed(text) => {
                    info!(
                        credential = %credential,
                        model = %model,
                        attempts,
                        "generation succeeded"
                    );
                    return Ok(GenerationOutput {
                        text,
                        model: model.clone(),
                        scope: credential.scope(),
                        credential_id: credential.id().map(str::to_string),
                        attempts,
                    });
                }
                AttemptDecision::ExhaustAll => break,
                AttemptDecision::Continue | AttemptDecision::NextCredential => {}
            }
        }

        let last_error =
            last_error.unwrap_or_else(|| "no generation attempt completed".to_string());
        error!(attempts, error = %last_error, "all credentials and models exhausted");
        Err(RouteError::aggregate(attempts, last_error))
    }

    /// One provider call. Failures are classified on the raw error; the
    /// outcome carries the message with the secret redacted.
    async fn attempt(
        &self,
        credential: &Credential,
        secret: &ApiSecret,
        model: &str,
        prompt: &str,
        attempt: usize,
    ) -> AttemptOutcome {
        debug!(credential = %credential, model, attempt, "attempting generation");

        match self.provider.generate(secret, model, prompt).await {
            Ok(text) => AttemptOutcome::success(text),
            Err(e) => {
                let class = classify(&e);
                let message =
                    sanitize_provider_error_text(&redact_secret(&e.message, secret.expose()));
                warn!(
                    credential = %credential,
                    model,
                    class = %class,
                    status = ?e.status_code,
                    error = %message,
                    "generation attempt failed"
                );
                AttemptOutcome::failure(class, message)
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::ScriptedProvider;
    use super::*;
    use crate::credential::{
        ApiSecret, CredentialStatus, InlineCredential, NewCredential, StoredCredential,
    };
    use crate::provider::ProviderError;
    use crate::store::{CredentialStore, InMemoryCredentialStore};

    async fn stored(
        store: &Arc<InMemoryCredentialStore>,
        owner: &str,
        secret: &str,
    ) -> Credential {
        let record = store
            .insert_credential(NewCredential::personal(owner, ApiSecret::new(secret)))
            .await
            .unwrap();
        Credential::Personal(StoredCredential::new(record, store.clone()))
    }

    fn dispatcher(provider: &Arc<ScriptedProvider>) -> GenerationDispatcher {
        GenerationDispatcher::new(provider.clone(), vec!["d1".to_string()])
    }

    #[tokio::test]
    async fn test_empty_credentials_fail_without_calls() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok("never".into())]));
        let result = dispatcher(&provider)
            .dispatch(&GenerationRequest::new("p"), &[])
            .await;

        assert_eq!(result, Err(RouteError::NoCredentialsAvailable));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_transient_moves_to_next_model() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let credential = stored(&store, "u1", "k1").await;
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(ProviderError::with_status(429, "quota exceeded")),
            Ok("from m2".into()),
        ]));

        let output = dispatcher(&provider)
            .dispatch(
                &GenerationRequest::new("p").with_models(["m1", "m2"]),
                &[credential.clone()],
            )
            .await
            .unwrap();

        assert_eq!(output.text, "from m2");
        assert_eq!(output.model, "m2");
        assert_eq!(output.attempts, 2);
        assert_eq!(output.scope, CredentialScope::Personal);
        assert_eq!(
            provider.calls(),
            vec![("k1".into(), "m1".into()), ("k1".into(), "m2".into())]
        );

        let record = store.get(credential.id().unwrap()).unwrap();
        assert_eq!(record.usage_count, 1);
        assert_eq!(record.status, CredentialStatus::Active);
    }

    #[tokio::test]
    async fn test_permanent_skips_remaining_models() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let first = stored(&store, "u1", "bad").await;
        let second = stored(&store, "u1", "good").await;
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(ProviderError::with_status(401, "invalid key")),
            Ok("ok".into()),
        ]));

        let output = dispatcher(&provider)
            .dispatch(
                &GenerationRequest::new("p").with_models(["m1", "m2"]),
                &[first.clone(), second.clone()],
            )
            .await
            .unwrap();

        assert_eq!(output.credential_id.as_deref(), second.id());
        assert_eq!(output.model, "m1");
        assert_eq!(
            provider.calls(),
            vec![("bad".into(), "m1".into()), ("good".into(), "m1".into())]
        );
        assert_eq!(
            store.get(first.id().unwrap()).unwrap().status,
            CredentialStatus::Revoked
        );
    }

    #[tokio::test]
    async fn test_success_short_circuits() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok("first".into())]));
        let credentials = vec![
            Credential::System(InlineCredential::new(ApiSecret::new("s"), "system")),
            Credential::Ephemeral(InlineCredential::new(ApiSecret::new("e"), "env")),
        ];

        let output = dispatcher(&provider)
            .dispatch(
                &GenerationRequest::new("p").with_models(["m1", "m2", "m3"]),
                &credentials,
            )
            .await
            .unwrap();

        assert_eq!(output.text, "first");
        assert_eq!(output.scope, CredentialScope::System);
        assert!(output.credential_id.is_none());
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_failures_exhaust_grid() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let credentials = vec![
            stored(&store, "u1", "a").await,
            stored(&store, "u1", "b").await,
        ];
        let provider = Arc::new(ScriptedProvider::new(
            (1..=6)
                .map(|i| Err(ProviderError::new(format!("mystery {}", i))))
                .collect(),
        ));

        let result = dispatcher(&provider)
            .dispatch(
                &GenerationRequest::new("p").with_models(["m1", "m2", "m3"]),
                &credentials,
            )
            .await;

        assert_eq!(result, Err(RouteError::aggregate(6, "mystery 6")));
        assert_eq!(provider.calls().len(), 6);
        for credential in &credentials {
            let record = store.get(credential.id().unwrap()).unwrap();
            assert_eq!(record.status, CredentialStatus::Active);
            assert!(record.enabled);
        }
    }

    #[tokio::test]
    async fn test_default_models_used_when_request_has_none() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok("ok".into())]));
        let credential = Credential::Ephemeral(InlineCredential::new(ApiSecret::new("e"), "env"));

        let output = dispatcher(&provider)
            .dispatch(&GenerationRequest::new("p"), &[credential])
            .await
            .unwrap();

        assert_eq!(output.model, "d1");
    }

    #[tokio::test]
    async fn test_no_models_is_invalid_input() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let dispatcher = GenerationDispatcher::new(provider.clone(), Vec::new());
        let credential = Credential::Ephemeral(InlineCredential::new(ApiSecret::new("e"), "env"));

        let result = dispatcher
            .dispatch(&GenerationRequest::new("p"), &[credential])
            .await;

        assert!(matches!(result, Err(RouteError::InvalidInput { .. })));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unrevealable_secret_skips_credential() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let record = NewCredential::personal("u1", ApiSecret::new("x"))
            .to_record("not-in-store".to_string(), chrono::Utc::now());
        let ghost = Credential::Personal(StoredCredential::new(record, store.clone()));
        let fallback = Credential::Ephemeral(InlineCredential::new(ApiSecret::new("e"), "env"));
        let provider = Arc::new(ScriptedProvider::new(vec![Ok("ok".into())]));

        let output = dispatcher(&provider)
            .dispatch(&GenerationRequest::new("p"), &[ghost, fallback])
            .await
            .unwrap();

        assert_eq!(output.scope, CredentialScope::Ephemeral);
        assert_eq!(output.attempts, 1);
        assert_eq!(provider.calls(), vec![("e".into(), "d1".into())]);
    }

    #[tokio::test]
    async fn test_raw_secret_echo_is_redacted() {
        let credential = Credential::Ephemeral(InlineCredential::new(
            ApiSecret::new("AIzaEchoed999"),
            "env",
        ));
        let provider = Arc::new(ScriptedProvider::new(vec![Err(ProviderError::new(
            "key AIzaEchoed999 is not permitted here",
        ))]));

        let err = dispatcher(&provider)
            .dispatch(&GenerationRequest::new("p"), &[credential])
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RouteError::aggregate(1, "key [REDACTED] is not permitted here")
        );
    }

    #[tokio::test]
    async fn test_secret_is_not_leaked_in_aggregate_error() {
        let credential = Credential::Ephemeral(InlineCredential::new(
            ApiSecret::new("AIzaLeakMe123"),
            "env",
        ));
        let provider = Arc::new(ScriptedProvider::new(vec![Err(ProviderError::new(
            "bad request api_key=AIzaLeakMe123",
        ))]));

        let err = dispatcher(&provider)
            .dispatch(&GenerationRequest::new("p"), &[credential])
            .await
            .unwrap_err();

        assert!(!err.to_string().contains("AIzaLeakMe123"));
    }

    #[tokio::test]
    async fn test_server_error_with_digits_in_trace_id_keeps_credential() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let credential = stored(&store, "u1", "k1").await;
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(ProviderError::with_status(503, "overloaded; trace 14012")),
            Ok("from m2".into()),
        ]));

        let output = dispatcher(&provider)
            .dispatch(
                &GenerationRequest::new("p").with_models(["m1", "m2"]),
                &[credential.clone()],
            )
            .await
            .unwrap();

        assert_eq!(output.model, "m2");
        assert_eq!(provider.calls().len(), 2);
        let record = store.get(credential.id().unwrap()).unwrap();
        assert_eq!(record.status, CredentialStatus::Active);
        assert!(record.enabled);
    }

    #[tokio::test]
    async fn test_record_failure_does_not_abort_success() {
        use crate::store::{MockCredentialStore, StoreError};

        let mut store = MockCredentialStore::new();
        store
            .expect_reveal_secret()
            .returning(|_| Ok(ApiSecret::new("k1")));
        store
            .expect_apply_update()
            .times(1)
            .returning(|_, _| Err(StoreError::Unavailable("disk full".into())));
        let record = NewCredential::global(ApiSecret::new("k1"))
            .to_record("c1".into(), chrono::Utc::now());
        let credential = Credential::Global(StoredCredential::new(record, Arc::new(store)));
        let provider = Arc::new(ScriptedProvider::new(vec![Ok("fine".into())]));

        let output = dispatcher(&provider)
            .dispatch(&GenerationRequest::new("p"), &[credential])
            .await
            .unwrap();

        assert_eq!(output.text, "fine");
        assert_eq!(output.credential_id.as_deref(), Some("c1"));
    }
}

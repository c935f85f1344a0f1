//! KeyRouter - entry point combining sourcing and dispatch

use crate::config::EngineConfig;
use crate::dispatch::{GenerationDispatcher, GenerationOutput, GenerationRequest};
use crate::error::{RouteError, RouteResult};
use crate::provider::GenerationProvider;
use crate::sourcing::KeySourcer;
use crate::store::{CredentialStore, SystemConfigSource};
use std::sync::Arc;
use tracing::{instrument, warn};

/// Routes generation requests for a requester across their candidate credentials
pub struct KeyRouter {
    sourcer: KeySourcer,
    dispatcher: GenerationDispatcher,
}

impl KeyRouter {
    pub fn new(sourcer: KeySourcer, dispatcher: GenerationDispatcher) -> Self {
        Self {
            sourcer,
            dispatcher,
        }
    }

    /// Wire a router from configuration and the given backends
    pub fn from_config(
        config: &EngineConfig,
        store: Arc<dyn CredentialStore>,
        system: Arc<dyn SystemConfigSource>,
        provider: Arc<dyn GenerationProvider>,
    ) -> Self {
        let origin = config
            .fallback_key_origin
            .clone()
            .unwrap_or_else(|| "process".to_string());
        let sourcer =
            KeySourcer::new(store, system).with_fallback(config.fallback_api_key.clone(), origin);
        let dispatcher = GenerationDispatcher::new(provider, config.default_models.clone());
        Self::new(sourcer, dispatcher)
    }

    pub fn sourcer(&self) -> &KeySourcer {
        &self.sourcer
    }

    pub fn dispatcher(&self) -> &GenerationDispatcher {
        &self.dispatcher
    }

    /// Generate text for `requester_id`.
    ///
    /// Fails with [`RouteError::NoCredentialsAvailable`] without calling the
    /// provider when sourcing yields nothing.
    #[instrument(skip(self, request), fields(requester = %requester_id))]
    pub async fn generate(
        &self,
        requester_id: &str,
        request: &GenerationRequest,
    ) -> RouteResult<GenerationOutput> {
        let credentials = self.sourcer.source_credentials(requester_id).await;
        if credentials.is_empty() {
            warn!(
                requester = requester_id,
                "no credentials available for requester"
            );
            return Err(RouteError::NoCredentialsAvailable);
        }
        self.dispatcher.dispatch(request, &credentials).await
    }
}

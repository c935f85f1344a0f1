//! Keyroute Core Library
//!
//! Routes AI text-generation requests across a pool of API credentials.
//! Candidate credentials are sourced in tiers (personal, global, system and
//! an ephemeral fallback), tried against an ordered model list, and every
//! attempt outcome is written back so quota-exhausted keys rest and invalid
//! keys are revoked.

pub mod config;
pub mod credential;
pub mod dispatch;
pub mod error;
pub mod provider;
pub mod router;
pub mod sourcing;
pub mod store;

// Re-export commonly used types
pub use config::{EngineConfig, ProviderSettings};
pub use credential::{
    ApiSecret, Credential, CredentialRecord, CredentialScope, CredentialStatus, NewCredential,
};
pub use dispatch::{
    AttemptOutcome, FailureClass, GenerationDispatcher, GenerationOutput, GenerationRequest,
    classify,
};
pub use error::{RouteError, RouteResult};
pub use provider::{GeminiProvider, GenerationProvider, ProviderError};
pub use router::KeyRouter;
pub use sourcing::KeySourcer;
pub use store::{
    CredentialStore, CredentialUpdate, InMemoryCredentialStore, JsonFileCredentialStore,
    StaticSystemConfig, StoreError, SystemConfigSource,
};

//! Generation dispatch
//!
//! The dispatcher walks candidate credentials × models in order, one provider
//! call at a time:
//!
//! ```text
//! for credential in candidates:          (personal → global → system → ephemeral)
//!     for model in request models:
//!         provider.generate(secret, model, prompt)
//!           ├─ ok         → record Success, return text
//!           ├─ transient  → record, next model
//!           ├─ unknown    → record, next model
//!           └─ permanent  → record (revokes), next credential
//! all pairs failed → AggregateFailure(last error)
//! ```

mod classifier;
mod decision;
mod dispatcher;
mod outcome;
mod recorder;
mod request;

pub use classifier::{FailureClass, classify};
pub use decision::{AttemptCursor, AttemptDecision, AttemptPosition};
pub use dispatcher::{GenerationDispatcher, GenerationOutput};
pub use outcome::AttemptOutcome;
pub use recorder::OutcomeRecorder;
pub use request::GenerationRequest;

#[cfg(test)]
pub(crate) use dispatcher::test_support;

//! Error types for the keyroute engine
//!
//! `RouteError` is the error surfaced to callers of the engine. `StoreError`
//! converts into it at the boundary. A `ProviderError` is classified by the
//! dispatcher instead, and only the last one reaches `AggregateFailure`.

mod constructors;
mod conversions;
mod types;

pub use types::{RouteError, RouteResult};

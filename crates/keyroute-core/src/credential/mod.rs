//! Credentials
//!
//! A credential is one secret plus the metadata the engine needs to decide
//! whether and in what order to try it. Stored credentials never carry their
//! secret around; it is revealed on demand from the store that owns them.

mod candidate;
mod record;
mod secret;

pub use candidate::{Credential, InlineCredential, StoredCredential};
pub(crate) use record::sort_least_recently_used;
pub use record::{CredentialRecord, CredentialScope, CredentialStatus, NewCredential};
pub use secret::ApiSecret;

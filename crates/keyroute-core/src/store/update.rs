//! Single-record credential updates

use crate::credential::{CredentialRecord, CredentialStatus};
use chrono::{DateTime, Utc};

/// Field changes applied to one record in a single atomic step.
///
/// `increment_usage` is applied in place by the store so concurrent successes
/// never lose an increment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialUpdate {
    pub increment_usage: bool,
    pub status: Option<CredentialStatus>,
    pub enabled: Option<bool>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl CredentialUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `last_used_at`
    pub fn touched_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_used_at = Some(at);
        self
    }

    /// Increment `usage_count` by one
    pub fn with_usage_increment(mut self) -> Self {
        self.increment_usage = true;
        self
    }

    pub fn with_status(mut self, status: CredentialStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn with_last_error(mut self, error: impl Into<String>) -> Self {
        self.last_error = Some(error.into());
        self
    }

    /// Whether the update changes nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the changes to a record in place
    pub fn apply_to(&self, record: &mut CredentialRecord) {
        if self.increment_usage {
            record.usage_count = record.usage_count.saturating_add(1);
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(enabled) = self.enabled {
            record.enabled = enabled;
        }
        if let Some(at) = self.last_used_at {
            record.last_used_at = Some(at);
        }
        if let Some(error) = &self.last_error {
            record.last_error = Some(error.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::{ApiSecret, NewCredential};

    #[test]
    fn test_empty_update_changes_nothing() {
        let mut record =
            NewCredential::global(ApiSecret::new("k")).to_record("a".to_string(), Utc::now());
        let before = record.clone();
        let update = CredentialUpdate::new();
        assert!(update.is_empty());
        update.apply_to(&mut record);
        assert_eq!(record, before);
    }

    #[test]
    fn test_revocation_update() {
        let mut record =
            NewCredential::global(ApiSecret::new("k")).to_record("a".to_string(), Utc::now());
        let now = Utc::now();
        CredentialUpdate::new()
            .with_status(CredentialStatus::Revoked)
            .with_enabled(false)
            .with_last_error("permanent: 401")
            .touched_at(now)
            .apply_to(&mut record);

        assert_eq!(record.status, CredentialStatus::Revoked);
        assert!(!record.enabled);
        assert_eq!(record.last_error.as_deref(), Some("permanent: 401"));
        assert_eq!(record.last_used_at, Some(now));
        assert_eq!(record.usage_count, 0);
    }

    #[test]
    fn test_usage_increment_accumulates() {
        let mut record =
            NewCredential::global(ApiSecret::new("k")).to_record("a".to_string(), Utc::now());
        let update = CredentialUpdate::new().with_usage_increment();
        update.apply_to(&mut record);
        update.apply_to(&mut record);
        assert_eq!(record.usage_count, 2);
    }
}

//! Persisted credential metadata

use super::secret::ApiSecret;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sourcing tier a credential belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialScope {
    /// Owned by the requester
    Personal,
    /// Shared with every requester
    Global,
    /// Master key from the system configuration singleton
    System,
    /// Process-level fallback key, never persisted
    Ephemeral,
}

impl CredentialScope {
    /// Get the lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            CredentialScope::Personal => "personal",
            CredentialScope::Global => "global",
            CredentialScope::System => "system",
            CredentialScope::Ephemeral => "ephemeral",
        }
    }
}

impl fmt::Display for CredentialScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Health status of a stored credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialStatus {
    #[default]
    Active,
    /// Rejected by the provider as invalid; never sourced again
    Revoked,
}

impl fmt::Display for CredentialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            CredentialStatus::Active => "active",
            CredentialStatus::Revoked => "revoked",
        })
    }
}

/// A credential record as returned by store queries.
///
/// Holds metadata only; the secret stays inside the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Owning requester, absent for shared and legacy records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    /// Explicit global marker; `None` on legacy records that predate it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_global: Option<bool>,
    #[serde(default)]
    pub status: CredentialStatus,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub usage_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn default_enabled() -> bool {
    true
}

impl CredentialRecord {
    /// Active and enabled
    pub fn is_eligible(&self) -> bool {
        self.status == CredentialStatus::Active && self.enabled
    }

    /// Record with neither an owner nor a global marker
    pub fn is_legacy(&self) -> bool {
        self.is_global.is_none() && self.owner_id.is_none()
    }

    /// Whether the record belongs to the global tier
    pub fn is_shared(&self) -> bool {
        self.is_global == Some(true) || self.is_legacy()
    }

    /// Whether the record is owned by `owner_id`
    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id.as_deref() == Some(owner_id)
    }

    /// Tier this record is listed under when not sourced for a specific requester
    pub fn scope(&self) -> CredentialScope {
        if self.is_shared() {
            CredentialScope::Global
        } else {
            CredentialScope::Personal
        }
    }
}

/// Sort records least-recently-used first; never-used records lead.
pub(crate) fn sort_least_recently_used(records: &mut [CredentialRecord]) {
    records.sort_by_key(|record| record.last_used_at);
}

/// Input for creating a stored credential
#[derive(Debug, Clone)]
pub struct NewCredential {
    pub secret: ApiSecret,
    pub label: Option<String>,
    pub owner_id: Option<String>,
    pub is_global: Option<bool>,
}

impl NewCredential {
    /// Credential owned by a single requester
    pub fn personal(owner_id: impl Into<String>, secret: ApiSecret) -> Self {
        Self {
            secret,
            label: None,
            owner_id: Some(owner_id.into()),
            is_global: Some(false),
        }
    }

    /// Credential shared with every requester
    pub fn global(secret: ApiSecret) -> Self {
        Self {
            secret,
            label: None,
            owner_id: None,
            is_global: Some(true),
        }
    }

    /// Credential without owner or global marker, as written by older releases
    pub fn legacy(secret: ApiSecret) -> Self {
        Self {
            secret,
            label: None,
            owner_id: None,
            is_global: None,
        }
    }

    /// Set a display label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Build the metadata record for a freshly created credential
    pub(crate) fn to_record(&self, id: String, now: DateTime<Utc>) -> CredentialRecord {
        CredentialRecord {
            id,
            label: self.label.clone(),
            owner_id: self.owner_id.clone(),
            is_global: self.is_global,
            status: CredentialStatus::Active,
            enabled: true,
            usage_count: 0,
            last_used_at: None,
            last_error: None,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(id: &str, last_used_at: Option<DateTime<Utc>>) -> CredentialRecord {
        NewCredential::global(ApiSecret::new("k"))
            .to_record(id.to_string(), Utc::now())
            .with_last_used(last_used_at)
    }

    impl CredentialRecord {
        fn with_last_used(mut self, at: Option<DateTime<Utc>>) -> Self {
            self.last_used_at = at;
            self
        }
    }

    #[test]
    fn test_least_recently_used_order() {
        let now = Utc::now();
        let mut records = vec![
            record("recent", Some(now)),
            record("never", None),
            record("old", Some(now - Duration::hours(1))),
        ];
        sort_least_recently_used(&mut records);
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["never", "old", "recent"]);
    }

    #[test]
    fn test_tier_markers() {
        let now = Utc::now();
        let personal =
            NewCredential::personal("u1", ApiSecret::new("k")).to_record("a".into(), now);
        let global = NewCredential::global(ApiSecret::new("k")).to_record("b".into(), now);
        let legacy = NewCredential::legacy(ApiSecret::new("k")).to_record("c".into(), now);

        assert!(personal.is_owned_by("u1"));
        assert!(!personal.is_shared());
        assert_eq!(personal.scope(), CredentialScope::Personal);

        assert!(global.is_shared());
        assert!(!global.is_legacy());

        assert!(legacy.is_legacy());
        assert!(legacy.is_shared());
        assert_eq!(legacy.scope(), CredentialScope::Global);
    }

    #[test]
    fn test_eligibility() {
        let mut rec = NewCredential::global(ApiSecret::new("k")).to_record("a".into(), Utc::now());
        assert!(rec.is_eligible());
        rec.enabled = false;
        assert!(!rec.is_eligible());
        rec.enabled = true;
        rec.status = CredentialStatus::Revoked;
        assert!(!rec.is_eligible());
    }

    #[test]
    fn test_legacy_record_deserializes_with_defaults() {
        let json = r#"{"id":"x","created_at":"2024-01-01T00:00:00Z"}"#;
        let rec: CredentialRecord = serde_json::from_str(json).unwrap();
        assert!(rec.is_legacy());
        assert!(rec.enabled);
        assert_eq!(rec.status, CredentialStatus::Active);
        assert_eq!(rec.usage_count, 0);
    }
}

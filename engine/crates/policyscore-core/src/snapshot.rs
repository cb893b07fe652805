//! Snapshot of the live policy state captured from a machine

use crate::category::CheckCategory;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Observed values for one policy key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotEntry<'a> {
    pub key: &'a str,
    /// Raw identifiers (user rights) or setting values (other categories)
    pub values: &'a [String],
}

impl<'a> SnapshotEntry<'a> {
    /// First observed value, for single-valued settings
    pub fn first(&self) -> Option<&'a str> {
        self.values.first().map(|v| v.as_str())
    }
}

/// Key to observed values for one category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySnapshot {
    entries: BTreeMap<String, Vec<String>>,
}

impl CategorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, values: Vec<String>) {
        self.entries.insert(key.into(), values);
    }

    pub fn entry(&self, key: &str) -> Option<SnapshotEntry<'_>> {
        self.entries
            .get_key_value(key)
            .map(|(key, values)| SnapshotEntry {
                key: key.as_str(),
                values: values.as_slice(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Policy state of one machine at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySnapshot {
    /// When the collector captured the state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<DateTime<Utc>>,

    /// Machine the state was captured from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    #[serde(default)]
    pub user_rights: CategorySnapshot,

    #[serde(default)]
    pub account_policy: CategorySnapshot,

    #[serde(default)]
    pub audit_policy: CategorySnapshot,

    /// Raw identifier to qualified account name, as exported by the collector
    #[serde(default)]
    pub principals: BTreeMap<String, String>,
}

impl PolicySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a snapshot exported as JSON
    pub fn from_json(content: &str) -> Result<Self> {
        let snapshot: PolicySnapshot = serde_json::from_str(content)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn category(&self, category: CheckCategory) -> &CategorySnapshot {
        match category {
            CheckCategory::UserRights => &self.user_rights,
            CheckCategory::AccountPolicy => &self.account_policy,
            CheckCategory::AuditPolicy => &self.audit_policy,
        }
    }

    pub fn category_mut(&mut self, category: CheckCategory) -> &mut CategorySnapshot {
        match category {
            CheckCategory::UserRights => &mut self.user_rights,
            CheckCategory::AccountPolicy => &mut self.account_policy,
            CheckCategory::AuditPolicy => &mut self.audit_policy,
        }
    }

    /// Look up one key in one category
    pub fn entry(&self, category: CheckCategory, key: &str) -> Option<SnapshotEntry<'_>> {
        self.category(category).entry(key)
    }

    /// Builder-style insert, mostly for hosts and tests
    pub fn with_entry<I, S>(mut self, category: CheckCategory, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category_mut(category)
            .insert(key, values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_principal(mut self, identifier: &str, name: &str) -> Self {
        self.principals
            .insert(identifier.to_string(), name.to_string());
        self
    }

    fn validate(&self) -> Result<()> {
        for category in CheckCategory::ALL {
            if let Some(key) = self
                .category(category)
                .entries
                .keys()
                .find(|k| k.trim().is_empty())
            {
                return Err(Error::InvalidSnapshot(format!(
                    "{} contains an entry with empty key {:?}",
                    category, key
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_json() {
        let json = r#"{
            "captured_at": "2024-03-01T12:00:00Z",
            "hostname": "ws-01",
            "user_rights": {
                "SeBackupPrivilege": ["S-1-5-32-551"],
                "SeShutdownPrivilege": ["S-1-5-32-544", "S-1-5-32-551"]
            },
            "audit_policy": { "AuditLogonEvents": ["3"] },
            "principals": { "S-1-5-32-551": "BUILTIN\\Backup Operators" }
        }"#;

        let snapshot = PolicySnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.hostname.as_deref(), Some("ws-01"));
        assert!(snapshot.captured_at.is_some());
        assert_eq!(snapshot.user_rights.len(), 2);
        assert!(snapshot.account_policy.is_empty());

        let entry = snapshot
            .entry(CheckCategory::UserRights, "SeShutdownPrivilege")
            .unwrap();
        assert_eq!(entry.values.len(), 2);
        assert_eq!(entry.first(), Some("S-1-5-32-544"));

        assert!(snapshot
            .entry(CheckCategory::UserRights, "SeDebugPrivilege")
            .is_none());
        assert_eq!(
            snapshot.principals.get("S-1-5-32-551").map(String::as_str),
            Some("BUILTIN\\Backup Operators")
        );
    }

    #[test]
    fn test_snapshot_rejects_empty_key() {
        let json = r#"{ "account_policy": { "": ["12"] } }"#;
        let err = PolicySnapshot::from_json(json).unwrap_err();
        assert!(matches!(err, Error::InvalidSnapshot(_)));
    }

    #[test]
    fn test_builder_entries() {
        let snapshot = PolicySnapshot::new()
            .with_entry(CheckCategory::AccountPolicy, "LockoutBadCount", ["5"])
            .with_principal("S-1-5-32-544", "BUILTIN\\Administrators");

        let entry = snapshot
            .entry(CheckCategory::AccountPolicy, "LockoutBadCount")
            .unwrap();
        assert_eq!(entry.key, "LockoutBadCount");
        assert_eq!(entry.first(), Some("5"));
        assert_eq!(snapshot.principals.len(), 1);
    }
}

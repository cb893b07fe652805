//! Baseline definitions - the desired policy an operator authors

use crate::category::CheckCategory;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How a required principal is identified in the baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchKind {
    /// Compared against the resolved display name (`Backup Operators`)
    #[serde(rename = "name", alias = "by_name")]
    ByName,
    /// Compared against the raw security identifier (`S-1-5-32-551`)
    #[serde(rename = "sid", alias = "by_security_id")]
    BySecurityId,
}

/// One principal a privilege should be assigned to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierRequirement {
    pub kind: MatchKind,
    pub value: String,
}

impl IdentifierRequirement {
    pub fn by_name(value: impl Into<String>) -> Self {
        Self {
            kind: MatchKind::ByName,
            value: value.into(),
        }
    }

    pub fn by_sid(value: impl Into<String>) -> Self {
        Self {
            kind: MatchKind::BySecurityId,
            value: value.into(),
        }
    }
}

/// A privilege and the exact set of principals that should hold it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckDefinition {
    /// OS constant for the privilege (e.g. `SeBackupPrivilege`)
    pub key: String,
    /// Setting name shown in diagnostics
    pub label: String,
    /// Required principals, in output order
    pub identifiers: Vec<IdentifierRequirement>,
}

impl CheckDefinition {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            identifiers: Vec::new(),
        }
    }

    pub fn with_identifier(mut self, requirement: IdentifierRequirement) -> Self {
        self.identifiers.push(requirement);
        self
    }
}

/// Comparison an integer account-policy value must satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum SettingRequirement {
    Equals { value: i64 },
    AtLeast { value: i64 },
    AtMost { value: i64 },
    Between { min: i64, max: i64 },
}

impl SettingRequirement {
    pub fn satisfied_by(&self, actual: i64) -> bool {
        match *self {
            SettingRequirement::Equals { value } => actual == value,
            SettingRequirement::AtLeast { value } => actual >= value,
            SettingRequirement::AtMost { value } => actual <= value,
            SettingRequirement::Between { min, max } => (min..=max).contains(&actual),
        }
    }
}

impl std::fmt::Display for SettingRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingRequirement::Equals { value } => write!(f, "{}", value),
            SettingRequirement::AtLeast { value } => write!(f, "at least {}", value),
            SettingRequirement::AtMost { value } => write!(f, "at most {}", value),
            SettingRequirement::Between { min, max } => write!(f, "between {} and {}", min, max),
        }
    }
}

/// An account-policy setting (password length, lockout threshold, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingDefinition {
    pub key: String,
    pub label: String,
    pub expected: SettingRequirement,
}

/// Success/failure auditing flags of one audit category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditFlags {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub failure: bool,
}

impl AuditFlags {
    pub fn new(success: bool, failure: bool) -> Self {
        Self { success, failure }
    }

    /// Parse either the numeric export form (bit 1 = success, bit 2 =
    /// failure) or the textual form used by auditing tools.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Ok(bits) = value.parse::<u8>() {
            return (bits <= 3).then(|| Self::new(bits & 1 != 0, bits & 2 != 0));
        }

        match value.to_lowercase().as_str() {
            "no auditing" | "none" => Some(Self::new(false, false)),
            "success" => Some(Self::new(true, false)),
            "failure" => Some(Self::new(false, true)),
            "success and failure" | "success, failure" => Some(Self::new(true, true)),
            _ => None,
        }
    }
}

impl std::fmt::Display for AuditFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.success, self.failure) {
            (false, false) => write!(f, "No Auditing"),
            (true, false) => write!(f, "Success"),
            (false, true) => write!(f, "Failure"),
            (true, true) => write!(f, "Success, Failure"),
        }
    }
}

/// An audit category and the flags it should have
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditDefinition {
    pub key: String,
    pub label: String,
    #[serde(flatten)]
    pub expected: AuditFlags,
}

/// The full baseline: one ordered definition list per category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Baseline {
    #[serde(default)]
    pub user_rights: Vec<CheckDefinition>,

    #[serde(default)]
    pub account_policy: Vec<SettingDefinition>,

    #[serde(default)]
    pub audit_policy: Vec<AuditDefinition>,
}

impl Baseline {
    /// Parse and validate a baseline from YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        let baseline: Baseline = serde_yaml::from_str(content)?;
        baseline.validate()?;
        Ok(baseline)
    }

    /// Number of definitions in a category
    pub fn len(&self, category: CheckCategory) -> usize {
        match category {
            CheckCategory::UserRights => self.user_rights.len(),
            CheckCategory::AccountPolicy => self.account_policy.len(),
            CheckCategory::AuditPolicy => self.audit_policy.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        CheckCategory::ALL.iter().all(|c| self.len(*c) == 0)
    }

    /// Reject baselines that cannot be scored meaningfully
    pub fn validate(&self) -> Result<()> {
        validate_keys(
            CheckCategory::UserRights,
            self.user_rights.iter().map(|d| (d.key.as_str(), d.label.as_str())),
        )?;
        validate_keys(
            CheckCategory::AccountPolicy,
            self.account_policy
                .iter()
                .map(|d| (d.key.as_str(), d.label.as_str())),
        )?;
        validate_keys(
            CheckCategory::AuditPolicy,
            self.audit_policy
                .iter()
                .map(|d| (d.key.as_str(), d.label.as_str())),
        )?;

        for definition in &self.user_rights {
            if definition.identifiers.is_empty() {
                return Err(invalid(
                    CheckCategory::UserRights,
                    format!("'{}' lists no identifiers", definition.key),
                ));
            }
            if definition.identifiers.iter().any(|i| i.value.trim().is_empty()) {
                return Err(invalid(
                    CheckCategory::UserRights,
                    format!("'{}' has an empty identifier", definition.key),
                ));
            }
        }

        for definition in &self.account_policy {
            if let SettingRequirement::Between { min, max } = definition.expected {
                if min > max {
                    return Err(invalid(
                        CheckCategory::AccountPolicy,
                        format!("'{}' has min {} above max {}", definition.key, min, max),
                    ));
                }
            }
        }

        Ok(())
    }
}

fn invalid(category: CheckCategory, message: String) -> Error {
    Error::InvalidBaseline {
        category: category.to_string(),
        message,
    }
}

fn validate_keys<'a>(
    category: CheckCategory,
    entries: impl Iterator<Item = (&'a str, &'a str)>,
) -> Result<()> {
    let mut seen = HashSet::new();

    for (key, label) in entries {
        if key.trim().is_empty() {
            return Err(invalid(category, String::from("definition with empty key")));
        }
        if label.trim().is_empty() {
            return Err(invalid(category, format!("'{}' has an empty label", key)));
        }
        if !seen.insert(key) {
            return Err(Error::DuplicateKey {
                category: category.to_string(),
                key: key.to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASELINE: &str = r#"
user_rights:
  - key: SeBackupPrivilege
    label: Back up files and directories
    identifiers:
      - kind: name
        value: Backup Operators
      - kind: sid
        value: S-1-5-32-544
account_policy:
  - key: MinimumPasswordLength
    label: Minimum password length
    expected: { op: at-least, value: 12 }
audit_policy:
  - key: AuditLogonEvents
    label: Audit logon events
    success: true
    failure: true
"#;

    #[test]
    fn test_baseline_from_yaml() {
        let baseline = Baseline::from_yaml(BASELINE).unwrap();

        assert_eq!(baseline.user_rights.len(), 1);
        let rights = &baseline.user_rights[0];
        assert_eq!(rights.key, "SeBackupPrivilege");
        assert_eq!(
            rights.identifiers,
            vec![
                IdentifierRequirement::by_name("Backup Operators"),
                IdentifierRequirement::by_sid("S-1-5-32-544"),
            ]
        );

        assert_eq!(
            baseline.account_policy[0].expected,
            SettingRequirement::AtLeast { value: 12 }
        );
        assert_eq!(baseline.audit_policy[0].expected, AuditFlags::new(true, true));
        assert_eq!(baseline.len(CheckCategory::AuditPolicy), 1);
        assert!(!baseline.is_empty());
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let yaml = r#"
user_rights:
  - key: SeDebugPrivilege
    label: Debug programs
    identifiers: [{ kind: name, value: Administrators }]
  - key: SeDebugPrivilege
    label: Debug programs again
    identifiers: [{ kind: name, value: Users }]
"#;
        let err = Baseline::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { ref key, .. } if key == "SeDebugPrivilege"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_empty_key_and_identifiers_rejected() {
        let empty_key = Baseline {
            user_rights: vec![CheckDefinition::new(" ", "Nameless")
                .with_identifier(IdentifierRequirement::by_name("Users"))],
            ..Default::default()
        };
        assert!(matches!(
            empty_key.validate(),
            Err(Error::InvalidBaseline { .. })
        ));

        let no_identifiers = Baseline {
            user_rights: vec![CheckDefinition::new("SeShutdownPrivilege", "Shut down the system")],
            ..Default::default()
        };
        assert!(matches!(
            no_identifiers.validate(),
            Err(Error::InvalidBaseline { .. })
        ));

        let blank_identifier = Baseline {
            user_rights: vec![CheckDefinition::new("SeDebugPrivilege", "Debug programs")
                .with_identifier(IdentifierRequirement::by_name("Administrators"))
                .with_identifier(IdentifierRequirement::by_sid("  "))],
            ..Default::default()
        };
        assert!(matches!(
            blank_identifier.validate(),
            Err(Error::InvalidBaseline { ref message, .. }) if message.contains("empty identifier")
        ));

        let empty_label = Baseline {
            audit_policy: vec![AuditDefinition {
                key: String::from("AuditLogonEvents"),
                label: String::new(),
                expected: AuditFlags::new(true, true),
            }],
            ..Default::default()
        };
        assert!(matches!(
            empty_label.validate(),
            Err(Error::InvalidBaseline { ref category, .. }) if category == "audit_policy"
        ));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let baseline = Baseline {
            account_policy: vec![SettingDefinition {
                key: String::from("MaximumPasswordAge"),
                label: String::from("Maximum password age"),
                expected: SettingRequirement::Between { min: 90, max: 30 },
            }],
            ..Default::default()
        };
        assert!(baseline.validate().is_err());
    }

    #[test]
    fn test_setting_requirement() {
        assert!(SettingRequirement::AtLeast { value: 12 }.satisfied_by(14));
        assert!(!SettingRequirement::AtMost { value: 5 }.satisfied_by(6));
        assert!(SettingRequirement::Between { min: 1, max: 3 }.satisfied_by(3));
        assert!(SettingRequirement::Equals { value: 0 }.satisfied_by(0));
        assert_eq!(
            SettingRequirement::Between { min: 30, max: 90 }.to_string(),
            "between 30 and 90"
        );
    }

    #[test]
    fn test_audit_flags_parse() {
        assert_eq!(AuditFlags::parse("3"), Some(AuditFlags::new(true, true)));
        assert_eq!(AuditFlags::parse("2"), Some(AuditFlags::new(false, true)));
        assert_eq!(AuditFlags::parse("Success"), Some(AuditFlags::new(true, false)));
        assert_eq!(AuditFlags::parse("No Auditing"), Some(AuditFlags::default()));
        assert_eq!(AuditFlags::parse("7"), None);
        assert_eq!(AuditFlags::parse("sometimes"), None);
        assert_eq!(AuditFlags::new(true, true).to_string(), "Success, Failure");
    }
}

//! Policy check categories and diagnostic verbosity

use serde::{Deserialize, Serialize};

/// Policy category a check scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckCategory {
    /// Privilege assignments ("user rights")
    UserRights,
    /// Password and account lockout settings
    AccountPolicy,
    /// Audit event settings
    AuditPolicy,
}

impl CheckCategory {
    /// All categories, in report order
    pub const ALL: [CheckCategory; 3] = [
        CheckCategory::UserRights,
        CheckCategory::AccountPolicy,
        CheckCategory::AuditPolicy,
    ];

    /// Key used in baseline and snapshot files
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckCategory::UserRights => "user_rights",
            CheckCategory::AccountPolicy => "account_policy",
            CheckCategory::AuditPolicy => "audit_policy",
        }
    }

    /// Section header used in reports
    pub fn header(&self) -> &'static str {
        match self {
            CheckCategory::UserRights => "User Rights Assignment",
            CheckCategory::AccountPolicy => "Account Policies",
            CheckCategory::AuditPolicy => "Audit Policy",
        }
    }
}

impl std::fmt::Display for CheckCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CheckCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "user_rights" | "privileges" => Ok(CheckCategory::UserRights),
            "account_policy" | "password_policy" => Ok(CheckCategory::AccountPolicy),
            "audit_policy" | "audit" => Ok(CheckCategory::AuditPolicy),
            _ => Err(format!("Unknown check category: {}", s)),
        }
    }
}

/// How much a check says about definitions it did not award
///
/// Graders get the silent form by default so a report never hints at the
/// remediation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Only correctly configured definitions produce diagnostics
    #[default]
    Silent,
    /// Incorrect definitions also produce a diagnostic naming the mismatch
    Explain,
}

impl Verbosity {
    pub fn explains(&self) -> bool {
        matches!(self, Verbosity::Explain)
    }
}

impl std::str::FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "quiet" => Ok(Verbosity::Silent),
            "explain" | "verbose" => Ok(Verbosity::Explain),
            _ => Err(format!("Unknown verbosity: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parsing() {
        assert_eq!(
            "user-rights".parse::<CheckCategory>().unwrap(),
            CheckCategory::UserRights
        );
        assert_eq!(
            "AUDIT_POLICY".parse::<CheckCategory>().unwrap(),
            CheckCategory::AuditPolicy
        );
        assert!("firewall".parse::<CheckCategory>().is_err());
    }

    #[test]
    fn test_verbosity_default_is_silent() {
        assert_eq!(Verbosity::default(), Verbosity::Silent);
        assert!(!Verbosity::Silent.explains());
        assert!("explain".parse::<Verbosity>().unwrap().explains());
    }
}

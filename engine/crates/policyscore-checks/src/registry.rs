//! Check registry - the ordered set of checks a run executes

use crate::{AccountPolicyCheck, AuditPolicyCheck, MatchStrategy, PrivilegeAssignmentCheck};
use policyscore_core::{Baseline, CheckCategory, PolicyCheck};
use std::sync::Arc;
use tracing::debug;

/// Registry of policy checks, kept in registration order
pub struct CheckRegistry {
    checks: Vec<Arc<dyn PolicyCheck>>,
}

impl CheckRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// One check per baseline category that has definitions
    pub fn from_baseline(baseline: &Baseline, strategy: MatchStrategy) -> Self {
        let mut registry = Self::new();

        if !baseline.user_rights.is_empty() {
            registry.register(Arc::new(
                PrivilegeAssignmentCheck::new(baseline.user_rights.clone()).with_strategy(strategy),
            ));
        }
        if !baseline.account_policy.is_empty() {
            registry.register(Arc::new(AccountPolicyCheck::new(
                baseline.account_policy.clone(),
            )));
        }
        if !baseline.audit_policy.is_empty() {
            registry.register(Arc::new(AuditPolicyCheck::new(
                baseline.audit_policy.clone(),
            )));
        }

        registry
    }

    /// Register a check; it runs after those already registered
    pub fn register(&mut self, check: Arc<dyn PolicyCheck>) {
        debug!(
            "Registered check: {} ({} points)",
            check.label(),
            check.max_score()
        );
        self.checks.push(check);
    }

    /// Checks in execution order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn PolicyCheck>> {
        self.checks.iter()
    }

    /// Get the check for a category, if registered
    pub fn get(&self, category: CheckCategory) -> Option<Arc<dyn PolicyCheck>> {
        self.checks
            .iter()
            .find(|c| c.category() == category)
            .cloned()
    }

    /// Points available across all checks
    pub fn max_score(&self) -> u32 {
        self.checks.iter().map(|c| c.max_score()).sum()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl Default for CheckRegistry {
    fn default() -> Self {
        Self::new()
    }
}

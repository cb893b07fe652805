//! Check trait - the interface every policy category implements

use crate::category::{CheckCategory, Verbosity};
use crate::error::Result;
use crate::identity::{IdentityResolver, ResolverCache};
use crate::snapshot::PolicySnapshot;
use serde::{Deserialize, Serialize};

/// Outcome of running one check against a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Label of the check that produced this result
    pub check: String,
    pub points: u32,
    pub max_points: u32,
    /// Diagnostics in baseline definition order
    pub diagnostics: Vec<String>,
}

impl CheckResult {
    pub fn new(check: impl Into<String>, max_points: u32) -> Self {
        Self {
            check: check.into(),
            points: 0,
            max_points,
            diagnostics: Vec::new(),
        }
    }

    /// Award one point with its justification
    pub fn award(&mut self, diagnostic: String) {
        self.points += 1;
        self.diagnostics.push(diagnostic);
    }

    /// Record a diagnostic without awarding a point
    pub fn note(&mut self, diagnostic: String) {
        self.diagnostics.push(diagnostic);
    }

    pub fn is_consistent(&self) -> bool {
        self.points <= self.max_points
    }
}

/// State shared by the checks of one scoring run
pub struct ScoringContext<'r> {
    /// Run-scoped identity cache
    pub resolver: ResolverCache<'r>,
    pub verbosity: Verbosity,
}

impl<'r> ScoringContext<'r> {
    pub fn new(resolver: &'r dyn IdentityResolver) -> Self {
        Self {
            resolver: ResolverCache::new(resolver),
            verbosity: Verbosity::default(),
        }
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }
}

/// The trait all policy categories implement
pub trait PolicyCheck: Send + Sync {
    /// Category this check scores
    fn category(&self) -> CheckCategory;

    /// Section label used to group diagnostics in the report
    fn label(&self) -> &str {
        self.category().header()
    }

    /// Points available, independent of the snapshot
    fn max_score(&self) -> u32;

    /// Score the snapshot. Diagnostics follow baseline order.
    fn compute(&self, snapshot: &PolicySnapshot, ctx: &mut ScoringContext<'_>) -> Result<CheckResult>;
}

//! Audit policy scoring

use crate::outcome::Outcome;
use policyscore_core::{
    AuditDefinition, AuditFlags, CheckCategory, CheckResult, PolicyCheck, PolicySnapshot, Result,
    ScoringContext,
};
use tracing::debug;

/// Scores success/failure auditing per audit category
pub struct AuditPolicyCheck {
    definitions: Vec<AuditDefinition>,
}

impl AuditPolicyCheck {
    pub fn new(definitions: Vec<AuditDefinition>) -> Self {
        Self { definitions }
    }

    pub fn definitions(&self) -> &[AuditDefinition] {
        &self.definitions
    }

    fn evaluate(&self, definition: &AuditDefinition, snapshot: &PolicySnapshot) -> Outcome {
        let Some(entry) = snapshot.entry(CheckCategory::AuditPolicy, &definition.key) else {
            return Outcome::Absent;
        };

        match entry.first().and_then(AuditFlags::parse) {
            Some(actual) if actual == definition.expected => Outcome::Correct(actual.to_string()),
            Some(actual) => Outcome::Incorrect(format!(
                "expected {}, found {}",
                definition.expected, actual
            )),
            None => Outcome::Incorrect(format!(
                "unreadable value '{}'",
                entry.first().unwrap_or_default()
            )),
        }
    }
}

impl PolicyCheck for AuditPolicyCheck {
    fn category(&self) -> CheckCategory {
        CheckCategory::AuditPolicy
    }

    fn max_score(&self) -> u32 {
        self.definitions.len() as u32
    }

    fn compute(&self, snapshot: &PolicySnapshot, ctx: &mut ScoringContext<'_>) -> Result<CheckResult> {
        let mut result = CheckResult::new(self.label(), self.max_score());

        for definition in &self.definitions {
            let outcome = self.evaluate(definition, snapshot);
            debug!("{} ({}): {:?}", definition.key, definition.label, outcome);
            outcome.apply(&definition.label, ctx.verbosity, &mut result);
        }

        Ok(result)
    }
}

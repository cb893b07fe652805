//! Password and account lockout policy scoring

use crate::outcome::Outcome;
use policyscore_core::{
    CheckCategory, CheckResult, PolicyCheck, PolicySnapshot, Result, ScoringContext,
    SettingDefinition,
};
use tracing::debug;

/// Scores integer account-policy settings against their required ranges
pub struct AccountPolicyCheck {
    definitions: Vec<SettingDefinition>,
}

impl AccountPolicyCheck {
    pub fn new(definitions: Vec<SettingDefinition>) -> Self {
        Self { definitions }
    }

    pub fn definitions(&self) -> &[SettingDefinition] {
        &self.definitions
    }

    fn evaluate(&self, definition: &SettingDefinition, snapshot: &PolicySnapshot) -> Outcome {
        let Some(entry) = snapshot.entry(CheckCategory::AccountPolicy, &definition.key) else {
            return Outcome::Absent;
        };

        let Some(raw) = entry.first() else {
            return Outcome::Incorrect(String::from("no value recorded"));
        };

        match raw.trim().parse::<i64>() {
            Ok(actual) if definition.expected.satisfied_by(actual) => {
                Outcome::Correct(actual.to_string())
            }
            Ok(actual) => Outcome::Incorrect(format!(
                "expected {}, found {}",
                definition.expected, actual
            )),
            Err(_) => Outcome::Incorrect(format!("unreadable value '{}'", raw)),
        }
    }
}

impl PolicyCheck for AccountPolicyCheck {
    fn category(&self) -> CheckCategory {
        CheckCategory::AccountPolicy
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

//! Privilege assignment ("user rights") scoring

use crate::matching::MatchStrategy;
use crate::outcome::Outcome;
use policyscore_core::{
    CheckCategory, CheckDefinition, CheckResult, PolicyCheck, PolicySnapshot, Result,
    ScoringContext,
};
use tracing::debug;

/// Scores which principals hold each privilege
///
/// A definition earns its point only when the principals on the system are
/// exactly the required ones. A privilege missing from the snapshot is
/// skipped, not penalized.
pub struct PrivilegeAssignmentCheck {
    definitions: Vec<CheckDefinition>,
    strategy: MatchStrategy,
}

impl PrivilegeAssignmentCheck {
    pub fn new(definitions: Vec<CheckDefinition>) -> Self {
        Self {
            definitions,
            strategy: MatchStrategy::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn definitions(&self) -> &[CheckDefinition] {
        &self.definitions
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    fn evaluate(
        &self,
        definition: &CheckDefinition,
        snapshot: &PolicySnapshot,
        ctx: &mut ScoringContext<'_>,
    ) -> Outcome {
        let Some(entry) = snapshot.entry(CheckCategory::UserRights, &definition.key) else {
            return Outcome::Absent;
        };

        match self
            .strategy
            .reconcile(&definition.identifiers, entry.values, &mut ctx.resolver)
        {
            Ok(names) => {
                let names: Vec<&str> = definition
                    .identifiers
                    .iter()
                    .zip(&names)
                    .map(|(requirement, name)| name.as_deref().unwrap_or(requirement.value.as_str()))
                    .collect();
                Outcome::Correct(names.join(", "))
            }
            Err(mismatch) => Outcome::Incorrect(mismatch.to_string()),
        }
    }
}

impl PolicyCheck for PrivilegeAssignmentCheck {
    fn category(&self) -> CheckCategory {
        CheckCategory::UserRights
    }

    fn max_score(&self) -> u32 {
        self.definitions.len() as u32
    }

    fn compute(&self, snapshot: &PolicySnapshot, ctx: &mut ScoringContext<'_>) -> Result<CheckResult> {
        let mut result = CheckResult::new(self.label(), self.max_score());

        for definition in &self.definitions {
            let outcome = self.evaluate(definition, snapshot, ctx);
            debug!("{} ({}): {:?}", definition.key, definition.label, outcome);
            outcome.apply(&definition.label, ctx.verbosity, &mut result);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use policyscore_core::{
        Error, IdentifierRequirement, IdentityResolver, StaticResolver, Verbosity,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn backup_definition() -> CheckDefinition {
        CheckDefinition::new("SeBackupPrivilege", "Back up files and directories")
            .with_identifier(IdentifierRequirement::by_name("Backup Operators"))
    }

    fn resolver() -> StaticResolver {
        StaticResolver::new()
            .with_name("S-1-5-32-544", "BUILTIN\\Administrators")
            .with_name("S-1-5-32-551", "BUILTIN\\Backup Operators")
            .with_name("S-1-5-21-1001", "WS01\\alice")
    }

    fn score(
        check: &PrivilegeAssignmentCheck,
        snapshot: &PolicySnapshot,
        resolver: &dyn IdentityResolver,
    ) -> CheckResult {
        let mut ctx = ScoringContext::new(resolver);
        check.compute(snapshot, &mut ctx).unwrap()
    }

    #[test]
    fn test_correct_assignment_by_name() {
        let check = PrivilegeAssignmentCheck::new(vec![backup_definition()]);
        let snapshot = PolicySnapshot::new().with_entry(
            CheckCategory::UserRights,
            "SeBackupPrivilege",
            ["S-1-5-32-551"],
        );

        let result = score(&check, &snapshot, &resolver());
        assert_eq!(result.points, 1);
        assert_eq!(result.max_points, 1);
        assert_eq!(
            result.diagnostics,
            vec!["'Back up files and directories' set correctly - Backup Operators"]
        );
    }

    #[test]
    fn test_missing_principal_scores_nothing() {
        let definition = CheckDefinition::new("SeRestorePrivilege", "Restore files and directories")
            .with_identifier(IdentifierRequirement::by_name("Administrators"))
            .with_identifier(IdentifierRequirement::by_name("Backup Operators"));
        let check = PrivilegeAssignmentCheck::new(vec![definition]);
        let snapshot = PolicySnapshot::new().with_entry(
            CheckCategory::UserRights,
            "SeRestorePrivilege",
            ["S-1-5-32-544"],
        );

        let result = score(&check, &snapshot, &resolver());
        assert_eq!(result.points, 0);
        assert_eq!(result.max_points, 1);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_absent_privilege_is_skipped() {
        let check = PrivilegeAssignmentCheck::new(vec![backup_definition()]);
        let snapshot = PolicySnapshot::new().with_entry(
            CheckCategory::UserRights,
            "SeDebugPrivilege",
            ["S-1-5-32-544"],
        );

        let resolver = resolver();
        let mut ctx = ScoringContext::new(&resolver).with_verbosity(Verbosity::Explain);
        let result = check.compute(&snapshot, &mut ctx).unwrap();

        assert_eq!(result.points, 0);
        assert!(result.diagnostics.is_empty());
        assert_eq!(ctx.resolver.lookups(), 0);
    }

    #[test]
    fn test_unresolvable_principal_fails_name_match() {
        let resolver = |id: &str| -> Result<String> {
            Err(Error::ResolutionFailed {
                identifier: id.to_string(),
                message: String::from("orphaned account"),
            })
        };
        let check = PrivilegeAssignmentCheck::new(vec![backup_definition()]);
        let snapshot = PolicySnapshot::new().with_entry(
            CheckCategory::UserRights,
            "SeBackupPrivilege",
            ["S-1-5-21-404"],
        );

        let result = score(&check, &snapshot, &resolver);
        assert_eq!(result.points, 0);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_extra_principal_is_incorrect() {
        let check = PrivilegeAssignmentCheck::new(vec![backup_definition()]);
        let snapshot = PolicySnapshot::new().with_entry(
            CheckCategory::UserRights,
            "SeBackupPrivilege",
            ["S-1-5-32-551", "S-1-5-21-1001"],
        );

        let resolver = resolver();
        let mut ctx = ScoringContext::new(&resolver).with_verbosity(Verbosity::Explain);
        let result = check.compute(&snapshot, &mut ctx).unwrap();

        assert_eq!(result.points, 0);
        assert_eq!(
            result.diagnostics,
            vec!["'Back up files and directories' set incorrectly - expected 1 principal(s), found 2"]
        );
    }

    #[test]
    fn test_names_follow_requirement_order() {
        let definition = CheckDefinition::new("SeShutdownPrivilege", "Shut down the system")
            .with_identifier(IdentifierRequirement::by_sid("S-1-5-21-1001"))
            .with_identifier(IdentifierRequirement::by_name("Administrators"))
            .with_identifier(IdentifierRequirement::by_name("Backup Operators"));
        let check = PrivilegeAssignmentCheck::new(vec![definition]);
        let snapshot = PolicySnapshot::new().with_entry(
            CheckCategory::UserRights,
            "SeShutdownPrivilege",
            ["S-1-5-32-551", "S-1-5-32-544", "S-1-5-21-1001"],
        );

        let result = score(&check, &snapshot, &resolver());
        assert_eq!(result.points, 1);
        assert_eq!(
            result.diagnostics,
            vec!["'Shut down the system' set correctly - alice, Administrators, Backup Operators"]
        );
    }

    #[test]
    fn test_duplicate_credit_depends_on_strategy() {
        let definition = CheckDefinition::new("SeDebugPrivilege", "Debug programs")
            .with_identifier(IdentifierRequirement::by_name("Administrators"))
            .with_identifier(IdentifierRequirement::by_name("Backup Operators"));
        let snapshot = PolicySnapshot::new().with_entry(
            CheckCategory::UserRights,
            "SeDebugPrivilege",
            ["S-1-5-32-544", "S-1-5-32-544"],
        );

        let first_match = PrivilegeAssignmentCheck::new(vec![definition.clone()]);
        let result = score(&first_match, &snapshot, &resolver());
        assert_eq!(result.points, 1);
        assert_eq!(
            result.diagnostics,
            vec!["'Debug programs' set correctly - Administrators, Backup Operators"]
        );

        let one_to_one =
            PrivilegeAssignmentCheck::new(vec![definition]).with_strategy(MatchStrategy::OneToOne);
        let result = score(&one_to_one, &snapshot, &resolver());
        assert_eq!(result.points, 0);
    }

    #[test]
    fn test_compute_is_idempotent_and_cached() {
        let calls = AtomicUsize::new(0);
        let table = resolver();
        let counting = |id: &str| -> Result<String> {
            calls.fetch_add(1, Ordering::SeqCst);
            table.resolve(id)
        };

        let check = PrivilegeAssignmentCheck::new(vec![
            backup_definition(),
            CheckDefinition::new("SeDebugPrivilege", "Debug programs")
                .with_identifier(IdentifierRequirement::by_name("Backup Operators")),
        ]);
        let snapshot = PolicySnapshot::new()
            .with_entry(CheckCategory::UserRights, "SeBackupPrivilege", ["S-1-5-32-551"])
            .with_entry(CheckCategory::UserRights, "SeDebugPrivilege", ["S-1-5-32-551"]);

        let mut ctx = ScoringContext::new(&counting);
        let first = check.compute(&snapshot, &mut ctx).unwrap();
        let second = check.compute(&snapshot, &mut ctx).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.points, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_max_score_counts_definitions() {
        let check = PrivilegeAssignmentCheck::new(vec![
            backup_definition(),
            CheckDefinition::new("SeDebugPrivilege", "Debug programs")
                .with_identifier(IdentifierRequirement::by_name("Administrators"))
                .with_identifier(IdentifierRequirement::by_name("Users")),
        ]);
        assert_eq!(check.max_score(), 2);
        assert_eq!(check.label(), "User Rights Assignment");
        assert_eq!(check.strategy(), MatchStrategy::FirstMatch);
    }
}

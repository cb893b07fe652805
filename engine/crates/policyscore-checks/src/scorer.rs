//! Scorer - runs every registered check and aggregates the report

use crate::registry::CheckRegistry;
use policyscore_core::{
    IdentityResolver, PolicyCheck, PolicySnapshot, ScoreReport, ScoringContext, SectionReport,
    Verbosity,
};
use std::panic::{self, AssertUnwindSafe};
use tracing::{info, warn};

/// Runs checks in registration order against one snapshot
///
/// A check that errors or panics contributes a zero-point section with a
/// single error diagnostic; the remaining checks still run.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    verbosity: Verbosity,
}

impl Scorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Score `snapshot` with every check in `registry`
    ///
    /// Identity lookups are cached for the duration of this call only.
    pub fn score(
        &self,
        registry: &CheckRegistry,
        snapshot: &PolicySnapshot,
        resolver: &dyn IdentityResolver,
    ) -> ScoreReport {
        info!(
            "Starting scoring run: {} checks, {} points available",
            registry.len(),
            registry.max_score()
        );

        let mut ctx = ScoringContext::new(resolver).with_verbosity(self.verbosity);
        let mut report = ScoreReport::new().with_hostname(snapshot.hostname.clone());

        for check in registry.iter() {
            let section = run_check(check.as_ref(), snapshot, &mut ctx);
            info!(
                "{}: {}/{} points",
                section.header, section.points, section.max_points
            );
            report.push(section);
        }

        info!(
            "Scoring complete: {}/{} points, {} identities resolved",
            report.total_points,
            report.total_max,
            ctx.resolver.lookups()
        );

        report
    }
}

fn run_check(
    check: &dyn PolicyCheck,
    snapshot: &PolicySnapshot,
    ctx: &mut ScoringContext<'_>,
) -> SectionReport {
    let max_points = check.max_score();

    match panic::catch_unwind(AssertUnwindSafe(|| check.compute(snapshot, ctx))) {
        Ok(Ok(result)) if result.is_consistent() => SectionReport::from_result(result),
        Ok(Ok(result)) => {
            let message = format!(
                "awarded {} of {} points",
                result.points, result.max_points
            );
            warn!("Check {} inconsistent: {}", check.label(), message);
            SectionReport::error(check.label(), max_points, &message)
        }
        Ok(Err(e)) => {
            warn!("Check {} failed [{}]: {}", check.label(), e.code(), e);
            SectionReport::error(check.label(), max_points, &e.to_string())
        }
        Err(payload) => {
            let message = panic_message(&*payload);
            warn!("Check {} panicked: {}", check.label(), message);
            SectionReport::error(check.label(), max_points, &message)
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("check panicked")
    }
}

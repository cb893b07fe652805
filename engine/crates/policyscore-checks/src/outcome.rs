//! Per-definition outcomes and the diagnostic text they produce

use policyscore_core::{CheckResult, Verbosity};

/// Result of evaluating one baseline definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Key not present on the system; neither scored nor penalized
    Absent,
    /// Configured as the baseline requires; carries the observed value
    Correct(String),
    /// Misconfigured; carries what differed
    Incorrect(String),
}

impl Outcome {
    /// Fold this outcome into `result` under the given verbosity
    pub fn apply(self, label: &str, verbosity: Verbosity, result: &mut CheckResult) {
        match self {
            Outcome::Absent => {}
            Outcome::Correct(detail) => result.award(correct(label, &detail)),
            Outcome::Incorrect(detail) => {
                if verbosity.explains() {
                    result.note(incorrect(label, &detail));
                }
            }
        }
    }
}

pub fn correct(label: &str, detail: &str) -> String {
    format!("'{}' set correctly - {}", label, detail)
}

pub fn incorrect(label: &str, detail: &str) -> String {
    format!("'{}' set incorrectly - {}", label, detail)
}

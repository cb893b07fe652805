//! Score report handed to the renderer

use crate::check::CheckResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One report section, produced by one check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionReport {
    pub header: String,
    pub points: u32,
    pub max_points: u32,
    pub diagnostics: Vec<String>,
    /// Set when the check faulted and the section was synthesized
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,
}

impl SectionReport {
    pub fn from_result(result: CheckResult) -> Self {
        Self {
            header: result.check,
            points: result.points,
            max_points: result.max_points,
            diagnostics: result.diagnostics,
            failed: false,
        }
    }

    /// Zero-point section carrying a single error diagnostic
    pub fn error(header: impl Into<String>, max_points: u32, message: &str) -> Self {
        Self {
            header: header.into(),
            points: 0,
            max_points,
            diagnostics: vec![format!("Error: {}", message)],
            failed: true,
        }
    }
}

/// Overall outcome of one scoring run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    pub total_points: u32,
    pub total_max: u32,
    pub sections: Vec<SectionReport>,
}

impl ScoreReport {
    pub fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now(),
            hostname: None,
            total_points: 0,
            total_max: 0,
            sections: Vec::new(),
        }
    }

    pub fn with_hostname(mut self, hostname: Option<String>) -> Self {
        self.hostname = hostname;
        self
    }

    /// Append a section and keep the totals in step
    pub fn push(&mut self, section: SectionReport) {
        self.total_points += section.points;
        self.total_max += section.max_points;
        self.sections.push(section);
    }

    /// Score as a percentage of the achievable maximum
    pub fn percentage(&self) -> f64 {
        if self.total_max == 0 {
            0.0
        } else {
            (self.total_points as f64 / self.total_max as f64) * 100.0
        }
    }

    pub fn failed_sections(&self) -> impl Iterator<Item = &SectionReport> {
        self.sections.iter().filter(|s| s.failed)
    }
}

impl Default for ScoreReport {
    fn default() -> Self {
        Self::new()
    }
}

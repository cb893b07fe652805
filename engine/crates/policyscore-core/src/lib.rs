//! PolicyScore Core - Foundation types, traits, and error handling
//!
//! This crate provides the core abstractions used throughout PolicyScore:
//! - `Baseline`: The operator-authored policy a machine is scored against
//! - `PolicySnapshot`: The policy state captured from the machine
//! - `IdentityResolver` / `ResolverCache`: Security identifier to name resolution
//! - `PolicyCheck`: The trait every policy category implements
//! - `ScoreReport`: The aggregated outcome of a scoring run

pub mod baseline;
pub mod category;
pub mod check;
pub mod error;
pub mod identity;
pub mod report;
pub mod snapshot;

// Re-export commonly used types at crate root
pub use baseline::{
    AuditDefinition, AuditFlags, Baseline, CheckDefinition, IdentifierRequirement, MatchKind,
    SettingDefinition, SettingRequirement,
};
pub use category::{CheckCategory, Verbosity};
pub use check::{CheckResult, PolicyCheck, ScoringContext};
pub use error::{Error, Result};
pub use identity::{short_name, IdentityResolver, ResolverCache, StaticResolver};
pub use report::{ScoreReport, SectionReport};
pub use snapshot::{CategorySnapshot, PolicySnapshot, SnapshotEntry};

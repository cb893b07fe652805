//! PolicyScore Checks - Policy categories, check registry, and scoring
//!
//! This crate provides:
//! - `PrivilegeAssignmentCheck`, `AccountPolicyCheck`, `AuditPolicyCheck`:
//!   one check per policy category
//! - `MatchStrategy`: how observed principals are credited against required ones
//! - `CheckRegistry`: ordered set of checks built from a baseline
//! - `Scorer`: runs the registry against a snapshot and aggregates a report
//! - Loaders for baseline (YAML) and snapshot (JSON) files
//!
//! # Example
//!
//! ```no_run
//! use policyscore_checks::{loader, CheckRegistry, MatchStrategy, Scorer};
//! use policyscore_core::StaticResolver;
//!
//! let baseline = loader::load_baseline("baseline.yaml").unwrap();
//! let snapshot = loader::load_snapshot("snapshot.json").unwrap();
//!
//! let registry = CheckRegistry::from_baseline(&baseline, MatchStrategy::FirstMatch);
//! let resolver = StaticResolver::from_snapshot(&snapshot).with_well_known();
//! let report = Scorer::new().score(&registry, &snapshot, &resolver);
//!
//! println!("{}/{}", report.total_points, report.total_max);
//! ```

pub mod account_policy;
pub mod audit_policy;
pub mod loader;
pub mod matching;
pub mod outcome;
pub mod registry;
pub mod scorer;
pub mod user_rights;

pub use account_policy::AccountPolicyCheck;
pub use audit_policy::AuditPolicyCheck;
pub use matching::{MatchStrategy, Mismatch};
pub use outcome::Outcome;
pub use registry::CheckRegistry;
pub use scorer::Scorer;
pub use user_rights::PrivilegeAssignmentCheck;

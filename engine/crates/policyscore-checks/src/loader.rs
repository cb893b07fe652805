//! Loaders for baseline and snapshot files

use policyscore_core::{Baseline, CheckCategory, Error, PolicySnapshot, Result};
use std::path::Path;
use tracing::{debug, info};

/// Load and validate a YAML baseline
pub fn load_baseline(path: impl AsRef<Path>) -> Result<Baseline> {
    let path = path.as_ref();
    let content = read(path)?;

    info!("Loading baseline from: {}", path.display());
    let baseline = Baseline::from_yaml(&content)?;

    for category in CheckCategory::ALL {
        debug!("Baseline {}: {} definitions", category, baseline.len(category));
    }
    if baseline.is_empty() {
        return Err(Error::InvalidBaseline {
            category: String::from("all"),
            message: format!("{} defines no checks", path.display()),
        });
    }

    Ok(baseline)
}

/// Load a JSON snapshot exported by the policy collector
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<PolicySnapshot> {
    let path = path.as_ref();
    let content = read(path)?;

    info!("Loading snapshot from: {}", path.display());
    let snapshot = PolicySnapshot::from_json(&content)?;

    debug!(
        "Snapshot: {} user rights, {} account settings, {} audit settings, {} principals",
        snapshot.user_rights.len(),
        snapshot.account_policy.len(),
        snapshot.audit_policy.len(),
        snapshot.principals.len()
    );
    Ok(snapshot)
}

fn read(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(std::fs::read_to_string(path)?)
}

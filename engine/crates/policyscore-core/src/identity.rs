//! Identity resolution - raw security identifiers to comparable names

use crate::error::{Error, Result};
use crate::snapshot::PolicySnapshot;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Translates a raw security identifier into a qualified account name
///
/// Implementations typically call into the OS account database, so callers
/// should go through a [`ResolverCache`] rather than resolving repeatedly.
pub trait IdentityResolver: Send + Sync {
    /// Resolve `identifier` (e.g. `S-1-5-32-551`) to a name such as
    /// `BUILTIN\Backup Operators`
    fn resolve(&self, identifier: &str) -> Result<String>;
}

impl<F> IdentityResolver for F
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn resolve(&self, identifier: &str) -> Result<String> {
        self(identifier)
    }
}

/// Final component of a qualified account name (`DOMAIN\Name` -> `Name`)
pub fn short_name(name: &str) -> &str {
    name.rsplit('\\').next().unwrap_or(name)
}

/// Memoizes resolutions for the duration of one scoring run
///
/// Each distinct identifier reaches the underlying resolver at most once,
/// failures included. Names are stored already shortened.
pub struct ResolverCache<'r> {
    resolver: &'r dyn IdentityResolver,
    names: HashMap<String, std::result::Result<String, String>>,
    lookups: usize,
}

impl<'r> ResolverCache<'r> {
    pub fn new(resolver: &'r dyn IdentityResolver) -> Self {
        Self {
            resolver,
            names: HashMap::new(),
            lookups: 0,
        }
    }

    /// Display name for `identifier`, shortened to its last component
    pub fn resolve(&mut self, identifier: &str) -> Result<String> {
        if let Some(cached) = self.names.get(identifier) {
            return cached.clone().map_err(|message| Error::ResolutionFailed {
                identifier: identifier.to_string(),
                message,
            });
        }

        self.lookups += 1;
        let outcome = match self.resolver.resolve(identifier) {
            Ok(name) => {
                let name = short_name(&name).to_string();
                debug!("Resolved {} to '{}'", identifier, name);
                Ok(name)
            }
            Err(Error::ResolutionFailed { message, .. }) => Err(message),
            Err(e) => Err(e.to_string()),
        };

        if let Err(message) = &outcome {
            warn!("Cannot resolve identifier {}: {}", identifier, message);
        }

        self.names.insert(identifier.to_string(), outcome.clone());
        outcome.map_err(|message| Error::ResolutionFailed {
            identifier: identifier.to_string(),
            message,
        })
    }

    /// Number of calls made to the underlying resolver
    pub fn lookups(&self) -> usize {
        self.lookups
    }

    /// Number of distinct identifiers seen
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Well-known identifiers that resolve identically on every Windows machine
const WELL_KNOWN_SIDS: &[(&str, &str)] = &[
    ("S-1-1-0", "Everyone"),
    ("S-1-5-2", "NT AUTHORITY\\NETWORK"),
    ("S-1-5-4", "NT AUTHORITY\\INTERACTIVE"),
    ("S-1-5-6", "NT AUTHORITY\\SERVICE"),
    ("S-1-5-9", "NT AUTHORITY\\ENTERPRISE DOMAIN CONTROLLERS"),
    ("S-1-5-11", "NT AUTHORITY\\Authenticated Users"),
    ("S-1-5-18", "NT AUTHORITY\\SYSTEM"),
    ("S-1-5-19", "NT AUTHORITY\\LOCAL SERVICE"),
    ("S-1-5-20", "NT AUTHORITY\\NETWORK SERVICE"),
    ("S-1-5-32-544", "BUILTIN\\Administrators"),
    ("S-1-5-32-545", "BUILTIN\\Users"),
    ("S-1-5-32-546", "BUILTIN\\Guests"),
    ("S-1-5-32-547", "BUILTIN\\Power Users"),
    ("S-1-5-32-548", "BUILTIN\\Account Operators"),
    ("S-1-5-32-549", "BUILTIN\\Server Operators"),
    ("S-1-5-32-550", "BUILTIN\\Print Operators"),
    ("S-1-5-32-551", "BUILTIN\\Backup Operators"),
    ("S-1-5-32-552", "BUILTIN\\Replicator"),
    ("S-1-5-32-555", "BUILTIN\\Remote Desktop Users"),
    ("S-1-5-32-568", "BUILTIN\\IIS_IUSRS"),
    ("S-1-5-80-0", "NT SERVICE\\ALL SERVICES"),
    ("S-1-5-90-0", "Window Manager\\Window Manager Group"),
    ("S-1-5-113", "NT AUTHORITY\\Local account"),
    (
        "S-1-5-114",
        "NT AUTHORITY\\Local account and member of Administrators group",
    ),
];

/// Resolver backed by an in-memory table
///
/// Used when scoring an exported snapshot away from the machine it came
/// from: the collector exports the account names it saw alongside the policy.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    names: HashMap<String, String>,
    well_known: bool,
}

impl StaticResolver {
    /// Empty table, no well-known fallback
    pub fn new() -> Self {
        Self::default()
    }

    /// Table built from the snapshot's principal export
    pub fn from_snapshot(snapshot: &PolicySnapshot) -> Self {
        let names = snapshot
            .principals
            .iter()
            .map(|(id, name)| (id.clone(), name.clone()))
            .collect();
        Self {
            names,
            well_known: false,
        }
    }

    pub fn with_well_known(mut self) -> Self {
        self.well_known = true;
        self
    }

    pub fn with_name(mut self, identifier: impl Into<String>, name: impl Into<String>) -> Self {
        self.names.insert(identifier.into(), name.into());
        self
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl IdentityResolver for StaticResolver {
    fn resolve(&self, identifier: &str) -> Result<String> {
        if let Some(name) = self.names.get(identifier) {
            return Ok(name.clone());
        }

        if self.well_known {
            if let Some((_, name)) = WELL_KNOWN_SIDS.iter().find(|(sid, _)| *sid == identifier) {
                return Ok(name.to_string());
            }
        }

        Err(Error::ResolutionFailed {
            identifier: identifier.to_string(),
            message: String::from("no account mapping"),
        })
    }
}

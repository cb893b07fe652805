//! Reconciling the principals a baseline requires with those observed

use policyscore_core::{IdentifierRequirement, MatchKind, ResolverCache};
use serde::{Deserialize, Serialize};

/// How observed identifiers are credited against required ones
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStrategy {
    /// Each observed identifier takes the first requirement it satisfies.
    /// Requirements are never consumed, so two observed identifiers can be
    /// credited to the same requirement while another goes unmatched.
    #[default]
    FirstMatch,
    /// Each requirement can be credited to at most one observed identifier
    OneToOne,
}

impl std::str::FromStr for MatchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "first-match" | "first" => Ok(MatchStrategy::FirstMatch),
            "one-to-one" | "bijective" => Ok(MatchStrategy::OneToOne),
            _ => Err(format!("Unknown match strategy: {}", s)),
        }
    }
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStrategy::FirstMatch => write!(f, "first-match"),
            MatchStrategy::OneToOne => write!(f, "one-to-one"),
        }
    }
}

/// Why observed identifiers did not reconcile with the requirements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// Different number of principals; no partial credit
    CountDiffers { expected: usize, actual: usize },
    /// An observed principal satisfied no requirement
    Unexpected { principal: String },
}

impl std::fmt::Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mismatch::CountDiffers { expected, actual } => {
                write!(f, "expected {} principal(s), found {}", expected, actual)
            }
            Mismatch::Unexpected { principal } => write!(f, "unexpected principal {}", principal),
        }
    }
}

/// Display name of each requirement, by requirement index
///
/// Requirements that were never credited (possible under
/// [`MatchStrategy::FirstMatch`]) have no entry.
pub type ResolvedNames = Vec<Option<String>>;

impl MatchStrategy {
    /// Credit every observed identifier against a requirement
    ///
    /// Observed identifiers are taken in order; the first one that cannot be
    /// credited is reported. An identifier's name is resolved at most once,
    /// and only when a by-name comparison or a credited requirement needs
    /// it. A failed resolution fails by-name comparisons only.
    pub fn reconcile(
        &self,
        requirements: &[IdentifierRequirement],
        actual: &[String],
        resolver: &mut ResolverCache<'_>,
    ) -> Result<ResolvedNames, Mismatch> {
        if requirements.len() != actual.len() {
            return Err(Mismatch::CountDiffers {
                expected: requirements.len(),
                actual: actual.len(),
            });
        }

        match self {
            MatchStrategy::FirstMatch => first_match(requirements, actual, resolver),
            MatchStrategy::OneToOne => one_to_one(requirements, actual, resolver),
        }
    }
}

/// Lazily resolved name of one observed identifier
type NameSlot = Option<Option<String>>;

fn first_match(
    requirements: &[IdentifierRequirement],
    actual: &[String],
    resolver: &mut ResolverCache<'_>,
) -> Result<ResolvedNames, Mismatch> {
    let mut names: ResolvedNames = vec![None; requirements.len()];

    for identifier in actual {
        let mut name: NameSlot = None;
        let matched = requirements
            .iter()
            .position(|requirement| satisfies(requirement, identifier, &mut name, resolver));

        match matched {
            Some(index) => names[index] = Some(display(&mut name, resolver, identifier)),
            None => return Err(unexpected(name, identifier)),
        }
    }

    Ok(names)
}

/// Bipartite matching by augmenting paths; an earlier identifier's
/// requirement is reassigned when that lets a later identifier in.
fn one_to_one(
    requirements: &[IdentifierRequirement],
    actual: &[String],
    resolver: &mut ResolverCache<'_>,
) -> Result<ResolvedNames, Mismatch> {
    let mut slots: Vec<NameSlot> = vec![None; actual.len()];
    let mut edges: Vec<Vec<usize>> = Vec::with_capacity(actual.len());
    let mut owner: Vec<Option<usize>> = vec![None; requirements.len()];

    for (index, identifier) in actual.iter().enumerate() {
        let slot = &mut slots[index];
        let candidates = requirements
            .iter()
            .enumerate()
            .filter(|(_, requirement)| satisfies(requirement, identifier, slot, resolver))
            .map(|(candidate, _)| candidate)
            .collect();
        edges.push(candidates);

        let mut visited = vec![false; requirements.len()];
        if !augment(index, &edges, &mut owner, &mut visited) {
            return Err(unexpected(slots[index].take(), identifier));
        }
    }

    let mut names: ResolvedNames = Vec::with_capacity(requirements.len());
    for credited in owner {
        names.push(credited.map(|index| display(&mut slots[index], resolver, &actual[index])));
    }
    Ok(names)
}

fn augment(
    identifier: usize,
    edges: &[Vec<usize>],
    owner: &mut [Option<usize>],
    visited: &mut [bool],
) -> bool {
    for &requirement in &edges[identifier] {
        if visited[requirement] {
            continue;
        }
        visited[requirement] = true;

        let free = match owner[requirement] {
            None => true,
            Some(holder) => augment(holder, edges, owner, visited),
        };
        if free {
            owner[requirement] = Some(identifier);
            return true;
        }
    }
    false
}

fn satisfies(
    requirement: &IdentifierRequirement,
    identifier: &str,
    name: &mut NameSlot,
    resolver: &mut ResolverCache<'_>,
) -> bool {
    match requirement.kind {
        MatchKind::ByName => {
            display_name(name, resolver, identifier).map_or(false, |n| n == requirement.value)
        }
        MatchKind::BySecurityId => identifier == requirement.value,
    }
}

/// Resolved name, or the raw identifier when resolution failed
fn display(name: &mut NameSlot, resolver: &mut ResolverCache<'_>, identifier: &str) -> String {
    display_name(name, resolver, identifier)
        .unwrap_or(identifier)
        .to_string()
}

/// Names the principal with whatever matching already resolved; an
/// identifier only compared by SID is reported raw.
fn unexpected(name: NameSlot, identifier: &str) -> Mismatch {
    Mismatch::Unexpected {
        principal: name.flatten().unwrap_or_else(|| identifier.to_string()),
    }
}

fn display_name<'a>(
    slot: &'a mut NameSlot,
    resolver: &mut ResolverCache<'_>,
    identifier: &str,
) -> Option<&'a str> {
    slot.get_or_insert_with(|| resolver.resolve(identifier).ok())
        .as_deref()
}

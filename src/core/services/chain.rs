//! Causal chain builder
//!
//! A single deterministic pass over the errors in time order. One chain is
//! open at a time; the next error joins it when it falls within the window
//! of the chain's last member and its domain is linked to the chain, either
//! through the adjacency table (exact) or by repeating a domain already in
//! the chain (same subsystem). Anything else closes the chain and opens a
//! new one.
//!
//! The pass is `O(n log n)` for the initial sort and linear afterwards, so
//! large error sets never trigger a combinatorial search.

use std::collections::{BTreeMap, BTreeSet};

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use super::confidence::{ChainEvidence, ConfidenceBounds, ConfidenceScorer, WeightedScorer};
use crate::core::models::{CausalChain, Classification, Domain, LinkStrength};

/// Window used when there is too little data to derive one
pub const DEFAULT_WINDOW: TimeDelta = TimeDelta::seconds(30);

/// Lower clamp for a derived window
pub const MIN_DERIVED_WINDOW: TimeDelta = TimeDelta::seconds(5);

/// Upper clamp for a derived window
pub const MAX_DERIVED_WINDOW: TimeDelta = TimeDelta::minutes(30);

/// Known cause → effect relationships between domains
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Vec<Domain>>",
    into = "BTreeMap<String, Vec<Domain>>"
)]
pub struct AdjacencyTable {
    edges: BTreeMap<Domain, BTreeSet<Domain>>,
}

impl Default for AdjacencyTable {
    fn default() -> Self {
        use Domain::{Application, Firmware, Memory, Network, Power, Thermal, Vrm};

        Self::empty()
            .with_edges(Firmware, &[Thermal, Vrm, Memory, Application, Power])
            .with_edges(Thermal, &[Vrm, Firmware, Power])
            .with_edges(Vrm, &[Thermal, Memory, Firmware, Power])
            .with_edges(Memory, &[Firmware, Application, Power])
            .with_edges(Network, &[Application])
            .with_edges(Application, &[Power])
    }
}

impl AdjacencyTable {
    /// A table with no relationships
    #[must_use]
    pub fn empty() -> Self {
        Self {
            edges: BTreeMap::new(),
        }
    }

    /// Add `cause → effect` edges
    #[must_use]
    pub fn with_edges(mut self, cause: Domain, effects: &[Domain]) -> Self {
        for effect in effects {
            self.insert(cause, *effect);
        }
        self
    }

    /// Add a single `cause → effect` edge
    pub fn insert(&mut self, cause: Domain, effect: Domain) {
        self.edges.entry(cause).or_default().insert(effect);
    }

    /// Whether `effect` is a known consequence of `cause`
    #[must_use]
    pub fn is_adjacent(&self, cause: Domain, effect: Domain) -> bool {
        self.edges.get(&cause).is_some_and(|e| e.contains(&effect))
    }

    /// Known effects of a domain
    pub fn effects_of(&self, cause: Domain) -> impl Iterator<Item = Domain> + '_ {
        self.edges.get(&cause).into_iter().flatten().copied()
    }

    /// How `next` would link to a chain spanning `chain_domains`
    #[must_use]
    pub fn link(&self, chain_domains: &BTreeSet<Domain>, next: Domain) -> Option<LinkStrength> {
        if chain_domains.iter().any(|d| self.is_adjacent(*d, next)) {
            Some(LinkStrength::Exact)
        } else if chain_domains.contains(&next) {
            Some(LinkStrength::SameSubsystem)
        } else {
            None
        }
    }
}

impl TryFrom<BTreeMap<String, Vec<Domain>>> for AdjacencyTable {
    type Error = String;

    fn try_from(raw: BTreeMap<String, Vec<Domain>>) -> Result<Self, Self::Error> {
        let mut table = Self::empty();
        for (cause, effects) in raw {
            let cause: Domain = cause.parse()?;
            // A cause listed with no effects is still recorded
            table.edges.entry(cause).or_default();
            for effect in effects {
                table.insert(cause, effect);
            }
        }
        Ok(table)
    }
}

impl From<AdjacencyTable> for BTreeMap<String, Vec<Domain>> {
    fn from(table: AdjacencyTable) -> Self {
        table
            .edges
            .into_iter()
            .map(|(cause, effects)| (cause.to_string(), effects.into_iter().collect()))
            .collect()
    }
}

/// How the grouping window is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPolicy {
    /// Always use this window
    Fixed(TimeDelta),
    /// Derive from the spacing of the errors being chained
    Auto,
}

impl WindowPolicy {
    /// Window for a set of errors in time order
    #[must_use]
    pub fn resolve(&self, ordered: &[&Classification]) -> TimeDelta {
        match self {
            Self::Fixed(window) => *window,
            Self::Auto => derive_window(ordered),
        }
    }
}

/// Four times the median gap between consecutive errors, clamped
///
/// Falls back to [`DEFAULT_WINDOW`] with fewer than two errors.
#[must_use]
pub fn derive_window(ordered: &[&Classification]) -> TimeDelta {
    let mut gaps: Vec<TimeDelta> = ordered
        .windows(2)
        .map(|pair| pair[1].timestamp - pair[0].timestamp)
        .filter(|gap| *gap >= TimeDelta::zero())
        .collect();
    if gaps.is_empty() {
        return DEFAULT_WINDOW;
    }
    gaps.sort();
    let median = gaps[gaps.len() / 2];
    (median * 4).clamp(MIN_DERIVED_WINDOW, MAX_DERIVED_WINDOW)
}

/// Members collected for one candidate chain
#[derive(Debug)]
struct Group<'e> {
    members: Vec<&'e Classification>,
    links: Vec<LinkStrength>,
    domains: BTreeSet<Domain>,
}

impl<'e> Group<'e> {
    fn start(root: &'e Classification, domain: Domain) -> Self {
        Self {
            members: vec![root],
            links: Vec::new(),
            domains: BTreeSet::from([domain]),
        }
    }

    /// Join `event` if it is close enough and linked; returns whether it joined
    fn try_extend(
        &mut self,
        event: &'e Classification,
        domain: Domain,
        window: TimeDelta,
        adjacency: &AdjacencyTable,
    ) -> bool {
        let Some(last) = self.members.last() else {
            return false;
        };
        if event.timestamp - last.timestamp > window {
            return false;
        }
        let Some(link) = adjacency.link(&self.domains, domain) else {
            return false;
        };
        self.members.push(event);
        self.links.push(link);
        self.domains.insert(domain);
        true
    }

    fn evidence(&self) -> ChainEvidence {
        ChainEvidence {
            member_count: self.members.len(),
            links: self.links.clone(),
            root_severity: self.members.first().map(|m| m.severity).unwrap_or_default(),
        }
    }
}

/// Groups errors into causal chains
#[derive(Debug)]
pub struct ChainBuilder {
    adjacency: AdjacencyTable,
    window: WindowPolicy,
    scorer: Box<dyn ConfidenceScorer>,
    bounds: ConfidenceBounds,
    min_singleton_severity: f64,
}

impl Default for ChainBuilder {
    fn default() -> Self {
        Self::new(AdjacencyTable::default())
    }
}

impl ChainBuilder {
    /// Create a builder with an automatic window and default scoring
    #[must_use]
    pub fn new(adjacency: AdjacencyTable) -> Self {
        Self {
            adjacency,
            window: WindowPolicy::Auto,
            scorer: Box::new(WeightedScorer::default()),
            bounds: ConfidenceBounds::default(),
            min_singleton_severity: 0.0,
        }
    }

    /// Set the window policy
    #[must_use]
    pub fn with_window(mut self, window: WindowPolicy) -> Self {
        self.window = window;
        self
    }

    /// Replace the confidence scorer
    #[must_use]
    pub fn with_scorer(mut self, scorer: Box<dyn ConfidenceScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Set confidence bounds; an inverted pair is swapped
    #[must_use]
    pub fn with_bounds(mut self, bounds: ConfidenceBounds) -> Self {
        self.bounds = bounds.normalized();
        self
    }

    /// Isolated errors below this severity produce no singleton chain
    #[must_use]
    pub fn with_min_singleton_severity(mut self, severity: f64) -> Self {
        self.min_singleton_severity = severity;
        self
    }

    /// The adjacency table in use
    #[must_use]
    pub const fn adjacency(&self) -> &AdjacencyTable {
        &self.adjacency
    }

    /// Build chains from errors
    ///
    /// Errors are ordered by timestamp, then domain priority, then input
    /// order; severity never affects ordering. Non-errors are ignored.
    #[must_use]
    pub fn build_chains(&self, errors: &[Classification]) -> Vec<CausalChain> {
        let mut ordered: Vec<&Classification> = errors
            .iter()
            .filter(|c| c.is_error() && c.domain.is_some())
            .collect();
        ordered.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.domain_rank().cmp(&b.domain_rank()))
        });

        let window = self.window.resolve(&ordered);
        log::debug!("chaining {} error(s) with a {}s window", ordered.len(), window.num_seconds());

        let mut groups: Vec<Group<'_>> = Vec::new();
        let mut open: Option<Group<'_>> = None;
        for event in ordered {
            let Some(domain) = event.domain else {
                continue;
            };
            let joined = open
                .as_mut()
                .is_some_and(|group| group.try_extend(event, domain, window, &self.adjacency));
            if !joined {
                groups.extend(open.take());
                open = Some(Group::start(event, domain));
            }
        }
        groups.extend(open);

        let mut chains = Vec::with_capacity(groups.len());
        for group in groups {
            let raw = self.scorer.raw_score(&group.evidence());
            if group.members.len() > 1 && !self.bounds.is_credible(raw) {
                log::debug!(
                    "demoting {}-member chain below confidence floor (raw {raw:.3})",
                    group.members.len()
                );
                for member in group.members {
                    self.push_singleton(&mut chains, member);
                }
                continue;
            }
            if group.members.len() == 1 {
                self.push_singleton(&mut chains, group.members[0]);
            } else {
                self.push_chain(&mut chains, &group, raw);
            }
        }
        chains
    }

    fn push_singleton(&self, chains: &mut Vec<CausalChain>, member: &Classification) {
        if member.severity.value() < self.min_singleton_severity {
            return;
        }
        let Some(domain) = member.domain else {
            return;
        };
        let group = Group::start(member, domain);
        let raw = self.scorer.raw_score(&group.evidence());
        self.push_chain(chains, &group, raw);
    }

    fn push_chain(&self, chains: &mut Vec<CausalChain>, group: &Group<'_>, raw: f64) {
        let (Some(root), Some(last)) = (group.members.first(), group.members.last()) else {
            return;
        };
        let Some(root_domain) = root.domain else {
            return;
        };
        chains.push(CausalChain {
            id: format!("C{}", chains.len() + 1),
            rank: 0,
            root_hypothesis: root_domain,
            members: group.members.iter().map(|m| (*m).clone()).collect(),
            links: group.links.clone(),
            confidence: self.bounds.clamp(raw),
            label: root_domain.cascade_label().to_string(),
            started_at: root.timestamp,
            ended_at: last.timestamp,
            recommendations: root_domain.recommendations(),
        });
    }
}

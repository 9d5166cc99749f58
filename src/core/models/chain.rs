//! Causal chain model
//!
//! A causal chain is an ordered group of error events hypothesized to share
//! a root cause. The earliest member is the root; the rest are downstream
//! effects in timestamp order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Classification, Domain};

/// How strongly a member is tied to the chain it joined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStrength {
    /// A known causal pair from the adjacency table
    Exact,
    /// Same subsystem as an existing member, no known causal pair
    SameSubsystem,
}

impl LinkStrength {
    /// Weight used by confidence scoring
    #[must_use]
    pub const fn weight(self) -> f64 {
        match self {
            Self::Exact => 1.0,
            Self::SameSubsystem => 0.3,
        }
    }
}

impl std::fmt::Display for LinkStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::SameSubsystem => write!(f, "same subsystem"),
        }
    }
}

/// A root-cause hypothesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CausalChain {
    /// Stable id within one analysis (`C1`, `C2`, ...)
    pub id: String,

    /// 1-based position by confidence across all chains of a run; 0 until aggregated
    #[serde(default)]
    pub rank: usize,

    /// Domain of the root event
    pub root_hypothesis: Domain,

    /// Members in timestamp order; the first is the root
    pub members: Vec<Classification>,

    /// Link strength of each non-root member, aligned with `members[1..]`
    pub links: Vec<LinkStrength>,

    /// Confidence in the hypothesis, within the configured bounds
    pub confidence: f64,

    /// Human-readable cascade name
    pub label: String,

    /// Timestamp of the root event
    pub started_at: DateTime<Utc>,

    /// Timestamp of the last member
    pub ended_at: DateTime<Utc>,

    /// Suggested follow-up for the root domain
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
}

impl CausalChain {
    /// The root event
    #[must_use]
    pub fn root(&self) -> Option<&Classification> {
        self.members.first()
    }

    /// Whether this chain has a single member
    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }

    /// Input sequence numbers of the members
    #[must_use]
    pub fn member_sequences(&self) -> Vec<usize> {
        self.members.iter().map(|m| m.sequence).collect()
    }

    /// Arrow-joined domain path, e.g. `thermal -> vrm -> power`
    #[must_use]
    pub fn domain_path(&self) -> String {
        self.members
            .iter()
            .filter_map(|m| m.domain)
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

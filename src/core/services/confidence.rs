//! Confidence scoring for causal chains
//!
//! Scoring is split in two: a [`ConfidenceScorer`] turns chain evidence into
//! a raw score, and [`ConfidenceBounds`] clamps it. The builder looks at the
//! raw score to decide whether a multi-member chain is credible at all;
//! below the floor it is broken back into singletons.

use serde::{Deserialize, Serialize};

use crate::core::models::{LinkStrength, Severity};

/// What a chain offers as evidence for its hypothesis
#[derive(Debug, Clone, PartialEq)]
pub struct ChainEvidence {
    /// Number of members, root included
    pub member_count: usize,
    /// Link strength of each non-root member
    pub links: Vec<LinkStrength>,
    /// Severity of the root event
    pub root_severity: Severity,
}

impl ChainEvidence {
    /// Mean link weight; zero for singletons
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_link_weight(&self) -> f64 {
        if self.links.is_empty() {
            return 0.0;
        }
        self.links.iter().map(|l| l.weight()).sum::<f64>() / self.links.len() as f64
    }
}

/// Turns evidence into an unclamped score
///
/// Implementations must be deterministic.
pub trait ConfidenceScorer: Send + Sync + std::fmt::Debug {
    /// Raw score before clamping
    fn raw_score(&self, evidence: &ChainEvidence) -> f64;
}

/// Linear blend of member count, link strength and root severity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightedScorer {
    /// Score of a singleton with a zero-severity root
    pub base: f64,
    /// Added per non-root member
    pub per_member: f64,
    /// Members beyond this many non-root members add nothing
    pub member_cap: usize,
    /// Weight of the mean link strength
    pub adjacency_weight: f64,
    /// Weight of root severity (scaled to 0..1)
    pub severity_weight: f64,
}

impl Default for WeightedScorer {
    fn default() -> Self {
        Self {
            base: 0.45,
            per_member: 0.05,
            member_cap: 5,
            adjacency_weight: 0.15,
            severity_weight: 0.10,
        }
    }
}

impl ConfidenceScorer for WeightedScorer {
    #[allow(clippy::cast_precision_loss)]
    fn raw_score(&self, evidence: &ChainEvidence) -> f64 {
        let extra_members = evidence.member_count.saturating_sub(1).min(self.member_cap);
        self.base
            + self.per_member * extra_members as f64
            + self.adjacency_weight * evidence.mean_link_weight()
            + self.severity_weight * (evidence.root_severity.value() / Severity::MAX)
    }
}

/// Reportable confidence range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBounds {
    /// Lowest reportable confidence
    pub floor: f64,
    /// Highest reportable confidence
    pub ceiling: f64,
}

impl Default for ConfidenceBounds {
    fn default() -> Self {
        Self {
            floor: 0.60,
            ceiling: 0.95,
        }
    }
}

impl ConfidenceBounds {
    /// Bounds with floor and ceiling in ascending order
    #[must_use]
    pub const fn normalized(self) -> Self {
        if self.floor > self.ceiling {
            Self {
                floor: self.ceiling,
                ceiling: self.floor,
            }
        } else {
            self
        }
    }

    /// Clamp a raw score into range
    ///
    /// Never panics; with inverted bounds the ceiling wins.
    #[must_use]
    pub fn clamp(&self, raw: f64) -> f64 {
        if raw.is_nan() {
            return self.floor.min(self.ceiling);
        }
        raw.max(self.floor).min(self.ceiling)
    }

    /// Whether a raw score reaches the floor
    #[must_use]
    pub fn is_credible(&self, raw: f64) -> bool {
        raw >= self.floor
    }
}

/// Score evidence and clamp the result
#[must_use]
pub fn score(scorer: &dyn ConfidenceScorer, bounds: ConfidenceBounds, evidence: &ChainEvidence) -> f64 {
    bounds.clamp(scorer.raw_score(evidence))
}

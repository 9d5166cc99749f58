//! Analysis result model
//!
//! The immutable snapshot handed to reporting and export layers.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CausalChain, Classification, Domain, Severity, SeverityBand};

/// Result of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Number of lines analyzed
    pub total_lines: usize,

    /// Genuine errors, by severity descending then timestamp ascending
    pub errors: Vec<Classification>,

    /// Root-cause hypotheses in root-timestamp order
    pub chains: Vec<CausalChain>,

    /// High-severity errors in chronological order
    pub timeline: Vec<TimelineEntry>,

    /// Aggregate statistics
    pub summary: Summary,

    /// Version of the catalog used to classify
    pub catalog_version: String,

    /// When the result was assembled
    pub processed_at: DateTime<Utc>,
}

impl AnalysisResult {
    /// Look up a chain by id
    #[must_use]
    pub fn chain(&self, id: &str) -> Option<&CausalChain> {
        self.chains.iter().find(|c| c.id == id)
    }

    /// Chains with more than one member, in rank order
    #[must_use]
    pub fn ranked_chains(&self) -> Vec<&CausalChain> {
        let mut ranked: Vec<&CausalChain> =
            self.chains.iter().filter(|c| !c.is_singleton()).collect();
        ranked.sort_by_key(|c| c.rank);
        ranked
    }

    /// Whether the run found nothing to report
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// One row of the event timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Input sequence number of the event
    pub sequence: usize,

    /// Effective timestamp
    pub timestamp: DateTime<Utc>,

    /// Event domain
    pub domain: Option<Domain>,

    /// Event severity
    pub severity: Severity,

    /// Chain the event belongs to, if any
    pub chain_id: Option<String>,

    /// Line text, shortened for display
    pub excerpt: String,
}

/// Error counts per severity band
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityDistribution {
    /// Severity 9.0 and above
    pub critical: usize,
    /// 7.0 up to 9.0
    pub high: usize,
    /// 5.0 up to 7.0
    pub medium: usize,
    /// Below 5.0
    pub low: usize,
}

impl SeverityDistribution {
    /// Count one severity
    pub fn record(&mut self, band: SeverityBand) {
        match band {
            SeverityBand::Critical => self.critical += 1,
            SeverityBand::High => self.high += 1,
            SeverityBand::Medium => self.medium += 1,
            SeverityBand::Low => self.low += 1,
        }
    }
}

/// Aggregate statistics over the errors of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Errors per severity band
    pub severity_distribution: SeverityDistribution,

    /// Errors per domain
    pub domain_counts: BTreeMap<Domain, usize>,

    /// Error density
    pub errors_per_1000_lines: f64,

    /// Errors that belong to a multi-member chain
    pub chained_errors: usize,

    /// Errors that stand alone
    pub isolated_errors: usize,

    /// One hypothesis per affected domain, most confident first
    pub hypotheses: Vec<DomainHypothesis>,

    /// Overall verdict for the log
    pub health: LogHealth,
}

/// A root-cause hypothesis drawn from error volume in one domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainHypothesis {
    /// Affected domain
    pub domain: Domain,

    /// Number of errors in the domain
    pub count: usize,

    /// Highest severity seen in the domain
    pub max_severity: Severity,

    /// Grows with `count`, within the configured bounds
    pub confidence: f64,

    /// Suggested follow-up for the domain
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
}

/// Verdict for a whole log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// At least one error of severity 8.0 or more
    CriticalEvents,
    /// At least one error of severity 6.0 or more
    PerformanceIssues,
    /// Error rate above the configured percentage
    HighErrorRate,
    /// Nothing above
    #[default]
    Normal,
}

impl HealthStatus {
    /// Headline for human output
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CriticalEvents => "Critical system events detected",
            Self::PerformanceIssues => "System performance issues",
            Self::HighErrorRate => "High error rate detected",
            Self::Normal => "System operating normally",
        }
    }

    /// Confidence in the verdict itself
    #[must_use]
    pub const fn confidence(self) -> f64 {
        match self {
            Self::CriticalEvents => 0.8,
            Self::PerformanceIssues => 0.7,
            Self::HighErrorRate => 0.6,
            Self::Normal => 0.9,
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Health verdict with the error rate it was based on
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LogHealth {
    /// The verdict
    pub status: HealthStatus,

    /// Errors as a percentage of analyzed lines
    pub error_rate_percent: f64,

    /// See [`HealthStatus::confidence`]
    pub confidence: f64,
}

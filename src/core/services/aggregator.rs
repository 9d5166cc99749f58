//! Result aggregator
//!
//! Ranks errors and chains, builds the event timeline and computes summary
//! statistics, per-domain hypotheses and a health verdict.
//! Everything here is derived from its inputs; the only outside value is the
//! `processed_at` timestamp handed in by the caller.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::confidence::ConfidenceBounds;
use crate::core::models::{
    AnalysisResult, CausalChain, Classification, Domain, DomainHypothesis, HealthStatus,
    LogHealth, Severity, Summary, TimelineEntry,
};

/// Severity from which a log is reported as having critical events
pub const CRITICAL_EVENT_SEVERITY: f64 = 8.0;

/// Severity from which a log is reported as having performance issues
pub const PERFORMANCE_ISSUE_SEVERITY: f64 = 6.0;

/// Timeline, excerpt and health settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Aggregator {
    /// Minimum severity for a timeline entry
    pub timeline_min_severity: f64,
    /// Maximum number of timeline entries
    pub timeline_limit: usize,
    /// Maximum excerpt length in characters
    pub excerpt_chars: usize,
    /// Error rate, in percent of lines, above which a log is unhealthy
    pub high_error_rate_percent: f64,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self {
            timeline_min_severity: 6.0,
            timeline_limit: 25,
            excerpt_chars: 160,
            high_error_rate_percent: 5.0,
        }
    }
}

impl Aggregator {
    /// Assemble the final result
    ///
    /// `bounds` caps the confidence of per-domain hypotheses.
    #[must_use]
    pub fn aggregate(
        &self,
        total_lines: usize,
        mut errors: Vec<Classification>,
        mut chains: Vec<CausalChain>,
        bounds: ConfidenceBounds,
        catalog_version: &str,
        processed_at: DateTime<Utc>,
    ) -> AnalysisResult {
        rank_chains(&mut chains);
        let membership: HashMap<usize, &CausalChain> = chains
            .iter()
            .flat_map(|chain| chain.members.iter().map(move |m| (m.sequence, chain)))
            .collect();

        let timeline = self.timeline(&errors, &membership);
        let mut summary = summarize(total_lines, &errors, &membership);
        summary.hypotheses = domain_hypotheses(&errors, bounds);
        summary.health = self.health(total_lines, &errors);

        errors.sort_by(|a, b| {
            b.severity
                .total_cmp(&a.severity)
                .then_with(|| a.timestamp.cmp(&b.timestamp))
                .then_with(|| a.sequence.cmp(&b.sequence))
        });

        AnalysisResult {
            total_lines,
            errors,
            chains,
            timeline,
            summary,
            catalog_version: catalog_version.to_string(),
            processed_at,
        }
    }

    fn timeline(
        &self,
        errors: &[Classification],
        membership: &HashMap<usize, &CausalChain>,
    ) -> Vec<TimelineEntry> {
        let mut notable: Vec<&Classification> = errors
            .iter()
            .filter(|e| e.severity.value() >= self.timeline_min_severity)
            .collect();
        notable.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.sequence.cmp(&b.sequence))
        });

        notable
            .into_iter()
            .take(self.timeline_limit)
            .map(|e| TimelineEntry {
                sequence: e.sequence,
                timestamp: e.timestamp,
                domain: e.domain,
                severity: e.severity,
                chain_id: membership.get(&e.sequence).map(|c| c.id.clone()),
                excerpt: excerpt(&e.line.text, self.excerpt_chars),
            })
            .collect()
    }

    #[allow(clippy::cast_precision_loss)]
    fn health(&self, total_lines: usize, errors: &[Classification]) -> LogHealth {
        let error_rate_percent = if total_lines == 0 {
            0.0
        } else {
            errors.len() as f64 * 100.0 / total_lines as f64
        };
        let worst = errors.iter().map(|e| e.severity.value()).fold(0.0, f64::max);
        let status = if worst >= CRITICAL_EVENT_SEVERITY {
            HealthStatus::CriticalEvents
        } else if worst >= PERFORMANCE_ISSUE_SEVERITY {
            HealthStatus::PerformanceIssues
        } else if error_rate_percent > self.high_error_rate_percent {
            HealthStatus::HighErrorRate
        } else {
            HealthStatus::Normal
        };
        LogHealth {
            status,
            error_rate_percent,
            confidence: status.confidence(),
        }
    }
}

/// Assign 1-based ranks: confidence desc, then size desc, then earliest root
fn rank_chains(chains: &mut [CausalChain]) {
    let mut order: Vec<usize> = (0..chains.len()).collect();
    order.sort_by(|&a, &b| {
        let (a, b) = (&chains[a], &chains[b]);
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| b.members.len().cmp(&a.members.len()))
            .then_with(|| a.started_at.cmp(&b.started_at))
    });
    for (position, index) in order.into_iter().enumerate() {
        chains[index].rank = position + 1;
    }
}

#[allow(clippy::cast_precision_loss)]
fn domain_hypotheses(errors: &[Classification], bounds: ConfidenceBounds) -> Vec<DomainHypothesis> {
    let mut by_domain: BTreeMap<Domain, (usize, Severity)> = BTreeMap::new();
    for error in errors {
        let Some(domain) = error.domain else {
            continue;
        };
        let entry = by_domain.entry(domain).or_insert((0, Severity::default()));
        entry.0 += 1;
        if error.severity.total_cmp(&entry.1).is_gt() {
            entry.1 = error.severity;
        }
    }

    let mut hypotheses: Vec<DomainHypothesis> = by_domain
        .into_iter()
        .map(|(domain, (count, max_severity))| DomainHypothesis {
            domain,
            count,
            max_severity,
            confidence: bounds.clamp(0.1f64.mul_add(count as f64, 0.5)),
            recommendations: domain.recommendations(),
        })
        .collect();
    hypotheses.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| b.count.cmp(&a.count))
            .then_with(|| a.domain.cmp(&b.domain))
    });
    hypotheses
}

#[allow(clippy::cast_precision_loss)]
fn summarize(
    total_lines: usize,
    errors: &[Classification],
    membership: &HashMap<usize, &CausalChain>,
) -> Summary {
    let mut summary = Summary::default();
    for error in errors {
        summary.severity_distribution.record(error.severity.band());
        if let Some(domain) = error.domain {
            *summary.domain_counts.entry(domain).or_insert(0) += 1;
        }
        if membership.get(&error.sequence).is_some_and(|c| !c.is_singleton()) {
            summary.chained_errors += 1;
        } else {
            summary.isolated_errors += 1;
        }
    }
    if total_lines > 0 {
        summary.errors_per_1000_lines = errors.len() as f64 * 1000.0 / total_lines as f64;
    }
    summary
}

/// Trimmed text cut to `max_chars`, marked with `...` when shortened
#[must_use]
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}

/// Shorthand for [`Aggregator::default`] with default confidence bounds
#[must_use]
pub fn aggregate(
    total_lines: usize,
    errors: Vec<Classification>,
    chains: Vec<CausalChain>,
    catalog_version: &str,
    processed_at: DateTime<Utc>,
) -> AnalysisResult {
    Aggregator::default().aggregate(
        total_lines,
        errors,
        chains,
        ConfidenceBounds::default(),
        catalog_version,
        processed_at,
    )
}

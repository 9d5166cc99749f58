//! Severity classifier - scores lines against the pattern catalog
//!
//! Single-line classification is a pure function of the line and the
//! catalog. Batch classification adds two things on top: synthetic
//! timestamps for lines that had none, and the repetition modifier, which
//! depends on what came earlier in the same batch.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, TimeDelta, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::catalog::PatternCatalog;
use crate::core::models::{Classification, RawLine, Severity};

/// Batches at least this large are classified in parallel
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 2048;

/// Severity boost for a rule that keeps firing within a short window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepetitionPolicy {
    /// How far back earlier occurrences count, in seconds
    pub window_secs: f64,
    /// Multiplier increment per earlier occurrence
    pub step: f64,
    /// Maximum number of occurrences that count
    pub max_steps: u32,
}

impl Default for RepetitionPolicy {
    fn default() -> Self {
        Self {
            window_secs: 60.0,
            step: 0.10,
            max_steps: 5,
        }
    }
}

impl RepetitionPolicy {
    /// Multiplier for a line preceded by `occurrences` matches of the same rule
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn factor(&self, occurrences: usize) -> f64 {
        let counted = occurrences.min(self.max_steps as usize);
        self.step.max(0.0).mul_add(counted as f64, 1.0)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn window(&self) -> TimeDelta {
        let millis = (self.window_secs.max(0.0) * 1000.0).round();
        TimeDelta::try_milliseconds(millis as i64).unwrap_or(TimeDelta::MAX)
    }
}

/// Log level marker found in the line text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelHint {
    /// `CRITICAL`, `CRIT`, `FATAL`, `EMERG`, `ALERT`
    Critical,
    /// `WARN`, `WARNING`
    Warning,
    /// No explicit marker
    Neutral,
}

impl LevelHint {
    /// Detect an explicit uppercase level marker
    #[must_use]
    pub fn detect(text: &str) -> Self {
        let mut hint = Self::Neutral;
        for token in text.split(|c: char| !c.is_ascii_alphanumeric()) {
            match token {
                "CRITICAL" | "CRIT" | "FATAL" | "EMERG" | "ALERT" => return Self::Critical,
                "WARN" | "WARNING" => hint = Self::Warning,
                _ => {},
            }
        }
        hint
    }

    /// Severity multiplier
    #[must_use]
    pub const fn factor(self) -> f64 {
        match self {
            Self::Critical => 1.2,
            Self::Warning => 0.85,
            Self::Neutral => 1.0,
        }
    }
}

/// Scores raw lines against a catalog
#[derive(Debug, Clone, Copy)]
pub struct SeverityClassifier<'a> {
    catalog: &'a PatternCatalog,
    ceiling: f64,
    repetition: RepetitionPolicy,
    parallel_threshold: usize,
}

impl<'a> SeverityClassifier<'a> {
    /// Create a classifier with default modifiers
    #[must_use]
    pub fn new(catalog: &'a PatternCatalog) -> Self {
        Self {
            catalog,
            ceiling: Severity::MAX,
            repetition: RepetitionPolicy::default(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Cap scored severities at `ceiling`
    #[must_use]
    pub const fn with_ceiling(mut self, ceiling: f64) -> Self {
        self.ceiling = ceiling;
        self
    }

    /// Set the repetition modifier
    #[must_use]
    pub const fn with_repetition(mut self, repetition: RepetitionPolicy) -> Self {
        self.repetition = repetition;
        self
    }

    /// Set the batch size above which classification runs in parallel
    #[must_use]
    pub const fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Classify one line in isolation
    ///
    /// A line without a timestamp is stamped at the Unix epoch and flagged
    /// `ordering_assumed`.
    #[must_use]
    pub fn classify(&self, line: &RawLine) -> Classification {
        let (timestamp, assumed) = line
            .timestamp
            .map_or((DateTime::<Utc>::UNIX_EPOCH, true), |ts| (ts, false));
        self.score(0, line, timestamp, assumed)
    }

    /// Classify a batch, preserving input order
    #[must_use]
    pub fn classify_all(&self, lines: &[RawLine]) -> Vec<Classification> {
        let stamps = assign_timestamps(lines);
        let assumed = stamps.iter().filter(|(_, a)| *a).count();
        if assumed > 0 {
            log::warn!("{assumed} line(s) without a parseable timestamp; ordering assumed from sequence");
        }

        let mut classified: Vec<Classification> = if lines.len() >= self.parallel_threshold {
            log::debug!("classifying {} lines in parallel", lines.len());
            lines
                .par_iter()
                .zip(&stamps)
                .enumerate()
                .map(|(seq, (line, (ts, a)))| self.score(seq, line, *ts, *a))
                .collect()
        } else {
            lines
                .iter()
                .zip(&stamps)
                .enumerate()
                .map(|(seq, (line, (ts, a)))| self.score(seq, line, *ts, *a))
                .collect()
        };

        self.apply_repetition(&mut classified);
        classified
    }

    fn score(
        &self,
        sequence: usize,
        line: &RawLine,
        timestamp: DateTime<Utc>,
        ordering_assumed: bool,
    ) -> Classification {
        let mut classification =
            Classification::unmatched(sequence, line.clone(), timestamp, ordering_assumed);

        let Some(found) = self.catalog.match_line(line) else {
            return classification;
        };

        classification.rule_id = Some(found.rule.id.clone());
        classification.domain = Some(found.rule.domain);
        classification.span = Some(found.span);

        if found.rule.is_success_marker {
            return classification.into_success();
        }

        let level = LevelHint::detect(&line.text);
        classification.severity =
            Severity::new(found.rule.base_severity).scaled(level.factor(), self.ceiling);
        classification
    }

    fn apply_repetition(&self, classified: &mut [Classification]) {
        let window = self.repetition.window();
        let mut recent: HashMap<String, VecDeque<DateTime<Utc>>> = HashMap::new();

        // Earlier means earlier in time, whatever the input order
        let mut order: Vec<usize> = (0..classified.len())
            .filter(|&i| classified[i].is_error())
            .collect();
        order.sort_by_key(|&i| classified[i].timestamp);

        for i in order {
            let c = &mut classified[i];
            let Some(rule_id) = &c.rule_id else {
                continue;
            };
            let seen = recent.entry(rule_id.clone()).or_default();
            while seen.front().is_some_and(|t| c.timestamp - *t > window) {
                seen.pop_front();
            }
            if !seen.is_empty() {
                c.severity = c.severity.scaled(self.repetition.factor(seen.len()), self.ceiling);
            }
            seen.push_back(c.timestamp);
        }
    }
}

/// Effective timestamp for every line, with a flag for synthesized ones
///
/// A line without a timestamp sits one microsecond after its predecessor.
/// Lines before the first valid timestamp are placed just before it.
#[must_use]
pub fn assign_timestamps(lines: &[RawLine]) -> Vec<(DateTime<Utc>, bool)> {
    let first_valid = lines.iter().find_map(|l| l.timestamp);
    let leading = lines.iter().take_while(|l| l.timestamp.is_none()).count();

    let mut out = Vec::with_capacity(lines.len());
    let mut previous: Option<DateTime<Utc>> = None;

    for (i, line) in lines.iter().enumerate() {
        if let Some(ts) = line.timestamp {
            previous = Some(ts);
            out.push((ts, false));
            continue;
        }

        let ts = match (previous, first_valid) {
            (Some(p), _) => p.checked_add_signed(micros(1)).unwrap_or(p),
            (None, Some(first)) => first.checked_sub_signed(micros(leading - i)).unwrap_or(first),
            (None, None) => DateTime::<Utc>::UNIX_EPOCH + micros(i),
        };
        previous = Some(ts);
        out.push((ts, true));
    }
    out
}

fn micros(n: usize) -> TimeDelta {
    TimeDelta::microseconds(i64::try_from(n).unwrap_or(i64::MAX))
}

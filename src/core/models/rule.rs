//! Pattern rules
//!
//! A rule is a record in the pattern catalog: a regex tagged with a domain,
//! an intrinsic severity and a flag saying whether a match means "this
//! operation succeeded". Rules are data, loaded once and never mutated.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Domain;

/// Default priority for rules that don't set one
pub const DEFAULT_PRIORITY: u32 = 50;

/// Errors raised while loading or compiling a pattern catalog
///
/// All of these are fatal: the engine cannot classify without a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be read
    #[error("failed to read catalog {path}: {source}")]
    Io {
        /// Path that was being read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Catalog text is not valid
    #[error("invalid catalog: {0}")]
    Parse(String),

    /// Catalog has no rules at all
    #[error("catalog contains no rules")]
    Empty,

    /// Two rules share an id
    #[error("duplicate rule id: {0}")]
    DuplicateId(String),

    /// Base severity outside 0..=10
    #[error("rule {id}: severity {value} outside 0..=10")]
    InvalidSeverity {
        /// Offending rule
        id: String,
        /// Value found
        value: f64,
    },

    /// Pattern does not compile
    #[error("rule {id}: invalid pattern: {source}")]
    InvalidPattern {
        /// Offending rule
        id: String,
        /// Regex compile error
        #[source]
        source: regex::Error,
    },

    /// The combined rule set failed to compile (size limits)
    #[error("failed to compile rule set: {0}")]
    Compile(#[from] regex::Error),
}

/// A single catalog rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Unique identifier, e.g. `thermal.threshold`
    pub id: String,

    /// Domain the rule belongs to
    pub domain: Domain,

    /// Regular expression matched against the raw line text
    pub pattern: String,

    /// Intrinsic severity of a match (ignored for success markers)
    #[serde(default, rename = "severity")]
    pub base_severity: f64,

    /// Whether a match means the operation succeeded
    #[serde(default, rename = "success")]
    pub is_success_marker: bool,

    /// Evaluation tier: lower values are more specific and win ties
    #[serde(default = "default_priority")]
    pub priority: u32,

    /// Source tags this rule is restricted to (empty = any source)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,

    /// Match case-sensitively (default: insensitive)
    #[serde(default)]
    pub case_sensitive: bool,

    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

const fn default_priority() -> u32 {
    DEFAULT_PRIORITY
}

impl Rule {
    /// Create an error rule
    #[must_use]
    pub fn error(id: &str, domain: Domain, pattern: &str, severity: f64) -> Self {
        Self {
            id: id.to_string(),
            domain,
            pattern: pattern.to_string(),
            base_severity: severity,
            is_success_marker: false,
            priority: DEFAULT_PRIORITY,
            sources: Vec::new(),
            case_sensitive: false,
            description: None,
        }
    }

    /// Create a success-marker rule
    #[must_use]
    pub fn success(id: &str, domain: Domain, pattern: &str) -> Self {
        Self {
            is_success_marker: true,
            ..Self::error(id, domain, pattern, 0.0)
        }
    }

    /// Set priority
    #[must_use]
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Restrict to source tags
    #[must_use]
    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.sources = sources;
        self
    }

    /// Check if this rule applies to lines from a source
    #[must_use]
    pub fn applies_to(&self, source_tag: &str) -> bool {
        self.sources.is_empty() || self.sources.iter().any(|s| s.eq_ignore_ascii_case(source_tag))
    }

    /// Regex source with case folding applied
    #[must_use]
    pub fn regex_source(&self) -> String {
        if self.case_sensitive {
            self.pattern.clone()
        } else {
            format!("(?i){}", self.pattern)
        }
    }
}

/// A versioned collection of rules, as produced by a [`crate::core::ports::RuleSource`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Catalog version string
    pub version: String,

    /// Rules in file order
    pub rules: Vec<Rule>,
}

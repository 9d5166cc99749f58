//! Analysis configuration
//!
//! Loaded from a TOML file; every key is optional and falls back to the
//! defaults below.
//!
//! ```toml
//! time_window_secs = 5
//! severity_ceiling = 10.0
//! confidence_floor = 0.60
//! confidence_ceiling = 0.95
//! budget_ms = 2000
//!
//! [repetition]
//! window_secs = 60
//!
//! [success]
//! extra_markers = ["all checks green"]
//!
//! [domain_adjacency]
//! thermal = ["vrm", "power"]
//! network = ["application"]
//! ```
//!
//! A `[domain_adjacency]` table replaces the built-in one entirely.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::models::Severity;
use crate::core::services::{
    AdjacencyTable, Aggregator, ConfidenceBounds, DEFAULT_PARALLEL_THRESHOLD, RepetitionPolicy,
    WindowPolicy,
};

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Extra success detection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuccessConfig {
    /// Case-insensitive phrases that mark a line as a success
    pub extra_markers: Vec<String>,
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Fixed grouping window in seconds; derived from error density when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_window_secs: Option<f64>,

    /// Upper bound for scored severities
    pub severity_ceiling: f64,

    /// Lowest reportable chain confidence
    pub confidence_floor: f64,

    /// Highest reportable chain confidence
    pub confidence_ceiling: f64,

    /// Isolated errors below this severity produce no singleton chain
    pub min_singleton_severity: f64,

    /// Batch size at which classification goes parallel
    pub parallel_threshold: usize,

    /// Wall-clock budget for one analysis, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_ms: Option<u64>,

    /// Rule catalog to load instead of the built-in one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,

    /// Repetition modifier
    pub repetition: RepetitionPolicy,

    /// Extra success markers
    pub success: SuccessConfig,

    /// Timeline settings
    pub report: Aggregator,

    /// Known cause → effect domain pairs
    pub domain_adjacency: AdjacencyTable,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let bounds = ConfidenceBounds::default();
        Self {
            time_window_secs: None,
            severity_ceiling: Severity::MAX,
            confidence_floor: bounds.floor,
            confidence_ceiling: bounds.ceiling,
            min_singleton_severity: 0.0,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            budget_ms: None,
            catalog_path: None,
            repetition: RepetitionPolicy::default(),
            success: SuccessConfig::default(),
            report: Aggregator::default(),
            domain_adjacency: AdjacencyTable::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Set a fixed window
    #[must_use]
    pub fn with_time_window_secs(mut self, secs: f64) -> Self {
        self.time_window_secs = Some(secs);
        self
    }

    /// Set the catalog file
    #[must_use]
    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    /// Set the wall-clock budget
    #[must_use]
    pub fn with_budget_ms(mut self, budget_ms: u64) -> Self {
        self.budget_ms = Some(budget_ms);
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        let in_unit = |v: f64| v > 0.0 && v <= 1.0;
        if !in_unit(self.confidence_floor) || !in_unit(self.confidence_ceiling) {
            return Err(ConfigError::Invalid(format!(
                "confidence bounds must lie in (0, 1], got {} and {}",
                self.confidence_floor, self.confidence_ceiling
            )));
        }
        if self.confidence_floor >= self.confidence_ceiling {
            return Err(ConfigError::Invalid(format!(
                "confidence_floor ({}) must be below confidence_ceiling ({})",
                self.confidence_floor, self.confidence_ceiling
            )));
        }
        if !(self.severity_ceiling > 0.0 && self.severity_ceiling <= Severity::MAX) {
            return Err(ConfigError::Invalid(format!(
                "severity_ceiling must lie in (0, 10], got {}",
                self.severity_ceiling
            )));
        }
        if let Some(secs) = self.time_window_secs.filter(|s| !(s.is_finite() && *s > 0.0)) {
            return Err(ConfigError::Invalid(format!(
                "time_window_secs must be positive, got {secs}"
            )));
        }
        if !self.min_singleton_severity.is_finite() || self.min_singleton_severity < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "min_singleton_severity must be non-negative, got {}",
                self.min_singleton_severity
            )));
        }
        if !(self.repetition.step.is_finite() && self.repetition.step >= 0.0)
            || !(self.repetition.window_secs.is_finite() && self.repetition.window_secs >= 0.0)
        {
            return Err(ConfigError::Invalid(
                "repetition window_secs and step must be non-negative".to_string(),
            ));
        }
        let rate = self.report.high_error_rate_percent;
        if !(rate.is_finite() && (0.0..=100.0).contains(&rate)) {
            return Err(ConfigError::Invalid(format!(
                "report.high_error_rate_percent must lie in [0, 100], got {rate}"
            )));
        }
        Ok(())
    }

    /// Window policy for the chain builder
    #[must_use]
    pub fn window_policy(&self) -> WindowPolicy {
        self.time_window_secs.map_or(WindowPolicy::Auto, |secs| {
            WindowPolicy::Fixed(secs_to_delta(secs))
        })
    }

    /// Confidence bounds for the chain builder
    #[must_use]
    pub const fn confidence_bounds(&self) -> ConfidenceBounds {
        ConfidenceBounds {
            floor: self.confidence_floor,
            ceiling: self.confidence_ceiling,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn secs_to_delta(secs: f64) -> TimeDelta {
    TimeDelta::try_milliseconds((secs * 1000.0).round() as i64).unwrap_or(TimeDelta::MAX)
}

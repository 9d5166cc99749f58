//! Analysis pipeline
//!
//! `RawLine`s go through the classifier, the success filter, the chain
//! builder and the aggregator, in that order. The catalog is loaded once
//! and shared read-only; nothing else is kept between runs, so one
//! [`Analyzer`] can serve any number of analyses.

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::adapters::toml::TomlRuleSource;
use crate::config::{AnalysisConfig, ConfigError};
use crate::core::models::{AnalysisResult, CatalogError, Classification, RawLine};
use crate::core::ports::{Clock, SystemClock};
use crate::core::services::{
    ChainBuilder, ConfidenceScorer, PatternCatalog, SeverityClassifier, SuccessFilter,
};

/// Errors from building or running an analyzer
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The configuration is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The rule catalog could not be loaded
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The run took longer than `budget_ms`
    #[error("analysis exceeded its {budget_ms} ms budget during {stage} ({elapsed_ms} ms elapsed)")]
    BudgetExceeded {
        /// Stage that finished past the budget
        stage: &'static str,
        /// Configured budget
        budget_ms: u64,
        /// Time spent so far
        elapsed_ms: u128,
    },
}

/// Wall-clock budget checked between stages
#[derive(Debug, Clone, Copy)]
struct Budget {
    started: Instant,
    limit_ms: Option<u64>,
}

impl Budget {
    fn start(limit_ms: Option<u64>) -> Self {
        Self {
            started: Instant::now(),
            limit_ms,
        }
    }

    fn check(&self, stage: &'static str) -> Result<(), AnalysisError> {
        let Some(budget_ms) = self.limit_ms else {
            return Ok(());
        };
        let elapsed = self.started.elapsed();
        if elapsed > Duration::from_millis(budget_ms) {
            log::warn!("budget of {budget_ms} ms exceeded after {stage}");
            return Err(AnalysisError::BudgetExceeded {
                stage,
                budget_ms,
                elapsed_ms: elapsed.as_millis(),
            });
        }
        Ok(())
    }
}

/// Runs the full analysis pipeline
#[derive(Debug)]
pub struct Analyzer {
    catalog: Arc<PatternCatalog>,
    config: AnalysisConfig,
    filter: SuccessFilter,
    chains: ChainBuilder,
    clock: Arc<dyn Clock>,
}

impl Analyzer {
    /// Create an analyzer over an already loaded catalog
    pub fn new(catalog: Arc<PatternCatalog>, config: AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        let filter = SuccessFilter::new(&config.success.extra_markers);
        let chains = ChainBuilder::new(config.domain_adjacency.clone())
            .with_window(config.window_policy())
            .with_bounds(config.confidence_bounds())
            .with_min_singleton_severity(config.min_singleton_severity);
        Ok(Self {
            catalog,
            config,
            filter,
            chains,
            clock: Arc::new(SystemClock),
        })
    }

    /// Load the catalog named by the config (or the built-in one)
    pub fn from_config(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        let source = config
            .catalog_path
            .as_ref()
            .map_or_else(TomlRuleSource::builtin, |path| TomlRuleSource::file(path));
        let catalog = PatternCatalog::load(&source)?;
        Self::new(Arc::new(catalog), config)
    }

    /// Use a different clock for `processed_at`
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use a different confidence scorer
    #[must_use]
    pub fn with_scorer(mut self, scorer: Box<dyn ConfidenceScorer>) -> Self {
        self.chains = self.chains.with_scorer(scorer);
        self
    }

    /// The shared catalog
    #[must_use]
    pub fn catalog(&self) -> &Arc<PatternCatalog> {
        &self.catalog
    }

    /// The active configuration
    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Classifier configured from this analyzer's settings
    #[must_use]
    pub fn classifier(&self) -> SeverityClassifier<'_> {
        SeverityClassifier::new(&self.catalog)
            .with_ceiling(self.config.severity_ceiling)
            .with_repetition(self.config.repetition)
            .with_parallel_threshold(self.config.parallel_threshold)
    }

    /// Classify a single line in isolation
    #[must_use]
    pub fn classify(&self, line: &RawLine) -> Classification {
        self.classifier().classify(line)
    }

    /// Run the full pipeline
    pub fn analyze(&self, lines: &[RawLine]) -> Result<AnalysisResult, AnalysisError> {
        let budget = Budget::start(self.config.budget_ms);

        let classified = self.classifier().classify_all(lines);
        budget.check("classification")?;

        let errors = self.filter.filter(classified);
        budget.check("filtering")?;

        let chains = self.chains.build_chains(&errors);
        budget.check("chain building")?;

        let result = self.config.report.aggregate(
            lines.len(),
            errors,
            chains,
            self.config.confidence_bounds().normalized(),
            self.catalog.version(),
            self.clock.now(),
        );
        budget.check("aggregation")?;

        log::debug!(
            "analyzed {} line(s): {} error(s), {} chain(s)",
            result.total_lines,
            result.errors.len(),
            result.chains.len()
        );
        Ok(result)
    }
}

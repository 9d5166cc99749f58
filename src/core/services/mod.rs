//! Analysis services
//!
//! Pure logic over domain models. Nothing here performs I/O; rules arrive
//! through the [`RuleSource`](crate::core::ports::RuleSource) port and time
//! through [`Clock`](crate::core::ports::Clock).
//!
//! - [`catalog`] - Compiled rule table and match resolution
//! - [`classifier`] - Per-line severity scoring
//! - [`filter`] - Success and noise suppression
//! - [`chain`] - Causal chain grouping
//! - [`confidence`] - Chain confidence scoring
//! - [`aggregator`] - Ranking, timeline and summary

pub mod aggregator;
pub mod catalog;
pub mod chain;
pub mod classifier;
pub mod confidence;
pub mod filter;

pub use aggregator::{
    Aggregator, CRITICAL_EVENT_SEVERITY, PERFORMANCE_ISSUE_SEVERITY, aggregate, excerpt,
};
pub use catalog::{CatalogMatch, PatternCatalog};
pub use chain::{AdjacencyTable, ChainBuilder, WindowPolicy, derive_window};
pub use classifier::{
    DEFAULT_PARALLEL_THRESHOLD, LevelHint, RepetitionPolicy, SeverityClassifier, assign_timestamps,
};
pub use confidence::{ChainEvidence, ConfidenceBounds, ConfidenceScorer, WeightedScorer, score};
pub use filter::SuccessFilter;

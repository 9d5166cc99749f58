//! Domain models for faultline
//!
//! Pure data structures with no I/O dependencies.
//!
//! - [`RawLine`] - A timestamped input line
//! - [`Rule`] - A pattern catalog record
//! - [`Classification`] - The verdict for one line
//! - [`CausalChain`] - A root-cause hypothesis
//! - [`AnalysisResult`] - The snapshot returned to callers

mod analysis;
mod chain;
mod classification;
mod domain;
mod raw_line;
mod rule;
mod severity;

pub use analysis::{
    AnalysisResult, DomainHypothesis, HealthStatus, LogHealth, SeverityDistribution, Summary,
    TimelineEntry,
};
pub use chain::{CausalChain, LinkStrength};
pub use classification::{Classification, MatchSpan};
pub use domain::Domain;
pub use raw_line::RawLine;
pub use rule::{CatalogError, DEFAULT_PRIORITY, Rule, RuleSet};
pub use severity::{Severity, SeverityBand};

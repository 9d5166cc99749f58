//! Success/noise filter - the policy boundary in front of error reporting
//!
//! Whatever the classifier decided, nothing marked as success and nothing
//! with zero severity gets past this stage. Extra success phrases can be
//! configured here without touching the classifier's scoring.

use regex::RegexSet;

use crate::core::models::Classification;

/// Drops successes and routine lines
#[derive(Debug, Clone, Default)]
pub struct SuccessFilter {
    extra_markers: Option<RegexSet>,
}

impl SuccessFilter {
    /// Create a filter with additional case-insensitive success phrases
    #[must_use]
    pub fn new(extra_markers: &[String]) -> Self {
        let patterns: Vec<String> = extra_markers
            .iter()
            .map(|m| m.trim())
            .filter(|m| !m.is_empty())
            .map(|m| format!("(?i){}", regex::escape(m)))
            .collect();
        if patterns.is_empty() {
            return Self::default();
        }
        // Escaped literals always compile; fall back to no extras on size limits
        let extra_markers = RegexSet::new(&patterns)
            .inspect_err(|e| log::warn!("ignoring extra success markers: {e}"))
            .ok();
        Self { extra_markers }
    }

    /// Whether a classification is recognized as a success by this policy
    #[must_use]
    pub fn is_success(&self, classification: &Classification) -> bool {
        classification.is_success
            || self
                .extra_markers
                .as_ref()
                .is_some_and(|set| set.is_match(&classification.line.text))
    }

    /// Keep only genuine errors, in input order
    #[must_use]
    pub fn filter(&self, classifications: Vec<Classification>) -> Vec<Classification> {
        let total = classifications.len();
        let mut suppressed_success = 0usize;

        let errors: Vec<Classification> = classifications
            .into_iter()
            .filter(|c| {
                if self.is_success(c) {
                    suppressed_success += 1;
                    return false;
                }
                c.severity.is_error()
            })
            .collect();

        log::debug!(
            "filter: {} of {total} line(s) are errors, {suppressed_success} success line(s) suppressed",
            errors.len()
        );
        errors
    }
}

//! Rule source port
//!
//! Defines where pattern catalog rules come from.

use super::super::models::{CatalogError, RuleSet};

/// Source of pattern catalog rules
///
/// Implementations read rules from TOML files, embedded defaults, or
/// anything else that can produce a versioned rule list.
#[cfg_attr(test, mockall::automock)]
pub trait RuleSource: Send + Sync {
    /// Load the full rule set
    ///
    /// Any failure here is fatal to the engine.
    fn load(&self) -> Result<RuleSet, CatalogError>;

    /// Short description of where the rules come from, for logs
    fn describe(&self) -> String;
}

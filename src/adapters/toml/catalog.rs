//! TOML rule source
//!
//! Reads a catalog file of the form:
//!
//! ```toml
//! [catalog]
//! version = "1"
//!
//! [[rule]]
//! id = "thermal.threshold"
//! domain = "thermal"
//! pattern = 'temperature above threshold'
//! severity = 7.5
//! ```
//!
//! The built-in catalog uses the same format and is embedded at compile time.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::models::{CatalogError, Rule, RuleSet};
use crate::core::ports::RuleSource;

/// The catalog shipped with the binary
pub const BUILTIN_CATALOG: &str = include_str!("default_catalog.toml");

/// On-disk catalog layout
#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    catalog: CatalogHeader,
    #[serde(default, rename = "rule")]
    rules: Vec<Rule>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogHeader {
    version: String,
}

impl Default for CatalogHeader {
    fn default() -> Self {
        Self {
            version: "unversioned".to_string(),
        }
    }
}

/// Parse catalog TOML into a rule set
pub fn parse_catalog(content: &str) -> Result<RuleSet, CatalogError> {
    let file: CatalogFile =
        toml::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))?;
    Ok(RuleSet {
        version: file.catalog.version,
        rules: file.rules,
    })
}

/// Render a rule set back to catalog TOML
pub fn format_catalog(rule_set: &RuleSet) -> anyhow::Result<String> {
    let file = CatalogFile {
        catalog: CatalogHeader {
            version: rule_set.version.clone(),
        },
        rules: rule_set.rules.clone(),
    };
    Ok(toml::to_string_pretty(&file)?)
}

/// Where a [`TomlRuleSource`] reads from
#[derive(Debug, Clone, PartialEq, Eq)]
enum Origin {
    Builtin,
    File(PathBuf),
}

/// Rule source backed by catalog TOML
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TomlRuleSource {
    origin: Origin,
}

impl TomlRuleSource {
    /// The embedded catalog
    #[must_use]
    pub const fn builtin() -> Self {
        Self {
            origin: Origin::Builtin,
        }
    }

    /// A catalog file on disk
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            origin: Origin::File(path.into()),
        }
    }

    /// Path of the catalog file, if not built in
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match &self.origin {
            Origin::Builtin => None,
            Origin::File(path) => Some(path),
        }
    }
}

impl RuleSource for TomlRuleSource {
    fn load(&self) -> Result<RuleSet, CatalogError> {
        match &self.origin {
            Origin::Builtin => parse_catalog(BUILTIN_CATALOG),
            Origin::File(path) => {
                let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
                    path: path.clone(),
                    source,
                })?;
                parse_catalog(&content)
            },
        }
    }

    fn describe(&self) -> String {
        match &self.origin {
            Origin::Builtin => "built-in catalog".to_string(),
            Origin::File(path) => path.display().to_string(),
        }
    }
}

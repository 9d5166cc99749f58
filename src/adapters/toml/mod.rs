//! TOML-backed rule catalogs
//!
//! - [`catalog`] - `RuleSource` implementation for catalog files and the
//!   embedded built-in catalog

pub mod catalog;

pub use catalog::{BUILTIN_CATALOG, TomlRuleSource, format_catalog, parse_catalog};

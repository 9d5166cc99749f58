//! Pattern catalog tests
//!
//! Rule resolution against the built-in catalog and catalogs loaded from disk.

use std::fs;

use faultline::adapters::toml::{TomlRuleSource, parse_catalog};
use faultline::core::models::{CatalogError, Domain, RawLine};
use faultline::core::ports::RuleSource;
use faultline::core::services::{PatternCatalog, SeverityClassifier};
use tempfile::TempDir;

use crate::common::at;

fn builtin() -> PatternCatalog {
    PatternCatalog::load(&TomlRuleSource::builtin()).unwrap()
}

#[test]
fn test_builtin_catalog_is_versioned() {
    let catalog = builtin();
    assert!(!catalog.version().is_empty());
    assert_ne!(catalog.version(), "unversioned");
}

#[test]
fn test_rules_sorted_by_priority() {
    let catalog = builtin();
    let priorities: Vec<u32> = catalog.rules().iter().map(|r| r.priority).collect();
    let mut sorted = priorities.clone();
    sorted.sort_unstable();
    assert_eq!(priorities, sorted);
}

#[test]
fn test_zero_errors_phrase_is_success() {
    let catalog = builtin();
    let m = catalog
        .match_text("operation failed: 0 errors detected, status OK")
        .unwrap();
    assert!(m.rule.is_success_marker);
}

#[test]
fn test_specific_rule_beats_generic() {
    let catalog = builtin();
    let m = catalog.match_text("PSU 1 failed: AC lost").unwrap();
    assert_eq!(m.rule.domain, Domain::Power);
    assert_ne!(m.rule.id, "generic.failure");
}

#[test]
fn test_generic_fallback() {
    let catalog = builtin();
    let m = catalog.match_text("job 7 failed with exit code 3").unwrap();
    assert_eq!(m.rule.id, "generic.failure");
}

#[test]
fn test_catalog_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.toml");
    fs::write(
        &path,
        r#"
[catalog]
version = "site-7"

[[rule]]
id = "bmc.sel_full"
domain = "firmware"
pattern = 'SEL (log )?full'
severity = 4.0
sources = ["bmc"]
case_sensitive = true
"#,
    )
    .unwrap();

    let source = TomlRuleSource::file(&path);
    let catalog = PatternCatalog::load(&source).unwrap();
    assert_eq!(catalog.version(), "site-7");

    let classifier = SeverityClassifier::new(&catalog);
    let hit = classifier.classify(&RawLine::new(at(0), "bmc", "SEL log full"));
    assert_eq!(hit.rule_id.as_deref(), Some("bmc.sel_full"));

    let other_source = classifier.classify(&RawLine::new(at(0), "kernel", "SEL log full"));
    assert!(other_source.rule_id.is_none());

    let wrong_case = classifier.classify(&RawLine::new(at(0), "bmc", "sel log full"));
    assert!(wrong_case.rule_id.is_none());
}

#[test]
fn test_malformed_catalog_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.toml");
    fs::write(&path, "[[rule]]\nid = 3\n").unwrap();

    let err = TomlRuleSource::file(&path).load().unwrap_err();
    assert!(matches!(err, CatalogError::Parse(_)));
}

#[test]
fn test_empty_catalog_rejected() {
    let set = parse_catalog("[catalog]\nversion = \"1\"\n").unwrap();
    let err = PatternCatalog::from_rule_set(set).unwrap_err();
    assert!(matches!(err, CatalogError::Empty));
}

#[test]
fn test_invalid_regex_names_rule() {
    let set = parse_catalog(
        r#"
[[rule]]
id = "broken.rule"
domain = "memory"
pattern = 'ecc[('
severity = 5.0
"#,
    )
    .unwrap();
    let err = PatternCatalog::from_rule_set(set).unwrap_err();
    assert!(err.to_string().contains("broken.rule"));
}

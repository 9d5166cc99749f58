//! Configuration loading tests

use std::fs;

use chrono::TimeDelta;
use faultline::config::{AnalysisConfig, ConfigError};
use faultline::core::models::Domain;
use faultline::core::services::WindowPolicy;
use tempfile::TempDir;

fn write(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("faultline.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_full_config() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        r#"
time_window_secs = 5
confidence_floor = 0.5
confidence_ceiling = 0.9
min_singleton_severity = 6.0
budget_ms = 2000

[repetition]
window_secs = 30

[success]
extra_markers = ["all checks green"]

[report]
timeline_limit = 10
high_error_rate_percent = 2.5

[domain_adjacency]
network = ["application", "power"]
"#,
    );

    let config = AnalysisConfig::load(&path).unwrap();
    assert_eq!(config.window_policy(), WindowPolicy::Fixed(TimeDelta::seconds(5)));
    assert!((config.confidence_bounds().floor - 0.5).abs() < f64::EPSILON);
    assert_eq!(config.budget_ms, Some(2000));
    assert!((config.repetition.window_secs - 30.0).abs() < f64::EPSILON);
    assert_eq!(config.success.extra_markers, vec!["all checks green".to_string()]);
    assert_eq!(config.report.timeline_limit, 10);
    assert!((config.report.timeline_min_severity - 6.0).abs() < f64::EPSILON);
    assert!((config.report.high_error_rate_percent - 2.5).abs() < f64::EPSILON);

    let table = &config.domain_adjacency;
    assert!(table.is_adjacent(Domain::Network, Domain::Power));
    assert!(!table.is_adjacent(Domain::Thermal, Domain::Vrm));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = AnalysisConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_invalid_values_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "time_window_secs = -3\n");
    let err = AnalysisConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(err.to_string().contains("time_window_secs"));
}

#[test]
fn test_unknown_key_type_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "budget_ms = \"soon\"\n");
    let err = AnalysisConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_default_window_is_auto() {
    assert_eq!(AnalysisConfig::default().window_policy(), WindowPolicy::Auto);
}

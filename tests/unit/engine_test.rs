//! End-to-end engine tests over the built-in catalog

use faultline::config::AnalysisConfig;
use faultline::core::models::{Domain, RawLine};

use crate::common::{analyzer, at, default_analyzer, healthy_log, line, thermal_cascade};

#[test]
fn test_healthy_log_has_no_errors() {
    let result = default_analyzer().analyze(&healthy_log(500)).unwrap();
    assert_eq!(result.total_lines, 500);
    assert!(result.errors.is_empty());
    assert!(result.chains.is_empty());
    assert!(result.timeline.is_empty());
    assert!(result.is_clean());
}

#[test]
fn test_thermal_cascade_forms_one_chain() {
    let a = analyzer(AnalysisConfig::default().with_time_window_secs(5.0));
    let result = a.analyze(&thermal_cascade(100)).unwrap();

    assert_eq!(result.errors.len(), 3);
    assert_eq!(result.chains.len(), 1);

    let chain = &result.chains[0];
    assert_eq!(chain.members.len(), 3);
    assert_eq!(chain.root_hypothesis, Domain::Thermal);
    assert_eq!(chain.label, "thermal cascade");
    assert_eq!(chain.domain_path(), "thermal -> vrm -> power");
    assert!((0.60..=0.95).contains(&chain.confidence));
    assert_eq!(result.summary.chained_errors, 3);
    assert_eq!(result.summary.isolated_errors, 0);
}

#[test]
fn test_cascade_inside_healthy_noise() {
    let mut lines = healthy_log(200);
    lines.extend(thermal_cascade(300));
    lines.extend(healthy_log(50));

    let a = analyzer(AnalysisConfig::default().with_time_window_secs(5.0));
    let result = a.analyze(&lines).unwrap();
    assert_eq!(result.errors.len(), 3);
    assert_eq!(result.chains.len(), 1);
    assert_eq!(result.chains[0].root_hypothesis, Domain::Thermal);
}

#[test]
fn test_unrelated_errors_are_singletons() {
    let lines = vec![
        line(0, "kernel", "eth0: link down"),
        line(600, "kernel", "Out of memory: Killed process 1234"),
    ];
    let result = default_analyzer().analyze(&lines).unwrap();

    assert_eq!(result.errors.len(), 2);
    assert_eq!(result.chains.len(), 2);
    for chain in &result.chains {
        assert!(chain.is_singleton());
        assert!((chain.confidence - 0.60).abs() < 1e-9);
    }
    assert_eq!(result.summary.isolated_errors, 2);
}

#[test]
fn test_success_marker_overrides_failure_words() {
    let a = default_analyzer();
    let text = "operation failed: 0 errors detected, status OK";

    let c = a.classify(&line(0, "app", text));
    assert!(c.is_success);
    assert!((c.severity.value() - 0.0).abs() < f64::EPSILON);

    let result = a.analyze(&[line(0, "app", text)]).unwrap();
    assert!(result.errors.is_empty());
}

#[test]
fn test_extra_success_markers_from_config() {
    let config = AnalysisConfig::from_toml_str(
        "[success]\nextra_markers = [\"all checks green\"]\n",
    )
    .unwrap();
    let lines = vec![line(0, "ci", "job failed earlier, all checks green now")];

    assert_eq!(default_analyzer().analyze(&lines).unwrap().errors.len(), 1);
    assert!(analyzer(config).analyze(&lines).unwrap().errors.is_empty());
}

#[test]
fn test_errors_ranked_by_severity() {
    let lines = vec![
        line(0, "dns", "name resolution failed for db.internal"),
        line(1000, "kernel", "Kernel panic - not syncing"),
        line(2000, "bmc", "fan 3 failed"),
    ];
    let result = default_analyzer().analyze(&lines).unwrap();
    let severities: Vec<f64> = result.errors.iter().map(|e| e.severity.value()).collect();
    let mut sorted = severities.clone();
    sorted.sort_by(|a, b| b.total_cmp(a));
    assert_eq!(severities, sorted);
    assert_eq!(result.errors[0].domain, Some(Domain::Application));
}

#[test]
fn test_timeline_skips_low_severity_and_stays_chronological() {
    let lines = vec![
        line(0, "dns", "name resolution failed for db.internal"),
        line(1000, "bmc", "fan 3 failed"),
        line(2000, "kernel", "Kernel panic - not syncing"),
    ];
    let result = default_analyzer().analyze(&lines).unwrap();
    assert_eq!(result.errors.len(), 3);
    assert_eq!(result.timeline.len(), 2);
    assert!(result.timeline[0].timestamp < result.timeline[1].timestamp);
    assert!(result.timeline.iter().all(|e| e.chain_id.is_some()));
}

#[test]
fn test_repetition_escalates_severity() {
    let lines = vec![
        line(0, "bmc", "fan 1 failed"),
        line(5, "bmc", "fan 1 failed"),
        line(10, "bmc", "fan 1 failed"),
    ];
    let result = default_analyzer().analyze(&lines).unwrap();
    let mut by_seq = result.errors.clone();
    by_seq.sort_by_key(|e| e.sequence);
    assert!(by_seq[0].severity < by_seq[1].severity);
    assert!(by_seq[1].severity < by_seq[2].severity);
}

#[test]
fn test_repetition_counts_earlier_in_time_not_in_input() {
    // Input order 300, 0, 10: only the 10s line repeats within 60s
    let lines = vec![
        line(300, "kernel", "fan 2 failed"),
        line(0, "bmc", "fan 2 failed"),
        line(10, "bmc", "fan 2 failed"),
    ];
    let result = default_analyzer().analyze(&lines).unwrap();
    let mut by_seq = result.errors.clone();
    by_seq.sort_by_key(|e| e.sequence);
    assert!((by_seq[0].severity.value() - 7.0).abs() < 1e-9);
    assert!((by_seq[1].severity.value() - 7.0).abs() < 1e-9);
    assert!((by_seq[2].severity.value() - 7.7).abs() < 1e-9);
}

#[test]
fn test_untimed_lines_are_ordered_by_position() {
    let lines = vec![
        RawLine::untimed("app", "worker crashed"),
        line(10, "app", "request ok"),
        RawLine::untimed("app", "Segmentation fault in worker 3"),
    ];
    let result = default_analyzer().analyze(&lines).unwrap();
    assert_eq!(result.errors.len(), 2);
    assert!(result.errors.iter().all(|e| e.ordering_assumed));

    let first = result.errors.iter().find(|e| e.sequence == 0).unwrap();
    let last = result.errors.iter().find(|e| e.sequence == 2).unwrap();
    assert!(first.timestamp < at(10));
    assert!(last.timestamp > at(10));
}

#[test]
fn test_min_singleton_severity_hides_weak_singletons() {
    let mut config = AnalysisConfig::default();
    config.min_singleton_severity = 7.0;
    let lines = vec![
        line(0, "dns", "name resolution failed for db.internal"),
        line(5000, "kernel", "Kernel panic - not syncing"),
    ];
    let result = analyzer(config).analyze(&lines).unwrap();
    assert_eq!(result.errors.len(), 2);
    assert_eq!(result.chains.len(), 1);
    assert_eq!(result.chains[0].root_hypothesis, Domain::Application);
}

#[test]
fn test_processed_at_comes_from_clock() {
    let result = default_analyzer().analyze(&thermal_cascade(0)).unwrap();
    assert_eq!(result.processed_at, at(86_400));
    assert!(!result.catalog_version.is_empty());
}

#[test]
fn test_empty_input() {
    let result = default_analyzer().analyze(&[]).unwrap();
    assert_eq!(result.total_lines, 0);
    assert!(result.is_clean());
}

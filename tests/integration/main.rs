//! Integration tests for the faultline CLI
//!
//! These tests run the built binary against log files on disk and check
//! both the human and JSON renderings.

use assert_cmd::cargo;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper function to create a faultline command
fn faultline() -> assert_cmd::Command {
    assert_cmd::Command::new(cargo::cargo_bin!("faultline"))
}

/// Helper to write a file into the temp dir
fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write file");
    path
}

const HEALTHY: &str = "\
2024-03-01T10:00:00Z systemd[1]: Started Session 42 of user admin.
2024-03-01T10:00:01Z healthcheck: status OK
2024-03-01T10:00:02Z memtest: pass 3 passed, 0 errors
2024-03-01T10:00:03Z backup: nightly snapshot completed successfully
2024-03-01T10:00:04Z bmc: CPU0 temperature 48C within normal range
";

const CASCADE: &str = "\
2024-03-01T10:00:00Z bmc: CPU0 temperature above threshold (95C)
2024-03-01T10:00:01Z healthcheck: status OK
2024-03-01T10:00:02Z bmc: VRM fault detected on CPU0 rail
2024-03-01T10:00:04Z kernel: Emergency shutdown initiated
";

// =============================================================================
// Version
// =============================================================================

#[test]
fn test_version_command() {
    faultline()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("faultline v"));
}

#[test]
fn test_no_command_prints_version() {
    faultline()
        .assert()
        .success()
        .stdout(predicate::str::contains("faultline --help"));
}

#[test]
fn test_version_json() {
    let output = faultline().args(["--json", "version"]).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["version"].is_string());
}

// =============================================================================
// Analyze
// =============================================================================

#[test]
fn test_analyze_healthy_log() {
    let temp = TempDir::new().unwrap();
    let log = write(temp.path(), "healthy.log", HEALTHY);

    faultline()
        .arg("analyze")
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains("Analyzed 5 line(s) from healthy"))
        .stdout(predicate::str::contains("No errors found."));
}

#[test]
fn test_analyze_cascade() {
    let temp = TempDir::new().unwrap();
    let log = write(temp.path(), "bmc.log", CASCADE);

    faultline()
        .args(["analyze", "--window", "5"])
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains("Root-cause hypotheses:"))
        .stdout(predicate::str::contains("thermal cascade"))
        .stdout(predicate::str::contains("thermal -> vrm -> power"))
        .stdout(predicate::str::contains("Timeline:"));
}

#[test]
fn test_analyze_json() {
    let temp = TempDir::new().unwrap();
    let log = write(temp.path(), "bmc.log", CASCADE);

    let output = faultline()
        .args(["--json", "analyze", "-w", "5"])
        .arg(&log)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["sources"], serde_json::json!(["bmc"]));
    assert_eq!(json["total_lines"], 4);
    assert_eq!(json["errors"].as_array().unwrap().len(), 3);
    let chains = json["chains"].as_array().unwrap();
    assert_eq!(chains.len(), 1);
    assert_eq!(chains[0]["root_hypothesis"], "thermal");
    let confidence = chains[0]["confidence"].as_f64().unwrap();
    assert!((0.60..=0.95).contains(&confidence));
}

#[test]
fn test_analyze_multiple_files() {
    let temp = TempDir::new().unwrap();
    let bmc = write(
        temp.path(),
        "bmc.log",
        "2024-03-01T10:00:00Z bmc: CPU0 temperature above threshold (95C)\n",
    );
    let kernel = write(
        temp.path(),
        "kernel.log",
        "2024-03-01T10:00:03Z kernel: Emergency shutdown initiated\n",
    );

    let output = faultline()
        .args(["--json", "analyze", "--window", "5"])
        .arg(&kernel)
        .arg(&bmc)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["sources"], serde_json::json!(["kernel", "bmc"]));
    let chains = json["chains"].as_array().unwrap();
    assert_eq!(chains.len(), 1);
    assert_eq!(chains[0]["root_hypothesis"], "thermal");
}

#[test]
fn test_analyze_result_does_not_depend_on_file_order() {
    let temp = TempDir::new().unwrap();
    let kernel = write(temp.path(), "kernel.log", "2024-03-01T10:05:00Z fan 2 failed\n");
    let bmc = write(
        temp.path(),
        "bmc.log",
        "2024-03-01T10:00:00Z fan 2 failed\n2024-03-01T10:00:10Z fan 2 failed\n",
    );

    for files in [[&kernel, &bmc], [&bmc, &kernel]] {
        let output = faultline()
            .args(["--json", "analyze"])
            .args(files)
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let severities: Vec<f64> = json["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["severity"].as_f64().unwrap())
            .collect();
        assert_eq!(severities.len(), 3);
        assert!((severities[0] - 7.7).abs() < 1e-9);
        assert!((severities[1] - 7.0).abs() < 1e-9);
        assert!((severities[2] - 7.0).abs() < 1e-9);
    }
}

#[test]
fn test_analyze_with_config_file() {
    let temp = TempDir::new().unwrap();
    let log = write(temp.path(), "ci.log", "2024-03-01T10:00:00Z job failed, all checks green\n");
    let config = write(
        temp.path(),
        "faultline.toml",
        "[success]\nextra_markers = [\"all checks green\"]\n",
    );

    faultline()
        .arg("analyze")
        .arg(&log)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("No errors found."));
}

#[test]
fn test_analyze_missing_file_fails() {
    let temp = TempDir::new().unwrap();

    faultline()
        .arg("analyze")
        .arg(temp.path().join("missing.log"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.log"));
}

#[test]
fn test_analyze_invalid_catalog_fails() {
    let temp = TempDir::new().unwrap();
    let log = write(temp.path(), "bmc.log", CASCADE);
    let catalog = write(temp.path(), "rules.toml", "[[rule]]\nid = \"x\"\npattern = '(('\n");

    faultline()
        .arg("analyze")
        .arg(&log)
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .failure();
}

#[test]
fn test_analyze_zero_window_rejected() {
    let temp = TempDir::new().unwrap();
    let log = write(temp.path(), "bmc.log", CASCADE);

    faultline()
        .args(["analyze", "--window", "0"])
        .arg(&log)
        .assert()
        .failure()
        .stderr(predicate::str::contains("time_window_secs"));
}

#[test]
fn test_analyze_requires_files() {
    faultline().arg("analyze").assert().failure();
}

// =============================================================================
// Classify
// =============================================================================

#[test]
fn test_classify_success_line() {
    faultline()
        .args(["classify", "operation failed: 0 errors detected, status OK"])
        .assert()
        .success()
        .stdout(predicate::str::contains("success"));
}

#[test]
fn test_classify_error_line() {
    faultline()
        .args(["classify", "Uncorrectable ECC error on DIMM A1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("error: severity 9.0"))
        .stdout(predicate::str::contains("memory.uncorrectable"));
}

#[test]
fn test_classify_unmatched_line() {
    faultline()
        .args(["classify", "Started Session 42 of user admin."])
        .assert()
        .success()
        .stdout(predicate::str::contains("no match"));
}

#[test]
fn test_classify_json() {
    let output = faultline()
        .args(["--json", "classify", "eth0: link down", "--source", "kernel"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["source"], "kernel");
    assert_eq!(json["domain"], "network");
    assert_eq!(json["success"], false);
}

// =============================================================================
// Rules
// =============================================================================

#[test]
fn test_rules_filtered_by_domain() {
    faultline()
        .args(["rules", "--domain", "thermal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("thermal.trip"))
        .stdout(predicate::str::contains("memory.oom").not());
}

#[test]
fn test_rules_unknown_domain_rejected() {
    faultline()
        .args(["rules", "--domain", "storage"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid domain"));
}

#[test]
fn test_rules_custom_catalog_json() {
    let temp = TempDir::new().unwrap();
    let catalog = write(
        temp.path(),
        "rules.toml",
        r#"
[catalog]
version = "site-1"

[[rule]]
id = "site.disk"
domain = "application"
pattern = 'disk full'
severity = 6.0
"#,
    );

    let output = faultline()
        .args(["--json", "rules", "--catalog"])
        .arg(&catalog)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["catalog_version"], "site-1");
    assert_eq!(json["rules"][0]["id"], "site.disk");
}

use assert_cmd::Command;
use tempfile::TempDir;

/// Runs the binary against a config file that does not exist yet, so defaults apply.
fn overdue(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("overdue").unwrap();
    cmd.arg("--config").arg(dir.path().join("config.json"));
    cmd
}

#[test]
fn simulate_prints_one_report_per_run_and_a_summary() {
    let dir = TempDir::new().unwrap();
    let output = overdue(&dir)
        .args(["--simulate", "3", "--seed", "1", "--work-items", "20"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);

    for line in &lines[..3] {
        let report: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(report["end_state"], "Completed");
    }
    let summary: serde_json::Value = serde_json::from_str(lines[3]).unwrap();
    assert_eq!(summary["runs"], 3);
}

#[test]
fn simulate_is_reproducible_with_a_seed() {
    let dir = TempDir::new().unwrap();
    let run = || {
        overdue(&dir)
            .args(["--simulate", "2", "--seed", "42"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn invalid_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    overdue(&dir)
        .args(["--simulate", "1", "--missed-threshold", "0"])
        .assert()
        .failure();
}

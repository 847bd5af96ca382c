//! E2E CLI tests covering:
//! - Read commands over the built-in sample (`okr objectives`, `okr krs`, `okr show`)
//! - Dataset resolution from `--data`, `OKR_DATA`, and `.okr/config.toml`
//! - Structured errors with codes in text and JSON modes
//! - Event-log replay and dataset validation exit codes
//!
//! Each test runs the `okr` binary as a subprocess in an isolated temp directory.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

/// Build a Command targeting the okr binary, rooted in `dir` with no
/// user config or dataset override leaking in.
fn okr_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("okr"));
    cmd.current_dir(dir);
    cmd.env("OKR_LOG", "error");
    cmd.env("XDG_CONFIG_HOME", dir.join("xdg"));
    cmd.env("HOME", dir);
    cmd.env_remove("OKR_DATA");
    cmd.env_remove("FORMAT");
    cmd
}

fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(&path, body).expect("write fixture");
    path
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("okr should not crash");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

const TEAM_YAML: &str = r#"
period: 2026-Q1
objectives:
  - id: T-1
    title: Ship the dashboard
    status: On Track
    progress_pct: 30
  - id: T-2
    title: Harden the pipeline
    status: At Risk
    progress_pct: 55
key_results:
  - id: TK-1
    objective_id: T-2
    title: Flaky tests fixed
    status: At Risk
    target: 40
    current: 22
    delta_to_target_pct: -45
    series:
      - { period: 2026-01, value: 10, target: 20 }
      - { period: 2026-02, value: 22, target: 30 }
"#;

const DANGLING_JSON: &str = r#"{
  "period": "2025-12",
  "objectives": [{"id": "OBJ-1", "title": "Only objective"}],
  "key_results": [
    {"id": "KR-1", "objective_id": "OBJ-9", "title": "Orphan", "target": 1, "current": 0}
  ]
}"#;

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[test]
fn objectives_text_lists_sample() {
    let dir = TempDir::new().unwrap();
    okr_cmd(dir.path())
        .args(["objectives", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("SEL\tID\tSTATUS\tPROGRESS\tKRS\tTITLE\n"))
        .stdout(predicate::str::contains("*\tOBJ-1\tAt Risk\t62\t6\tIncrease Revenue"))
        .stdout(predicate::str::contains("\tOBJ-3\tOn Track\t78\t0\tMarket Reach"));
}

#[test]
fn objectives_status_filter_narrows_list() {
    let dir = TempDir::new().unwrap();
    okr_cmd(dir.path())
        .args(["objectives", "--status", "on track", "--format", "text"])
        .assert()
        .success()
        .stdout("SEL\tID\tSTATUS\tPROGRESS\tKRS\tTITLE\n\tOBJ-3\tOn Track\t78\t0\tMarket Reach\n");
}

#[test]
fn objectives_rejects_unknown_status() {
    let dir = TempDir::new().unwrap();
    okr_cmd(dir.path())
        .args(["objectives", "--status", "done"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected one of: On Track, At Risk, Off Track"));
}

#[test]
fn show_json_bars_carry_colors() {
    let dir = TempDir::new().unwrap();
    let json = stdout_json(okr_cmd(dir.path()).args(["show", "KR-3", "--json"]));
    let bars = json["chart"]["bars"].as_array().unwrap();
    assert!(bars.iter().all(|bar| bar["color"] == "#3B82F6"));
}

#[test]
fn krs_for_objective_without_key_results_prints_notice() {
    let dir = TempDir::new().unwrap();
    okr_cmd(dir.path())
        .args(["krs", "--objective", "OBJ-2", "--format", "text"])
        .assert()
        .success()
        .stdout("No Key Results defined for this Objective.\n");
}

#[test]
fn krs_json_has_six_cards_for_first_objective() {
    let dir = TempDir::new().unwrap();
    let json = stdout_json(okr_cmd(dir.path()).args(["krs", "--json"]));
    assert_eq!(json["objective_id"], "OBJ-1");
    let cards = json["key_results"].as_array().unwrap();
    assert_eq!(cards.len(), 6);
    assert_eq!(cards[0]["stats"][0], "Current: 38,000");
}

#[test]
fn unknown_objective_flag_is_an_error() {
    let dir = TempDir::new().unwrap();
    okr_cmd(dir.path())
        .args(["krs", "--objective", "OBJ-404", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E3001]"))
        .stderr(predicate::str::contains("okr objectives"));
}

#[test]
fn show_json_uses_last_period_target() {
    let dir = TempDir::new().unwrap();
    let json = stdout_json(okr_cmd(dir.path()).args(["show", "KR-3", "--json"]));
    assert_eq!(json["target_line_value"], 9000.0);
    assert_eq!(
        json["drawer_title"],
        "Upsell Revenue ($) — Owner: Jamal Habib  (At Risk)"
    );
}

#[test]
fn show_unknown_kr_fails_with_code() {
    let dir = TempDir::new().unwrap();
    let output = okr_cmd(dir.path())
        .args(["show", "KR-99", "--json"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let json: Value = serde_json::from_slice(&output.stderr).expect("JSON error on stderr");
    assert_eq!(json["error"]["error_code"], "E3002");
    assert!(
        json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("KR-99")
    );
}

// ---------------------------------------------------------------------------
// Dataset resolution
// ---------------------------------------------------------------------------

#[test]
fn data_flag_loads_yaml() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "team.yaml", TEAM_YAML);
    okr_cmd(dir.path())
        .args(["--data"])
        .arg(&path)
        .args(["krs", "-o", "T-2", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TK-1\tAt Risk\t22\t40\t-45%\tFlaky tests fixed"));
}

#[test]
fn env_var_selects_dataset() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "team.yaml", TEAM_YAML);
    let json = stdout_json(
        okr_cmd(dir.path())
            .env("OKR_DATA", &path)
            .args(["objectives", "--json"]),
    );
    assert_eq!(json[0]["id"], "T-1");
    assert_eq!(json[1]["kr_count"], 1);
}

#[test]
fn project_config_sets_dataset_and_default_objective() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "okrs/team.yaml", TEAM_YAML);
    write(
        dir.path(),
        ".okr/config.toml",
        "[dashboard]\ndataset = \"okrs/team.yaml\"\ndefault_objective = \"T-2\"\n",
    );
    let json = stdout_json(okr_cmd(dir.path()).args(["krs", "--json"]));
    assert_eq!(json["objective_id"], "T-2");
    assert_eq!(json["key_results"][0]["id"], "TK-1");
}

#[test]
fn malformed_project_config_fails_with_code() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), ".okr/config.toml", "[dashboard\n");
    okr_cmd(dir.path())
        .args(["objectives", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E1001]"));
}

#[test]
fn invalid_dataset_is_rejected_by_read_commands() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "bad.json", DANGLING_JSON);
    okr_cmd(dir.path())
        .arg("--data")
        .arg(&path)
        .args(["objectives", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2003"));
}

// ---------------------------------------------------------------------------
// Replay and validate
// ---------------------------------------------------------------------------

#[test]
fn replay_log_file_reports_final_state() {
    let dir = TempDir::new().unwrap();
    let log = write(
        dir.path(),
        "events.jsonl",
        concat!(
            "{\"kind\":\"objective_click\",\"id\":\"OBJ-3\",\"timestamp\":300}\n",
            "{\"kind\":\"objective_click\",\"id\":\"OBJ-2\",\"timestamp\":200}\n",
            "{\"kind\":\"open_kr_click\",\"id\":\"KR-2\",\"timestamp\":301}\n",
        ),
    );
    okr_cmd(dir.path())
        .arg("replay")
        .arg(&log)
        .args(["--format", "text"])
        .assert()
        .success()
        .stdout("OBJ-3\tKR-2\t\n");
}

#[test]
fn replay_reads_stdin() {
    let dir = TempDir::new().unwrap();
    let json = stdout_json(
        okr_cmd(dir.path())
            .args(["replay", "-", "--json"])
            .write_stdin("{\"kind\":\"open_kr_click\",\"id\":\"KR-4\",\"timestamp\":1}\n"),
    );
    assert_eq!(json["drawer"]["kr_id"], "KR-4");
    assert_eq!(json["active_objective_id"], "OBJ-1");
}

#[test]
fn replay_malformed_log_fails() {
    let dir = TempDir::new().unwrap();
    okr_cmd(dir.path())
        .args(["replay", "-", "--format", "text"])
        .write_stdin("not json\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("E4001"));
}

#[test]
fn validate_sample_is_ok() {
    let dir = TempDir::new().unwrap();
    okr_cmd(dir.path())
        .args(["validate", "--format", "text"])
        .assert()
        .success()
        .stdout("ok\n");
}

#[test]
fn validate_reports_dangling_reference_and_fails() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "bad.json", DANGLING_JSON);
    okr_cmd(dir.path())
        .arg("--data")
        .arg(&path)
        .args(["validate", "--format", "text"])
        .assert()
        .failure()
        .stdout(predicate::str::starts_with("error\tE2003\t"))
        .stdout(predicate::str::ends_with("invalid\n"))
        .stderr(predicate::str::contains("failed validation"));
}

// ---------------------------------------------------------------------------
// Misc
// ---------------------------------------------------------------------------

#[test]
fn completions_bash_generates_script() {
    let dir = TempDir::new().unwrap();
    okr_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_okr()"));
}

#[test]
fn ui_refuses_non_terminal_stdout() {
    let dir = TempDir::new().unwrap();
    okr_cmd(dir.path())
        .arg("ui")
        .assert()
        .failure()
        .stderr(predicate::str::contains("interactive terminal"));
}

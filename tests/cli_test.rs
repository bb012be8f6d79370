use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Command with an empty config so the user's own config never leaks in
fn takeoffcmd(dir: &TempDir) -> Command {
    let config = dir.path().join("config.yml");
    fs::write(&config, "").unwrap();

    let mut cmd = Command::cargo_bin("takeoffcmd").unwrap();
    cmd.arg("--config").arg(config);
    cmd
}

#[test]
fn test_parse_json_output() {
    let dir = TempDir::new().unwrap();
    takeoffcmd(&dir)
        .args(["--json", "--project-id", "p1", "parse", "Add", "drywall", "1050", "sf", "at", "$12.99"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"schemaVersion\": 1"))
        .stdout(predicate::str::contains("takeoff.add_item"))
        .stdout(predicate::str::contains("\"quantity\": 1050"));
}

#[test]
fn test_output_flag_overrides_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("text.yml");
    fs::write(&config, "output: text\n").unwrap();

    Command::cargo_bin("takeoffcmd")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .args(["--output", "json", "parse", "help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"schemaVersion\": 1"));

    takeoffcmd(&dir)
        .args(["--output", "xml", "parse", "help"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown output format"));
}

#[test]
fn test_parse_without_project_fails() {
    let dir = TempDir::new().unwrap();
    takeoffcmd(&dir)
        .args(["parse", "export proposal pdf"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Please open a project first."));
}

#[test]
fn test_parse_not_understood() {
    let dir = TempDir::new().unwrap();
    takeoffcmd(&dir)
        .args(["parse", "xyz", "nonsense"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("I didn't understand that command"));
}

#[test]
fn test_capabilities_lists_rules() {
    let dir = TempDir::new().unwrap();
    takeoffcmd(&dir)
        .arg("capabilities")
        .assert()
        .success()
        .stdout(predicate::str::contains("system.capabilities"))
        .stdout(predicate::str::contains("takeoff.add_item"));
}

#[test]
fn test_config_supplies_project() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("project.yml");
    fs::write(&config, "project_id: p7\noutput: json\n").unwrap();

    Command::cargo_bin("takeoffcmd")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .args(["parse", "export", "takeoff", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"which\": \"takeoff\""));
}

#[test]
fn test_bad_config_reports_error() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.yml");
    fs::write(&config, "output: xml\n").unwrap();

    Command::cargo_bin("takeoffcmd")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .arg("capabilities")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("loading config"));
}

#[test]
fn test_repl_open_changes_gating() {
    let dir = TempDir::new().unwrap();
    let transcript = dir.path().join("session.json");

    takeoffcmd(&dir)
        .args(["repl", "--transcript"])
        .arg(&transcript)
        .write_stdin("show qa issues\n:open p1\nshow qa issues\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Please open a project first."))
        .stdout(predicate::str::contains("opened project p1"))
        .stdout(predicate::str::contains("qa.show_issues"));

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&transcript).unwrap()).unwrap();
    let entries = saved["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["result"]["success"], false);
    assert_eq!(entries[1]["result"]["success"], true);
    assert_eq!(entries[1]["context"]["project_id"], "p1");
}

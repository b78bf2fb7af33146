//! ---
//! console_section: "15-testing-qa-runbook"
//! console_subsection: "integration-tests"
//! console_type: "source"
//! console_scope: "code"
//! console_description: "Command-line tests for the R-Console control CLI."
//! console_version: "v0.0.0-prealpha"
//! console_owner: "tbd"
//! ---
use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CONFIG: &str = r#"
[permissions]
catalog = ["*", "users:read", "users:write"]

[[routes]]
path = "/dashboard"
label = "仪表盘"
icon = "dashboard"

[[routes]]
path = "/users"
label = "用户管理"
required = ["users:read"]
order = 1

[[routes]]
path = "/users/new"
label = "新建用户"
required = ["users:write"]
parent = "/users"
"#;

fn write_config(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("console.toml");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

fn ctl() -> Command {
    let mut cmd = Command::cargo_bin("r-consolectl").unwrap();
    cmd.env_remove("R_CONSOLE_CONFIG");
    cmd
}

#[test]
fn routes_check_reports_counts() {
    let (_dir, path) = write_config(CONFIG);
    ctl()
        .args(["routes", "check", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 routes, 2 top-level"));
}

#[test]
fn routes_check_fails_on_dangling_parent() {
    let (_dir, path) = write_config(
        "[[routes]]\npath = \"/orphan\"\nlabel = \"孤儿\"\nparent = \"/ghost\"\n",
    );
    ctl()
        .args(["routes", "check", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("/ghost"));
}

#[test]
fn routes_list_prints_tree() {
    let (_dir, path) = write_config(CONFIG);
    ctl()
        .args(["routes", "list", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("  /users/new  新建用户  [users:write]"));
}

#[test]
fn menu_hides_child_without_permission() {
    let (_dir, path) = write_config(CONFIG);
    let output = ctl()
        .args(["menu", "--grant", "users:read", "--config"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());
    let menu: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(menu.as_array().unwrap().len(), 2);
    assert_eq!(menu[1]["path"], "/users");
    assert_eq!(menu[1]["children"].as_array().unwrap().len(), 0);
}

#[test]
fn authorize_anonymous_prints_login_url() {
    let (_dir, path) = write_config(CONFIG);
    let output = ctl()
        .args(["authorize", "--anonymous", "--path", "/users/new", "--config"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["decision"], "redirect_to_login");
    assert_eq!(report["login_url"], "/login?redirect=%2Fusers%2Fnew");
}

#[test]
fn authorize_unknown_path_is_not_found() {
    let (_dir, path) = write_config(CONFIG);
    ctl()
        .args(["authorize", "--grant", "*", "--path", "/ghost", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"not_found\""))
        .stderr(predicate::str::contains("no route registered for /ghost"));
}

#[test]
fn edit_applies_toggles_in_order() {
    let (_dir, path) = write_config(CONFIG);
    ctl()
        .args([
            "edit",
            "--start",
            "users:read",
            "--toggle",
            "*=on",
            "--toggle",
            "users:write=on",
            "--config",
        ])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("[\"*\"]\n[\"users:write\"]\n"))
        .stdout(predicate::str::contains("[x] users:write"))
        .stdout(predicate::str::contains("[ ] users:read"));
}

#[test]
fn logging_section_writes_rolling_file() {
    let dir = tempfile::tempdir().unwrap();
    let logs = dir.path().join("logs");
    let contents = format!(
        "[logging]\ndirectory = '{}'\nfile_prefix = \"audit\"\n{CONFIG}",
        logs.display()
    );
    let path = dir.path().join("console.toml");
    fs::write(&path, contents).unwrap();

    ctl()
        .env_remove("RUST_LOG")
        .env_remove("R_CONSOLE_LOG")
        .args([
            "authorize",
            "--grant",
            "users:read",
            "--user",
            "alice",
            "--path",
            "/users/new",
            "--config",
        ])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"forbidden\""))
        .stderr(predicate::str::contains("alice"));

    let log_file = fs::read_dir(&logs)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .find(|file| {
            file.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("audit.log"))
        })
        .expect("rolling log file under the configured directory");
    let written = fs::read_to_string(log_file).unwrap();
    assert!(written.contains("route registry published"));
    assert!(written.contains("\"user\":\"alice\""));
}

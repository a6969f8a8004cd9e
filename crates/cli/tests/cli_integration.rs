//! CLI integration tests for all subcommands.
//!
//! Uses `assert_cmd` to spawn the `formwright` binary and verify
//! exit codes, stdout content, and stderr content.
//!
//! Preview tests run from the workspace root so that paths to the shared
//! `fixtures/` directory resolve. Store tests point `--config` at a
//! temporary directory.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Locate the workspace root by walking up from CARGO_MANIFEST_DIR.
fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    // crates/cli -> workspace root is two levels up
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf()
}

/// Helper: create a Command for the `formwright` binary, rooted at workspace.
fn formwright() -> Command {
    let mut cmd = cargo_bin_cmd!("formwright");
    cmd.current_dir(workspace_root());
    cmd
}

/// A temp directory holding a config whose store lives inside it.
fn store_sandbox() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("formwright.toml");
    let store = tmp.path().join("store");
    fs::write(
        &config,
        format!("[store]\npath = {:?}\n", store.to_str().unwrap()),
    )
    .unwrap();
    (tmp, config)
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    formwright()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Formwright form definition toolkit"));
}

#[test]
fn version_exits_0() {
    formwright()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("formwright"));
}

// ──────────────────────────────────────────────
// 2. check
// ──────────────────────────────────────────────

#[test]
fn check_valid_form_exits_0() {
    formwright()
        .args(["check", "fixtures/signup.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: 8 field(s)"));
}

#[test]
fn check_chained_form_exits_1() {
    formwright()
        .args(["check", "fixtures/chained.json"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("itself derived"));
}

#[test]
fn check_json_output_lists_errors() {
    let out = formwright()
        .args(["--output", "json", "check", "fixtures/chained.json"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    let json = stdout_json(&out);
    assert_eq!(json["valid"], false);
    assert_eq!(json["errors"].as_array().unwrap().len(), 1);
}

#[test]
fn check_nonexistent_file_exits_1() {
    formwright()
        .args(["check", "nonexistent_form_xyz.json"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error reading file"));
}

// ──────────────────────────────────────────────
// 3. init-values and resolve
// ──────────────────────────────────────────────

#[test]
fn init_values_uses_defaults() {
    let out = formwright()
        .args(["--output", "json", "init-values", "fixtures/signup.json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let json = stdout_json(&out);
    assert_eq!(json["seats"], "1");
    assert_eq!(json["terms"], false);
    assert_eq!(json["age"], "");
}

#[test]
fn init_values_rejects_chained_form() {
    formwright()
        .args(["init-values", "fixtures/chained.json"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn resolve_computes_age_and_price() {
    let out = formwright()
        .args([
            "--output",
            "json",
            "resolve",
            "fixtures/signup.json",
            "--values",
            "fixtures/signup_values.json",
            "--today",
            "2024-06-15",
        ])
        .output()
        .unwrap();
    assert!(out.status.success());
    let json = stdout_json(&out);
    assert_eq!(json["values"]["age"], 34);
    assert_eq!(json["values"]["price"], 50);
    assert_eq!(json["values"]["seats"], "4");
    assert_eq!(json["changed"], true);
    assert!(json["problems"].as_array().unwrap().is_empty());
}

#[test]
fn resolve_day_before_birthday() {
    formwright()
        .args([
            "resolve",
            "fixtures/signup.json",
            "--values",
            "fixtures/signup_values.json",
            "--today",
            "2024-06-14",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("age = 33"));
}

#[test]
fn resolve_reports_division_by_zero_and_continues() {
    let tmp = TempDir::new().unwrap();
    let values = tmp.path().join("values.json");
    fs::write(&values, r#"{"n": 0}"#).unwrap();

    let out = formwright()
        .args(["--output", "json", "resolve", "fixtures/divide.json", "--values"])
        .arg(&values)
        .output()
        .unwrap();
    assert!(out.status.success());
    let json = stdout_json(&out);
    assert_eq!(json["values"]["double"], 0);
    assert_eq!(json["values"]["inverse"], "");
    assert_eq!(json["problems"][0]["fieldId"], "inverse");
    assert_eq!(json["problems"][0]["error"], "division by zero");
}

#[test]
fn resolve_bad_today_exits_1() {
    formwright()
        .args([
            "resolve",
            "fixtures/signup.json",
            "--values",
            "fixtures/signup_values.json",
            "--today",
            "15/06/2024",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid date"));
}

#[test]
fn resolve_today_from_config() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("formwright.toml");
    fs::write(&config, "[preview]\ntoday = \"2030-06-15\"\n").unwrap();

    formwright()
        .args(["resolve", "fixtures/signup.json", "--values", "fixtures/signup_values.json"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("age = 40"));
}

// ──────────────────────────────────────────────
// 4. validate
// ──────────────────────────────────────────────

#[test]
fn validate_filled_form_exits_0() {
    formwright()
        .args([
            "validate",
            "fixtures/signup.json",
            "--values",
            "fixtures/signup_values.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));
}

#[test]
fn validate_bad_values_exits_1_with_messages() {
    formwright()
        .args([
            "validate",
            "fixtures/signup.json",
            "--values",
            "fixtures/signup_invalid_values.json",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("name: Minimum length is 2 characters"))
        .stderr(predicate::str::contains("email: Please enter a valid email address"))
        .stderr(predicate::str::contains("dob: Date of birth is required"))
        .stderr(predicate::str::contains("seats: Maximum value is 10"));
}

#[test]
fn validate_json_output() {
    let out = formwright()
        .args([
            "--output",
            "json",
            "validate",
            "fixtures/signup.json",
            "--values",
            "fixtures/signup_invalid_values.json",
        ])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    let json = stdout_json(&out);
    assert_eq!(json["hasErrors"], true);
    assert_eq!(json["errors"].as_object().unwrap().len(), 4);
    assert!(json["errors"].get("age").is_none());
}

// ──────────────────────────────────────────────
// 5. formula
// ──────────────────────────────────────────────

#[test]
fn formula_valid_exits_0() {
    formwright()
        .args(["formula", "(value - 32) * 5 / 9", "--parent-type", "number"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok"));
}

#[test]
fn formula_type_mismatch_exits_1() {
    formwright()
        .args(["formula", "age", "--parent-type", "number"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid formula"));
}

#[test]
fn formula_with_code_exits_1() {
    formwright()
        .args(["formula", "alert(value)", "--parent-type", "number"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn formula_unknown_parent_type_is_usage_error() {
    formwright()
        .args(["formula", "value", "--parent-type", "email"])
        .assert()
        .failure()
        .code(2);
}

// ──────────────────────────────────────────────
// 6. save / list / show / delete
// ──────────────────────────────────────────────

#[test]
fn store_lifecycle() {
    let (_tmp, config) = store_sandbox();
    let root = workspace_root();
    let form = root.join("fixtures/signup.json");

    let out = formwright()
        .arg("--config")
        .arg(&config)
        .args(["--output", "json", "save", "--name", "  Signup  "])
        .arg(&form)
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let saved = stdout_json(&out);
    assert_eq!(saved["name"], "Signup");
    assert_eq!(saved["createdAt"], saved["updatedAt"]);
    let id = saved["id"].as_str().unwrap().to_string();

    // Same name again: same id.
    let out = formwright()
        .arg("--config")
        .arg(&config)
        .args(["--output", "json", "save", "--name", "Signup"])
        .arg(&form)
        .output()
        .unwrap();
    assert_eq!(stdout_json(&out)["id"], id.as_str());

    let out = formwright()
        .arg("--config")
        .arg(&config)
        .args(["--output", "json", "list"])
        .output()
        .unwrap();
    let list = stdout_json(&out);
    assert_eq!(list.as_array().unwrap().len(), 1);

    formwright()
        .arg("--config")
        .arg(&config)
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Signup"))
        .stdout(predicate::str::contains("<- dob: age"));

    formwright()
        .arg("--config")
        .arg(&config)
        .args(["delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("deleted"));

    formwright()
        .arg("--config")
        .arg(&config)
        .args(["show", &id])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("form not found"));
}

#[test]
fn saved_form_file_is_accepted_as_form_input() {
    formwright()
        .args(["check", "fixtures/divide.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: 3 field(s)"));
}

#[test]
fn save_chained_form_exits_1() {
    let (_tmp, config) = store_sandbox();
    formwright()
        .arg("--config")
        .arg(&config)
        .args(["save", "fixtures/chained.json", "--name", "Chain"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("integrity"));
}

#[test]
fn save_blank_name_exits_1() {
    let (_tmp, config) = store_sandbox();
    formwright()
        .arg("--config")
        .arg(&config)
        .args(["save", "fixtures/signup.json", "--name", "   "])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("blank"));
}

#[test]
fn list_empty_store() {
    let (_tmp, config) = store_sandbox();
    formwright()
        .arg("--config")
        .arg(&config)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("no saved forms"));
}

#[test]
fn missing_config_file_exits_1() {
    formwright()
        .args(["--config", "no/such/formwright.toml", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("could not read"));
}

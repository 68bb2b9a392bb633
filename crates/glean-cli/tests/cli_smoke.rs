use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use serde_json::Value;
use tempfile::TempDir;

const SAMPLE: &str = "Short\nThe Quiet Economics of Tea\nAuthor: Jane Doe\n\nBody text.";

/// Run `glean` inside `dir` with an environment that ignores the caller's
/// config files and variables.
fn glean(dir: &Path, args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_glean"));
    for (key, _) in std::env::vars() {
        if key.starts_with("GLEAN_") || key.starts_with("OPENAI_") {
            command.env_remove(key);
        }
    }
    command
        .current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg"))
        .env("GLEAN_LLM__API_KEY", "sk-test")
        .env("GLEAN_LLM__API_BASE", "http://127.0.0.1:9")
        .args(args)
        .output()
        .expect("glean binary should run")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|error| {
        panic!(
            "stdout is not json ({error}); stderr={}",
            String::from_utf8_lossy(&output.stderr)
        )
    })
}

fn write_sample(dir: &Path) -> String {
    let path = dir.join("essay.txt");
    std::fs::write(&path, SAMPLE).expect("write sample");
    path.to_string_lossy().into_owned()
}

#[test]
fn article_lifecycle() {
    let dir = TempDir::new().unwrap();
    let file = write_sample(dir.path());

    let added = glean(dir.path(), &["article", "add", &file]);
    assert!(added.status.success(), "{}", String::from_utf8_lossy(&added.stderr));
    let summary = stdout_json(&added);
    assert_eq!(summary["title"], "The Quiet Economics of Tea");
    assert_eq!(summary["author"], "Jane Doe");
    let id = summary["id"].as_i64().unwrap();
    assert!(dir.path().join(".glean/glean.db").exists());

    let listed = stdout_json(&glean(dir.path(), &["article", "list"]));
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert!(listed[0].get("content").is_none());

    let fetched = stdout_json(&glean(dir.path(), &["article", "get", &id.to_string()]));
    assert_eq!(fetched["content"], SAMPLE);

    let deleted = stdout_json(&glean(dir.path(), &["article", "delete", &id.to_string()]));
    assert_eq!(deleted["deleted"], true);

    let missing = glean(dir.path(), &["article", "get", &id.to_string()]);
    assert!(!missing.status.success());
}

#[test]
fn duplicate_title_is_rejected() {
    let dir = TempDir::new().unwrap();
    let file = write_sample(dir.path());

    assert!(glean(dir.path(), &["article", "add", &file]).status.success());
    let again = glean(dir.path(), &["article", "add", &file]);

    assert!(!again.status.success());
    let stderr = String::from_utf8_lossy(&again.stderr);
    assert!(stderr.contains("glean error:"), "{stderr}");
    assert!(stderr.contains("already exists"), "{stderr}");
}

#[test]
fn non_txt_upload_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.md");
    std::fs::write(&path, "# notes").unwrap();

    let output = glean(dir.path(), &["article", "add", &path.to_string_lossy()]);
    assert!(!output.status.success());
}

#[test]
fn unknown_task_reports_pending() {
    let dir = TempDir::new().unwrap();
    let output = glean(dir.path(), &["analysis", "status", "task_99_1700000000"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let report = stdout_json(&output);
    assert_eq!(report["status"], "pending");
    assert_eq!(report["progress"], 0);
}

#[test]
fn malformed_task_id_fails() {
    let dir = TempDir::new().unwrap();
    let output = glean(dir.path(), &["analysis", "status", "bogus"]);
    assert!(!output.status.success());
}

#[test]
fn analyze_missing_article_is_rejected_without_state() {
    let dir = TempDir::new().unwrap();
    let output = glean(dir.path(), &["analyze", "5"]);

    assert!(!output.status.success());
    let response = stdout_json(&output);
    assert_eq!(response["submitted"], Value::Array(Vec::new()));
    assert_eq!(response["rejected"][0]["article_id"], 5);

    let result = glean(dir.path(), &["analysis", "get", "5"]);
    assert!(!result.status.success());
}

#[test]
fn schema_needs_no_project() {
    let dir = TempDir::new().unwrap();
    let output = glean(dir.path(), &["schema", "status-report"]);

    assert!(output.status.success());
    let schema = stdout_json(&output);
    assert!(schema["properties"]["task_id"].is_object());
    assert!(!dir.path().join(".glean").exists());
}

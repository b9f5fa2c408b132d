//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own data directory and
//! checks the JSON it prints.

use serde_json::Value;
use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_habitmanager-cli"))
        .env("HABITMANAGER_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn run_json(data_dir: &Path, args: &[&str]) -> Value {
    let (code, stdout, stderr) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("stdout is JSON")
}

fn add_habit(data_dir: &Path, name: &str) -> String {
    let out = run_json(data_dir, &["habit", "add", name]);
    out["result"]["id"].as_str().unwrap().to_string()
}

#[test]
fn test_habit_add_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_habit(dir.path(), "Read");

    let list = run_json(dir.path(), &["habit", "list"]);
    let habits = list.as_array().unwrap();
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0]["id"], id.as_str());
    assert_eq!(habits[0]["name"], "Read");
}

#[test]
fn test_habit_complete_awards_points() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_habit(dir.path(), "Walk");

    let out = run_json(dir.path(), &["habit", "complete", &id]);
    assert_eq!(out["result"]["status"], "completed");
    assert_eq!(out["result"]["streak"], 1);

    let profile = run_json(dir.path(), &["profile"]);
    // medium habit plus first_habit and consistency_king
    assert_eq!(profile["user"]["totalPoints"], 170);
    assert_eq!(profile["user"]["level"], 2);
}

#[test]
fn test_habit_complete_twice_fails() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_habit(dir.path(), "Stretch");

    run_json(dir.path(), &["habit", "complete", &id]);
    let (code, _, stderr) = run_cli(dir.path(), &["habit", "complete", &id]);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"), "stderr: {stderr}");
}

#[test]
fn test_habit_unknown_id_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["habit", "complete", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("nope"), "stderr: {stderr}");
}

#[test]
fn test_templates_apply() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_json(dir.path(), &["habit", "apply-template", "morning-routine"]);
    assert_eq!(out["result"].as_array().unwrap().len(), 4);

    let list = run_json(dir.path(), &["habit", "list"]);
    assert_eq!(list.as_array().unwrap().len(), 4);
}

#[test]
fn test_mood_record_replaces_today() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["mood", "record", "2"]);
    run_json(dir.path(), &["mood", "record", "4"]);

    let moods = run_json(dir.path(), &["mood", "list"]);
    let moods = moods.as_array().unwrap();
    assert_eq!(moods.len(), 1);
    assert_eq!(moods[0]["mood"], 4);
}

#[test]
fn test_mood_out_of_range_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["mood", "record", "9"]);
    assert_eq!(code, 1);
}

#[test]
fn test_task_create_and_toggle() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_json(dir.path(), &["task", "create", "Write report"]);
    let id = out["result"]["id"].as_str().unwrap().to_string();

    run_json(dir.path(), &["task", "toggle", &id]);
    let task = run_json(dir.path(), &["task", "get", &id]);
    assert_eq!(task["completed"], true);
}

#[test]
fn test_data_export_import_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    add_habit(dir.path(), "Meditate");
    let backup = dir.path().join("backup.json");
    let backup_str = backup.to_str().unwrap();

    let out = run_json(dir.path(), &["data", "export", "--out", backup_str]);
    assert_eq!(out["habits"], 1);

    run_json(dir.path(), &["data", "reset", "--yes"]);
    assert!(run_json(dir.path(), &["habit", "list"])
        .as_array()
        .unwrap()
        .is_empty());

    run_json(dir.path(), &["data", "import", backup_str]);
    let list = run_json(dir.path(), &["habit", "list"]);
    assert_eq!(list[0]["name"], "Meditate");
}

#[test]
fn test_data_import_rejects_incomplete_backup() {
    let dir = tempfile::tempdir().unwrap();
    add_habit(dir.path(), "Keep me");
    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, r#"{"version":"1.0","habits":[]}"#).unwrap();

    let (code, _, _) = run_cli(dir.path(), &["data", "import", bad.to_str().unwrap()]);
    assert_eq!(code, 1);
    let list = run_json(dir.path(), &["habit", "list"]);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[test]
fn test_data_reset_requires_yes() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["data", "reset"]);
    assert_eq!(code, 1);
}

#[test]
fn test_config_set_and_get() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["config", "set", "timer.work_minutes", "50"]);
    assert_eq!(code, 0);

    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "timer.work_minutes"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "50");
}

#[test]
fn test_config_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["config", "get", "no.such.key"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_timer_start_pause_status() {
    let dir = tempfile::tempdir().unwrap();
    let started = run_json(dir.path(), &["timer", "start"]);
    assert_eq!(started["type"], "TimerStarted");

    let paused = run_json(dir.path(), &["timer", "pause"]);
    assert_eq!(paused["type"], "TimerPaused");

    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["state"], "paused");
    assert_eq!(status["phase"], "work");
}

#[test]
fn test_stats_and_achievements_on_empty_data() {
    let dir = tempfile::tempdir().unwrap();
    let summary = run_json(dir.path(), &["stats", "summary"]);
    assert_eq!(summary["summary"]["total_completions"], 0);

    let heatmap = run_json(dir.path(), &["stats", "heatmap"]);
    assert_eq!(heatmap.as_array().unwrap().len(), 366);

    let board = run_json(dir.path(), &["achievements"]);
    assert!(!board.as_array().unwrap().is_empty());
}

#[test]
fn test_task_calendar_and_daily_quote() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["task", "create", "Plan week"]);

    let cal = run_json(dir.path(), &["task", "calendar"]);
    let days = cal["days"].as_array().unwrap();
    assert!(days.len() >= 28);
    let today = days.iter().find(|d| d["is_today"] == true).unwrap();
    assert_eq!(today["tasks"][0]["title"], "Plan week");

    let quote = run_json(dir.path(), &["stats", "quote"]);
    assert!(quote["text"].as_str().is_some_and(|t| !t.is_empty()));
}

#[test]
fn test_youtube_goal_reports_video_id() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_json(
        dir.path(),
        &[
            "goal",
            "add",
            "Watch talk",
            "--kind",
            "youtube",
            "--url",
            "https://youtu.be/dQw4w9WgXcQ",
        ],
    );
    let id = out["result"]["id"].as_str().unwrap().to_string();

    let goal = run_json(dir.path(), &["goal", "get", &id]);
    assert_eq!(goal["videoId"], "dQw4w9WgXcQ");
}

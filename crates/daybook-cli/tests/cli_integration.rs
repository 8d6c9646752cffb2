//! Integration tests for daybook-cli
//!
//! These tests verify the CLI commands work end-to-end.
//! Tests run serially to avoid database lock conflicts.

use assert_cmd::Command;
use chrono::{Duration, Utc};
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

/// Get a Command for the daybook binary
fn daybook() -> Command {
    Command::cargo_bin("daybook").unwrap()
}

/// Temp workspace with its own database and config file
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.json"), r#"{"utc_dates": true}"#).unwrap();
        Self { dir }
    }

    fn cmd(&self) -> Command {
        let mut cmd = daybook();
        cmd.env("DAYBOOK_DB_PATH", self.dir.path().join("daybook.db"))
            .env("DAYBOOK_CONFIG_PATH", self.dir.path().join("config.json"))
            .env_remove("DAYBOOK_USER");
        cmd
    }

    /// Write a snapshot dated relative to now and import it
    fn import_sample(&self) {
        self.import(&sample_snapshot())
            .success()
            .stdout(predicate::str::contains("Imported 11 records for user u1"));
    }

    fn import(&self, snapshot: &serde_json::Value) -> assert_cmd::assert::Assert {
        let path = self.dir.path().join("snapshot.json");
        std::fs::write(&path, serde_json::to_string(snapshot).unwrap()).unwrap();
        self.cmd().args(["import", path.to_str().unwrap()]).assert()
    }
}

fn sample_snapshot() -> serde_json::Value {
    let now = Utc::now();
    let today = now.date_naive();
    serde_json::json!({
        "user": { "id": "u1", "email": "ada@example.com" },
        "tasks": [
            { "id": "t1", "title": "Write quarterly report", "status": "completed",
              "deadline": today, "created_at": now - Duration::minutes(10) },
            { "id": "t2", "title": "Book flights", "status": "todo",
              "description": "cheap ones", "created_at": now - Duration::days(2) },
            { "id": "t3", "title": "Review budget", "status": "in-progress",
              "created_at": now - Duration::days(20) }
        ],
        "events": [
            { "id": "e1", "title": "Team sync", "start_time": now, "event_type": "meeting" }
        ],
        "files": [
            { "id": "f1", "file_name": "report-draft.pdf", "file_url": "https://files.example.com/f1",
              "file_size": 1536, "file_type": "application/pdf", "created_at": now - Duration::minutes(5) }
        ],
        "links": [
            { "id": "l1", "url": "https://www.rust-lang.org/learn", "title": "Learn Rust",
              "created_at": now - Duration::hours(1) }
        ],
        "spending": [
            { "id": "s1", "amount": 12.5, "category": "Food", "spend_date": today },
            { "id": "s2", "amount": 80.0, "category": "Travel", "spend_date": today - Duration::days(3) }
        ],
        "daily_logs": [
            { "id": "d1", "title": "Planning day", "log_date": today,
              "description": "Sketched the roadmap",
              "file_url": "https://files.example.com/roadmap.pdf", "file_name": "roadmap.pdf",
              "file_size": 1536, "created_at": now - Duration::minutes(30) },
            { "id": "d2", "title": "Quiet day", "log_date": today - Duration::days(1),
              "created_at": now - Duration::days(1) }
        ],
        "analytics": [
            { "id": "a1", "event_type": "task_created", "event_data": { "title": "Book flights" },
              "created_at": now - Duration::days(2) }
        ]
    })
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
#[serial]
fn test_cli_help() {
    daybook()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("daybook"))
        .stdout(predicate::str::contains("COMMAND").or(predicate::str::contains("Commands")));
}

#[test]
#[serial]
fn test_cli_version() {
    daybook()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("daybook"));
}

#[test]
#[serial]
fn test_dashboard_help() {
    daybook()
        .args(["dashboard", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("activity"))
        .stdout(predicate::str::contains("weekly"));
}

#[test]
#[serial]
fn test_calendar_help() {
    daybook()
        .args(["calendar", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--month"));
}

#[test]
#[serial]
fn test_config_set_help() {
    daybook()
        .args(["config", "set", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("set"));
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
#[serial]
fn test_invalid_command() {
    daybook()
        .arg("invalid-command-that-does-not-exist")
        .assert()
        .failure();
}

#[test]
#[serial]
fn test_views_need_a_user() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["dashboard", "stats"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No user found"));
}

#[test]
#[serial]
fn test_invalid_month_rejected() {
    let ws = Workspace::new();
    ws.import_sample();
    ws.cmd()
        .args(["calendar", "--month", "2024-13"])
        .assert()
        .failure();
}

#[test]
#[serial]
fn test_unknown_task_filter_rejected() {
    let ws = Workspace::new();
    ws.import_sample();
    ws.cmd()
        .args(["tasks", "--filter", "archived"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown task filter"));
}

// =============================================================================
// End-to-end views
// =============================================================================

#[test]
#[serial]
fn test_dashboard_stats_json() {
    let ws = Workspace::new();
    ws.import_sample();
    let output = ws.cmd().args(["--format", "json", "dashboard", "stats"]).output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["stats"]["completed_tasks"], 1);
    assert_eq!(value["stats"]["in_progress_tasks"], 1);
    assert_eq!(value["stats"]["todays_spending"], 12.5);
    assert_eq!(value["totals"]["events"], 1);
}

#[test]
#[serial]
fn test_activity_feed_order() {
    let ws = Workspace::new();
    ws.import_sample();
    let output = ws.cmd().args(["--format", "json", "dashboard", "activity"]).output().unwrap();
    assert!(output.status.success());
    let feed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<&str> = feed
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["f1", "t1", "l1", "t2", "t3"]);
    assert_eq!(feed[2]["subtitle"], "www.rust-lang.org");
}

#[test]
#[serial]
fn test_weekly_table() {
    let ws = Workspace::new();
    ws.import_sample();
    ws.cmd()
        .args(["dashboard", "weekly"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Weekly Performance"))
        .stdout(predicate::str::contains("Most productive day"));
}

#[test]
#[serial]
fn test_calendar_day_listing() {
    let ws = Workspace::new();
    ws.import_sample();
    ws.cmd()
        .args(["calendar", "--day", "today"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Team sync"))
        .stdout(predicate::str::contains("Write quarterly report"));
}

#[test]
#[serial]
fn test_calendar_month_json() {
    let ws = Workspace::new();
    ws.import_sample();
    let output = ws.cmd().args(["--format", "json", "calendar"]).output().unwrap();
    assert!(output.status.success());
    let grid: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let day_cells = grid["cells"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["kind"] == "day")
        .count();
    assert_eq!(day_cells as u64, grid["day_count"].as_u64().unwrap());
}

#[test]
#[serial]
fn test_calendar_shift_wraps_year() {
    let ws = Workspace::new();
    ws.import_sample();
    let output = ws
        .cmd()
        .args(["--format", "json", "calendar", "--month", "2024-12", "--shift", "1"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let grid: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(grid["year"], 2025);
    assert_eq!(grid["month"], 1);
    assert_eq!(grid["leading_blanks"], 3);
}

#[test]
#[serial]
fn test_logs_listing() {
    let ws = Workspace::new();
    ws.import_sample();
    ws.cmd()
        .arg("logs")
        .assert()
        .success()
        .stdout(predicate::str::contains("Planning day"))
        .stdout(predicate::str::contains("file: roadmap.pdf (1.5 KB)"))
        .stdout(predicate::str::contains("Quiet day"));
}

#[test]
#[serial]
fn test_logs_for_one_day_json() {
    let ws = Workspace::new();
    ws.import_sample();
    let output = ws.cmd().args(["--format", "json", "logs", "--date", "yesterday"]).output().unwrap();
    assert!(output.status.success());
    let logs: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let logs = logs.as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["id"], "d2");
    assert!(logs[0]["attachments"].as_array().unwrap().is_empty());
}

#[test]
#[serial]
fn test_reimport_drops_deleted_records() {
    let ws = Workspace::new();
    ws.import_sample();

    let mut snapshot = sample_snapshot();
    snapshot["tasks"].as_array_mut().unwrap().retain(|t| t["id"] != "t3");
    snapshot["spending"] = serde_json::json!([]);
    ws.import(&snapshot)
        .success()
        .stdout(predicate::str::contains("Removed 1 tasks, 2 spending_logs"));

    let output = ws.cmd().args(["--format", "json", "tasks"]).output().unwrap();
    let tasks: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tasks["tasks"].as_array().unwrap().len(), 2);
}

#[test]
#[serial]
fn test_import_refuses_another_users_ids() {
    let ws = Workspace::new();
    ws.import_sample();

    let mut snapshot = sample_snapshot();
    snapshot["user"] = serde_json::json!({ "id": "u2", "email": "grace@example.com" });
    ws.import(&snapshot)
        .failure()
        .stderr(predicate::str::contains("belongs to another user"));

    ws.cmd()
        .args(["--user", "u1", "tasks"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Write quarterly report"));
}

#[test]
#[serial]
fn test_spending_summary() {
    let ws = Workspace::new();
    ws.import_sample();
    ws.cmd()
        .arg("spending")
        .assert()
        .success()
        .stdout(predicate::str::contains("₹92.50"))
        .stdout(predicate::str::contains("Travel"));
}

#[test]
#[serial]
fn test_analytics_labels() {
    let ws = Workspace::new();
    ws.import_sample();
    ws.cmd()
        .arg("analytics")
        .assert()
        .success()
        .stdout(predicate::str::contains("Task Created"));
}

#[test]
#[serial]
fn test_tasks_filter() {
    let ws = Workspace::new();
    ws.import_sample();
    ws.cmd()
        .args(["tasks", "--filter", "active"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Book flights"))
        .stdout(predicate::str::contains("Review budget").not());
}

#[test]
#[serial]
fn test_search_across_collections() {
    let ws = Workspace::new();
    ws.import_sample();
    let output = ws.cmd().args(["--format", "json", "search", "REPORT"]).output().unwrap();
    assert!(output.status.success());
    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(results["tasks"].as_array().unwrap().len(), 1);
    assert_eq!(results["files"].as_array().unwrap().len(), 1);
    assert_eq!(results["links"].as_array().unwrap().len(), 0);
}

#[test]
#[serial]
fn test_config_set_and_get() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["config", "set", "max_items_per_cell", "3"])
        .assert()
        .success();
    ws.cmd()
        .args(["config", "get", "max_items_per_cell"])
        .assert()
        .success()
        .stdout(predicate::str::contains("max_items_per_cell = 3"));
    ws.cmd()
        .args(["config", "set", "max_items_per_cell", "lots"])
        .assert()
        .failure();
}

#[test]
#[serial]
fn test_currency_setting() {
    let ws = Workspace::new();
    ws.import_sample();
    ws.cmd().args(["config", "set", "currency", "$"]).assert().success();
    ws.cmd()
        .arg("spending")
        .assert()
        .success()
        .stdout(predicate::str::contains("$92.50"));
}

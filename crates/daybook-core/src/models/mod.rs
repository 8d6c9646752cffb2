//! Data models for the Daybook application
//!
//! Every record is owned by one user account and is created, edited and
//! deleted by the record store's owner. The dashboard only reads copies.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User account the records belong to
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserAccount {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Task status as stored by the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Completed,
    Deferred,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Deferred => "deferred",
        }
    }

    /// Next status when the task list toggle is clicked.
    ///
    /// `todo -> in-progress -> completed -> todo`; a deferred task goes back
    /// to `todo`. Nothing here prevents other transitions.
    pub fn cycle(&self) -> Self {
        match self {
            TaskStatus::Todo => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Completed,
            TaskStatus::Completed | TaskStatus::Deferred => TaskStatus::Todo,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "in-progress" | "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            "deferred" => Ok(TaskStatus::Deferred),
            _ => Err(format!("Unknown task status: {}", s)),
        }
    }
}

/// Task model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    #[sqlx(json)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

/// Default colour for calendar events
pub const DEFAULT_EVENT_COLOR: &str = "#3B82F6";

fn default_event_type() -> String {
    "event".to_string()
}

fn default_event_color() -> String {
    DEFAULT_EVENT_COLOR.to_string()
}

/// Calendar event model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CalendarEvent {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default = "default_event_type")]
    pub event_type: String,   // "event", "meeting", "reminder", "deadline"
    #[serde(default = "default_event_color")]
    pub color: String,
    #[serde(default)]
    pub is_all_day: bool,
    pub task_id: Option<String>,
}

impl CalendarEvent {
    /// False when an end time is present and precedes the start time.
    pub fn has_valid_span(&self) -> bool {
        self.end_time.map_or(true, |end| end >= self.start_time)
    }
}

/// Uploaded file metadata (the bytes live in object storage)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FileRecord {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub file_name: String,
    pub file_url: String,
    pub file_size: i64,
    pub file_type: String,    // MIME type
    pub created_at: DateTime<Utc>,
}

/// Bookmarked link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Link {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    #[sqlx(json)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Title shown in lists; blank titles read as "Untitled Link".
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => "Untitled Link",
        }
    }
}

/// Daily journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DailyLogEntry {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub log_date: NaiveDate,
    pub image_url: Option<String>,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub video_url: Option<String>,
    pub video_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DailyLogEntry {
    pub fn has_attachments(&self) -> bool {
        self.image_url.is_some() || self.file_url.is_some() || self.video_url.is_some()
    }
}

/// Spending category, the fixed list offered by the expense form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum SpendingCategory {
    Food,
    Travel,
    Bills,
    Shopping,
    Others,
}

impl SpendingCategory {
    pub const ALL: [SpendingCategory; 5] = [
        SpendingCategory::Food,
        SpendingCategory::Travel,
        SpendingCategory::Bills,
        SpendingCategory::Shopping,
        SpendingCategory::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpendingCategory::Food => "Food",
            SpendingCategory::Travel => "Travel",
            SpendingCategory::Bills => "Bills",
            SpendingCategory::Shopping => "Shopping",
            SpendingCategory::Others => "Others",
        }
    }
}

impl std::fmt::Display for SpendingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SpendingCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SpendingCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown spending category: {}", s))
    }
}

/// Expense log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SpendingEntry {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub amount: f64,
    pub category: SpendingCategory,
    pub description: Option<String>,
    pub spend_date: NaiveDate,
}

/// Analytics event recorded by the application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AnalyticsEvent {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub event_type: String,
    #[serde(default)]
    #[sqlx(json)]
    pub event_data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Entity collections known to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Task,
    CalendarEvent,
    File,
    Link,
    DailyLog,
    Spending,
    Analytics,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Task,
        EntityKind::CalendarEvent,
        EntityKind::File,
        EntityKind::Link,
        EntityKind::DailyLog,
        EntityKind::Spending,
        EntityKind::Analytics,
    ];

    /// Backing table name
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Task => "tasks",
            EntityKind::CalendarEvent => "calendar_events",
            EntityKind::File => "files",
            EntityKind::Link => "links",
            EntityKind::DailyLog => "daily_logs",
            EntityKind::Spending => "spending_logs",
            EntityKind::Analytics => "user_analytics",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

/// A user's records as exported from the remote store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub user: UserAccount,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub events: Vec<CalendarEvent>,
    #[serde(default)]
    pub files: Vec<FileRecord>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub daily_logs: Vec<DailyLogEntry>,
    #[serde(default)]
    pub spending: Vec<SpendingEntry>,
    #[serde(default)]
    pub analytics: Vec<AnalyticsEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_task_status_round_trips_kebab_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        assert_eq!("in-progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert!("done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_task_status_cycle() {
        assert_eq!(TaskStatus::Todo.cycle(), TaskStatus::InProgress);
        assert_eq!(TaskStatus::InProgress.cycle(), TaskStatus::Completed);
        assert_eq!(TaskStatus::Completed.cycle(), TaskStatus::Todo);
        assert_eq!(TaskStatus::Deferred.cycle(), TaskStatus::Todo);
    }

    #[test]
    fn test_spending_category_parse() {
        assert_eq!("food".parse::<SpendingCategory>().unwrap(), SpendingCategory::Food);
        assert_eq!("Others".parse::<SpendingCategory>().unwrap(), SpendingCategory::Others);
        assert!("Rent".parse::<SpendingCategory>().is_err());
    }

    #[test]
    fn test_event_span_validity() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let mut event = CalendarEvent {
            id: "e1".to_string(),
            user_id: "u1".to_string(),
            title: "Standup".to_string(),
            description: None,
            start_time: start,
            end_time: None,
            event_type: "meeting".to_string(),
            color: DEFAULT_EVENT_COLOR.to_string(),
            is_all_day: false,
            task_id: None,
        };
        assert!(event.has_valid_span());
        event.end_time = Some(start - chrono::Duration::hours(1));
        assert!(!event.has_valid_span());
    }

    #[test]
    fn test_link_display_title() {
        let mut link = Link {
            id: "l1".to_string(),
            user_id: "u1".to_string(),
            url: "https://example.com".to_string(),
            title: None,
            description: None,
            tags: vec![],
            created_at: Utc::now(),
        };
        assert_eq!(link.display_title(), "Untitled Link");
        link.title = Some("Example".to_string());
        assert_eq!(link.display_title(), "Example");
    }

    #[test]
    fn test_snapshot_defaults_missing_collections() {
        let json = r#"{"user": {"id": "u1", "email": "a@b.c", "display_name": null}}"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.user.id, "u1");
        assert!(snapshot.tasks.is_empty());
        assert!(snapshot.analytics.is_empty());
    }
}

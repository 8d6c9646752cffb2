//! Recent activity feed
//!
//! Merges the newest tasks, file uploads and saved links into one
//! reverse-chronological feed for the dashboard sidebar.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::models::{FileRecord, Link, Task};

/// Default cap on the merged feed
pub const DEFAULT_TOTAL_ACTIVITY_CAP: usize = 5;

/// How many items each source may contribute before merging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCaps {
    pub tasks: usize,
    pub files: usize,
    pub links: usize,
}

impl Default for SourceCaps {
    fn default() -> Self {
        Self {
            tasks: 3,
            files: 2,
            links: 2,
        }
    }
}

/// Where an activity item came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivitySource {
    Task,
    File,
    Link,
}

impl std::fmt::Display for ActivitySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivitySource::Task => write!(f, "task"),
            ActivitySource::File => write!(f, "file"),
            ActivitySource::Link => write!(f, "link"),
        }
    }
}

/// One row of the activity feed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityItem {
    pub id: String,
    pub source: ActivitySource,
    pub title: String,
    pub subtitle: String,
    pub timestamp: DateTime<Utc>,
    /// Set for completed tasks so the renderer can pick a check mark
    pub completed: bool,
}

/// Hostname of a link URL, or the raw URL when it does not parse.
pub fn link_hostname(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => host.to_string(),
            None => raw.to_string(),
        },
        Err(e) => {
            log::debug!("Unparseable link URL {:?}: {}", raw, e);
            raw.to_string()
        }
    }
}

/// Merge the heads of three pre-sorted (newest first) sources.
///
/// Takes at most `caps.*` items from each source, tags them, sorts the
/// union newest first (stable, so ties keep task, file, link order) and
/// keeps `total_cap` items.
pub fn merge_recent_activity(
    tasks: &[Task],
    files: &[FileRecord],
    links: &[Link],
    caps: &SourceCaps,
    total_cap: usize,
) -> Vec<ActivityItem> {
    let task_items = tasks.iter().take(caps.tasks).map(|task| ActivityItem {
        id: task.id.clone(),
        source: ActivitySource::Task,
        title: task.title.clone(),
        subtitle: task.status.to_string(),
        timestamp: task.created_at,
        completed: task.is_completed(),
    });

    let file_items = files.iter().take(caps.files).map(|file| ActivityItem {
        id: file.id.clone(),
        source: ActivitySource::File,
        title: file.file_name.clone(),
        subtitle: "File uploaded".to_string(),
        timestamp: file.created_at,
        completed: false,
    });

    let link_items = links.iter().take(caps.links).map(|link| ActivityItem {
        id: link.id.clone(),
        source: ActivitySource::Link,
        title: link.display_title().to_string(),
        subtitle: link_hostname(&link.url),
        timestamp: link.created_at,
        completed: false,
    });

    let mut items: Vec<ActivityItem> = task_items.chain(file_items).chain(link_items).collect();
    items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    items.truncate(total_cap);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, hour, minute, 0).unwrap()
    }

    fn task(id: &str, ts: DateTime<Utc>, status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            user_id: "u1".to_string(),
            title: id.to_string(),
            description: String::new(),
            status,
            deadline: None,
            tags: vec![],
            created_at: ts,
            completed_at: None,
        }
    }

    fn file(id: &str, ts: DateTime<Utc>) -> FileRecord {
        FileRecord {
            id: id.to_string(),
            user_id: "u1".to_string(),
            file_name: format!("{}.pdf", id),
            file_url: format!("https://files.example.com/{}.pdf", id),
            file_size: 2048,
            file_type: "application/pdf".to_string(),
            created_at: ts,
        }
    }

    fn link(id: &str, url: &str, ts: DateTime<Utc>) -> Link {
        Link {
            id: id.to_string(),
            user_id: "u1".to_string(),
            url: url.to_string(),
            title: None,
            description: None,
            tags: vec![],
            created_at: ts,
        }
    }

    #[test]
    fn test_merge_orders_newest_first() {
        let tasks = vec![task("t1", at(10, 0), TaskStatus::Todo), task("t2", at(9, 0), TaskStatus::Todo)];
        let files = vec![file("f1", at(9, 30))];
        let caps = SourceCaps { tasks: 3, files: 3, links: 3 };
        let feed = merge_recent_activity(&tasks, &files, &[], &caps, 5);
        let ids: Vec<_> = feed.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "f1", "t2"]);
    }

    #[test]
    fn test_per_source_caps_applied_before_merge() {
        let tasks = vec![
            task("t1", at(8, 0), TaskStatus::Todo),
            task("t2", at(7, 0), TaskStatus::Todo),
            task("t3", at(6, 0), TaskStatus::Todo),
            task("t4", at(23, 0), TaskStatus::Todo), // beyond the cap, never shown
        ];
        let files = vec![file("f1", at(5, 0)), file("f2", at(4, 0)), file("f3", at(22, 0))];
        let feed = merge_recent_activity(&tasks, &files, &[], &SourceCaps::default(), 10);
        let ids: Vec<_> = feed.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2", "t3", "f1", "f2"]);
    }

    #[test]
    fn test_total_cap() {
        let tasks = vec![task("t1", at(8, 0), TaskStatus::Todo), task("t2", at(7, 0), TaskStatus::Todo)];
        let links = vec![link("l1", "https://a.example", at(9, 0)), link("l2", "https://b.example", at(1, 0))];
        let feed = merge_recent_activity(&tasks, &[], &links, &SourceCaps::default(), 3);
        let ids: Vec<_> = feed.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["l1", "t1", "t2"]);
    }

    #[test]
    fn test_ties_keep_source_order() {
        let tasks = vec![task("t1", at(9, 0), TaskStatus::Todo)];
        let files = vec![file("f1", at(9, 0))];
        let links = vec![link("l1", "https://example.com", at(9, 0))];
        let feed = merge_recent_activity(&tasks, &files, &links, &SourceCaps::default(), 5);
        let ids: Vec<_> = feed.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "f1", "l1"]);
    }

    #[test]
    fn test_subtitles() {
        let tasks = vec![task("t1", at(9, 0), TaskStatus::Completed)];
        let files = vec![file("f1", at(8, 0))];
        let links = vec![link("l1", "https://docs.rs/chrono/latest", at(7, 0))];
        let feed = merge_recent_activity(&tasks, &files, &links, &SourceCaps::default(), 5);
        assert_eq!(feed[0].subtitle, "completed");
        assert!(feed[0].completed);
        assert_eq!(feed[1].subtitle, "File uploaded");
        assert_eq!(feed[2].subtitle, "docs.rs");
        assert_eq!(feed[2].title, "Untitled Link");
    }

    #[test]
    fn test_bad_url_falls_back_to_raw() {
        let links = vec![link("l1", "not a url", at(9, 0))];
        let feed = merge_recent_activity(&[], &[], &links, &SourceCaps::default(), 5);
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].subtitle, "not a url");
    }

    #[test]
    fn test_link_hostname() {
        assert_eq!(link_hostname("https://www.example.com/a?b=c"), "www.example.com");
        assert_eq!(link_hostname("mailto:me@example.com"), "mailto:me@example.com");
    }
}

//! Task list views: filter tabs and per-status counts

use serde::{Deserialize, Serialize};

use crate::models::{Task, TaskStatus};

/// Tab shown above the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskFilter {
    #[default]
    All,
    /// Tasks not yet started (`todo`)
    Active,
    InProgress,
    Completed,
}

impl TaskFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskFilter::All => "all",
            TaskFilter::Active => "active",
            TaskFilter::InProgress => "in-progress",
            TaskFilter::Completed => "completed",
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Active => task.status == TaskStatus::Todo,
            TaskFilter::InProgress => task.status == TaskStatus::InProgress,
            TaskFilter::Completed => task.status == TaskStatus::Completed,
        }
    }
}

impl std::fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(TaskFilter::All),
            "active" | "todo" => Ok(TaskFilter::Active),
            "in-progress" | "in_progress" => Ok(TaskFilter::InProgress),
            "completed" | "done" => Ok(TaskFilter::Completed),
            _ => Err(format!("Unknown task filter: {}", s)),
        }
    }
}

/// Tasks visible under `filter`, in input order
pub fn filter_tasks<'a>(tasks: &'a [Task], filter: TaskFilter) -> Vec<&'a Task> {
    tasks.iter().filter(|t| filter.matches(t)).collect()
}

/// Badge counts for each tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TaskCounts {
    pub all: usize,
    pub active: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl TaskCounts {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(
            TaskCounts {
                all: tasks.len(),
                ..Default::default()
            },
            |mut counts, task| {
                match task.status {
                    TaskStatus::Todo => counts.active += 1,
                    TaskStatus::InProgress => counts.in_progress += 1,
                    TaskStatus::Completed => counts.completed += 1,
                    TaskStatus::Deferred => {}
                }
                counts
            },
        )
    }

    pub fn for_filter(&self, filter: TaskFilter) -> usize {
        match filter {
            TaskFilter::All => self.all,
            TaskFilter::Active => self.active,
            TaskFilter::InProgress => self.in_progress,
            TaskFilter::Completed => self.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn task(id: &str, status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            user_id: "u1".to_string(),
            title: id.to_string(),
            description: String::new(),
            status,
            deadline: None,
            tags: vec![],
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            completed_at: None,
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task("a", TaskStatus::Todo),
            task("b", TaskStatus::InProgress),
            task("c", TaskStatus::Completed),
            task("d", TaskStatus::Todo),
            task("e", TaskStatus::Deferred),
        ]
    }

    #[test]
    fn test_filter_tasks() {
        let tasks = sample();
        let ids = |filter| -> Vec<String> {
            filter_tasks(&tasks, filter).iter().map(|t| t.id.clone()).collect()
        };
        assert_eq!(ids(TaskFilter::All).len(), 5);
        assert_eq!(ids(TaskFilter::Active), vec!["a", "d"]);
        assert_eq!(ids(TaskFilter::InProgress), vec!["b"]);
        assert_eq!(ids(TaskFilter::Completed), vec!["c"]);
    }

    #[test]
    fn test_counts_match_filters() {
        let tasks = sample();
        let counts = TaskCounts::from_tasks(&tasks);
        for filter in [TaskFilter::All, TaskFilter::Active, TaskFilter::InProgress, TaskFilter::Completed] {
            assert_eq!(counts.for_filter(filter), filter_tasks(&tasks, filter).len());
        }
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!("in-progress".parse::<TaskFilter>().unwrap(), TaskFilter::InProgress);
        assert_eq!("ACTIVE".parse::<TaskFilter>().unwrap(), TaskFilter::Active);
        assert!("archived".parse::<TaskFilter>().is_err());
    }
}

//! Tasks command
//!
//! Task list under one of the filter tabs, with per-tab counts.

use anyhow::Result;
use daybook_core::services::{filter_tasks, TaskCounts, TaskFilter};
use daybook_core::Task;
use serde::Serialize;
use tabled::Tabled;

use super::helpers::truncate;
use super::Context;
use crate::output::{print_json, print_output, OutputFormat};

#[derive(Debug, Serialize, Tabled)]
pub struct TaskRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Next")]
    pub next: String,
    #[tabled(rename = "Deadline")]
    pub deadline: String,
    #[tabled(rename = "Tags")]
    pub tags: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: truncate(&task.id, 12),
            title: truncate(&task.title, 40),
            status: task.status.to_string(),
            next: task.status.cycle().to_string(),
            deadline: task.deadline.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
            tags: task.tags.join(", "),
        }
    }
}

pub async fn execute(ctx: &Context, filter: String) -> Result<()> {
    let filter: TaskFilter = filter.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let records = ctx.records().await?;
    let counts = TaskCounts::from_tasks(&records.tasks);
    let visible = filter_tasks(&records.tasks, filter);

    if ctx.format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "filter": filter,
            "counts": counts,
            "tasks": visible,
        }));
    }

    let tabs: Vec<String> = [
        TaskFilter::All,
        TaskFilter::Active,
        TaskFilter::InProgress,
        TaskFilter::Completed,
    ]
    .iter()
    .map(|f| {
        let label = format!("{} ({})", f, counts.for_filter(*f));
        if *f == filter {
            format!("[{}]", label)
        } else {
            label
        }
    })
    .collect();
    println!("{}", tabs.join("  "));
    println!();

    let rows: Vec<TaskRow> = visible.into_iter().map(TaskRow::from).collect();
    print_output(&rows, ctx.format)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use daybook_core::TaskStatus;

    #[test]
    fn test_task_row_from_task() {
        let task = Task {
            id: "task-1".to_string(),
            user_id: "u1".to_string(),
            title: "Write the quarterly report".to_string(),
            description: String::new(),
            status: TaskStatus::InProgress,
            deadline: NaiveDate::from_ymd_opt(2024, 7, 1),
            tags: vec!["work".to_string(), "q3".to_string()],
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            completed_at: None,
        };
        let row = TaskRow::from(&task);
        assert_eq!(row.status, "in-progress");
        assert_eq!(row.next, "completed");
        assert_eq!(row.deadline, "2024-07-01");
        assert_eq!(row.tags, "work, q3");
    }
}

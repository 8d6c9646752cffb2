//! Logs command
//!
//! Daily journal entries, newest first, with their attachments.

use anyhow::Result;
use daybook_core::services::{log_attachments, logs_on, LogAttachment};
use daybook_core::DailyLogEntry;
use serde::Serialize;
use tabled::Tabled;

use super::helpers::{format_file_size, parse_date, truncate};
use super::Context;
use crate::output::{print_header, print_info, print_json, print_output, OutputFormat};

#[derive(Debug, Serialize, Tabled)]
pub struct LogRow {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Notes")]
    pub notes: String,
    #[tabled(rename = "Attachments")]
    pub attachments: String,
}

#[derive(Debug, Serialize)]
struct LogView<'a> {
    #[serde(flatten)]
    entry: &'a DailyLogEntry,
    attachments: Vec<LogAttachment>,
}

fn attachment_marker(attachment: &LogAttachment) -> String {
    match attachment {
        LogAttachment::File { name: Some(name), size: Some(size), .. } => {
            format!("file: {} ({})", name, format_file_size(*size))
        }
        LogAttachment::File { name: Some(name), .. } => format!("file: {}", name),
        other => other.label().to_string(),
    }
}

impl From<&DailyLogEntry> for LogRow {
    fn from(entry: &DailyLogEntry) -> Self {
        let markers: Vec<String> = log_attachments(entry).iter().map(attachment_marker).collect();
        Self {
            date: entry.log_date.format("%a %Y-%m-%d").to_string(),
            title: truncate(&entry.title, 36),
            notes: truncate(entry.description.as_deref().unwrap_or(""), 40),
            attachments: if markers.is_empty() { "-".to_string() } else { markers.join(", ") },
        }
    }
}

pub async fn execute(ctx: &Context, date: Option<String>, limit: Option<usize>) -> Result<()> {
    let records = ctx.records().await?;

    let mut entries: Vec<&DailyLogEntry> = match &date {
        Some(day) => logs_on(&records.daily_logs, parse_date(day, ctx.today())?),
        None => records.daily_logs.iter().collect(),
    };
    if let Some(limit) = limit {
        entries.truncate(limit);
    }

    if ctx.format == OutputFormat::Json {
        let views: Vec<LogView> = entries
            .iter()
            .map(|&entry| LogView { entry, attachments: log_attachments(entry) })
            .collect();
        return print_json(&views);
    }

    print_header("Daily Logs", Some(&format!("{} entries", entries.len())));
    if entries.is_empty() {
        print_info("No log entries", ctx.quiet);
        return Ok(());
    }

    let rows: Vec<LogRow> = entries.into_iter().map(LogRow::from).collect();
    print_output(&rows, ctx.format)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn entry() -> DailyLogEntry {
        DailyLogEntry {
            id: "d1".to_string(),
            user_id: "u1".to_string(),
            title: "Monday".to_string(),
            description: Some("Shipped the release".to_string()),
            log_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            image_url: None,
            file_url: None,
            file_name: None,
            file_size: None,
            video_url: None,
            video_type: None,
            created_at: Utc.with_ymd_and_hms(2024, 6, 3, 20, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_log_row_without_attachments() {
        let row = LogRow::from(&entry());
        assert_eq!(row.date, "Mon 2024-06-03");
        assert_eq!(row.notes, "Shipped the release");
        assert_eq!(row.attachments, "-");
    }

    #[test]
    fn test_log_row_markers() {
        let mut e = entry();
        e.image_url = Some("https://img.example.com/1.png".to_string());
        e.file_url = Some("https://files.example.com/plan.pdf".to_string());
        e.file_name = Some("plan.pdf".to_string());
        e.file_size = Some(1536);
        e.video_url = Some("https://youtu.be/dQw4w9WgXcQ".to_string());
        e.video_type = Some("youtube".to_string());
        let row = LogRow::from(&e);
        assert_eq!(row.attachments, "image, file: plan.pdf (1.5 KB), youtube");
    }
}

//! Daily journal views
//!
//! Entries come from the store newest first; these helpers pick a day and
//! describe what each entry has attached.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::DailyLogEntry;

/// Something attached to a journal entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogAttachment {
    Image {
        url: String,
    },
    File {
        url: String,
        name: Option<String>,
        size: Option<i64>,
    },
    Video {
        url: String,
        youtube: bool,
    },
}

impl LogAttachment {
    pub fn label(&self) -> &'static str {
        match self {
            LogAttachment::Image { .. } => "image",
            LogAttachment::File { .. } => "file",
            LogAttachment::Video { youtube: true, .. } => "youtube",
            LogAttachment::Video { youtube: false, .. } => "video",
        }
    }
}

/// Attachments of `entry` in display order: image, file, video.
pub fn log_attachments(entry: &DailyLogEntry) -> Vec<LogAttachment> {
    let mut attachments = Vec::new();
    if let Some(url) = &entry.image_url {
        attachments.push(LogAttachment::Image { url: url.clone() });
    }
    if let Some(url) = &entry.file_url {
        attachments.push(LogAttachment::File {
            url: url.clone(),
            name: entry.file_name.clone(),
            size: entry.file_size,
        });
    }
    if let Some(url) = &entry.video_url {
        attachments.push(LogAttachment::Video {
            url: url.clone(),
            youtube: entry.video_type.as_deref() == Some("youtube"),
        });
    }
    attachments
}

/// Entries whose `log_date` is `date`, in input order.
pub fn logs_on(entries: &[DailyLogEntry], date: NaiveDate) -> Vec<&DailyLogEntry> {
    entries.iter().filter(|e| e.log_date == date).collect()
}

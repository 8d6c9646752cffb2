//! Import command
//!
//! Loads a JSON snapshot of one user's records into the local store.

use anyhow::{Context as _, Result};
use daybook_core::Snapshot;
use serde::Serialize;
use tabled::Tabled;

use super::Context;
use crate::output::{print_info, print_json, print_output, print_success, OutputFormat};

#[derive(Debug, Serialize, Tabled)]
pub struct ImportRow {
    #[tabled(rename = "Collection")]
    pub collection: String,
    #[tabled(rename = "Records")]
    pub count: usize,
}

pub async fn execute(ctx: &Context, path: String) -> Result<()> {
    let raw = std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path))?;
    let snapshot: Snapshot =
        serde_json::from_str(&raw).with_context(|| format!("Invalid snapshot file {}", path))?;

    let summary = ctx.db.import_snapshot(&snapshot).await?;

    if ctx.format == OutputFormat::Json {
        return print_json(&summary);
    }

    print_success(
        &format!("Imported {} records for user {}", summary.total(), summary.user_id),
        ctx.quiet,
    );
    if !summary.removed.is_empty() {
        let removed: Vec<String> = summary
            .removed
            .iter()
            .map(|(entity, count)| format!("{} {}", count, entity))
            .collect();
        print_info(&format!("Removed {} no longer in the snapshot", removed.join(", ")), ctx.quiet);
    }
    if summary.inverted_events > 0 {
        log::warn!(
            "{} events end before they start; they are shown on their start date",
            summary.inverted_events
        );
    }

    if !ctx.quiet {
        let rows = vec![
            ImportRow { collection: "tasks".to_string(), count: summary.tasks },
            ImportRow { collection: "calendar_events".to_string(), count: summary.events },
            ImportRow { collection: "files".to_string(), count: summary.files },
            ImportRow { collection: "links".to_string(), count: summary.links },
            ImportRow { collection: "daily_logs".to_string(), count: summary.daily_logs },
            ImportRow { collection: "spending_logs".to_string(), count: summary.spending },
            ImportRow { collection: "user_analytics".to_string(), count: summary.analytics },
        ];
        print_output(&rows, ctx.format)?;
    }

    Ok(())
}

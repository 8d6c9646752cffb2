//! Dashboard activity command
//!
//! Show the merged feed of recent tasks, files and links.

use anyhow::Result;
use chrono::{DateTime, Utc};
use daybook_core::services::{merge_recent_activity, ActivityItem, ActivitySource};

use crate::commands::helpers::truncate;
use crate::commands::Context;
use crate::output::{print_header, print_info, print_json, print_output, OutputFormat};
use super::types::ActivityRow;

pub async fn show_activity(ctx: &Context, limit: Option<usize>) -> Result<()> {
    let records = ctx.records().await?;
    let total_cap = limit.unwrap_or(ctx.config.total_activity_cap);

    let feed = merge_recent_activity(
        &records.tasks,
        &records.files,
        &records.links,
        &ctx.config.per_source_cap,
        total_cap,
    );

    if ctx.format == OutputFormat::Json {
        return print_json(&feed);
    }

    print_header("Recent Activity", None);
    if feed.is_empty() {
        print_info("No recent activity", ctx.quiet);
        return Ok(());
    }

    let now = Utc::now();
    let rows: Vec<ActivityRow> = feed.iter().map(|item| activity_row(item, now)).collect();
    print_output(&rows, ctx.format)?;

    Ok(())
}

fn activity_row(item: &ActivityItem, now: DateTime<Utc>) -> ActivityRow {
    let icon = match item.source {
        ActivitySource::Task if item.completed => "✔",
        ActivitySource::Task => "○",
        ActivitySource::File => "▤",
        ActivitySource::Link => "↗",
    };
    ActivityRow {
        icon: icon.to_string(),
        source: item.source.to_string(),
        title: truncate(&item.title, 40),
        subtitle: truncate(&item.subtitle, 30),
        when: time_ago(item.timestamp, now),
    }
}

/// "just now", "5m ago", "3h ago", "2d ago", then the plain date
fn time_ago(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(ts);
    if elapsed.num_minutes() < 1 {
        "just now".to_string()
    } else if elapsed.num_hours() < 1 {
        format!("{}m ago", elapsed.num_minutes())
    } else if elapsed.num_days() < 1 {
        format!("{}h ago", elapsed.num_hours())
    } else if elapsed.num_days() < 7 {
        format!("{}d ago", elapsed.num_days())
    } else {
        ts.format("%Y-%m-%d").to_string()
    }
}

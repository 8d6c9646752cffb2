//! Dashboard stats command
//!
//! Show the headline numbers of the dashboard cards.

use anyhow::Result;
use daybook_core::services::{dashboard_stats, entity_totals, TaskCounts};

use crate::commands::helpers::format_amount;
use crate::commands::{in_zone, Context};
use crate::output::{print_header, print_json, print_output, OutputFormat};
use super::types::StatsRow;

pub async fn show_stats(ctx: &Context) -> Result<()> {
    let records = ctx.records().await?;
    let today = ctx.today();

    let stats = in_zone!(ctx, |tz| dashboard_stats(
        &records.tasks,
        &records.files,
        &records.links,
        &records.spending,
        today,
        tz
    ));
    let totals = entity_totals(&records.tasks, &records.files, &records.links, &records.events);
    let counts = TaskCounts::from_tasks(&records.tasks);

    if ctx.format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "user_id": records.user_id,
            "date": today,
            "stats": stats,
            "totals": totals,
            "task_counts": counts,
        }));
    }

    print_header("Dashboard", Some(&format!("{} · {}", records.user_id, today)));

    let rows = vec![
        StatsRow::new("Completed tasks", stats.completed_tasks),
        StatsRow::new("In progress", stats.in_progress_tasks),
        StatsRow::new("Not started", counts.active),
        StatsRow::new("Tasks created today", stats.tasks_created_today),
        StatsRow::new("Files uploaded", stats.files_uploaded),
        StatsRow::new("Links saved", stats.links_saved),
        StatsRow::new("Calendar events", totals.events),
        StatsRow::new("Spent today", format_amount(stats.todays_spending, &ctx.config.currency)),
    ];
    print_output(&rows, ctx.format)?;

    Ok(())
}

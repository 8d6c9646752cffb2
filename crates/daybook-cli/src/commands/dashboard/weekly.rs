//! Dashboard weekly command
//!
//! Show tasks, files and links created over the last seven days.

use anyhow::Result;
use daybook_core::services::weekly_performance;

use crate::commands::helpers::bar;
use crate::commands::{in_zone, Context};
use crate::output::{print_header, print_json, print_output, print_section, OutputFormat};
use super::types::WeeklyRow;

pub async fn show_weekly(ctx: &Context) -> Result<()> {
    let records = ctx.records().await?;
    let today = ctx.today();

    let perf = in_zone!(ctx, |tz| weekly_performance(
        &records.tasks,
        &records.files,
        &records.links,
        today,
        tz
    ));

    if ctx.format == OutputFormat::Json {
        return print_json(&perf);
    }

    print_header("Weekly Performance", Some("Last 7 days"));

    let max = perf.max_daily_tasks as f64;
    let rows: Vec<WeeklyRow> = perf
        .days
        .iter()
        .map(|day| WeeklyRow {
            date: day.date.to_string(),
            weekday: day.label.to_string(),
            tasks: day.tasks,
            files: day.files,
            links: day.links,
            visual: bar(day.tasks as f64, max, 10),
        })
        .collect();
    print_output(&rows, ctx.format)?;
    println!();

    print_section("Totals");
    let completion = if perf.total_tasks > 0 {
        perf.completed_tasks as f64 / perf.total_tasks as f64 * 100.0
    } else {
        0.0
    };
    println!(
        "  Tasks completed: {}/{} ({:.0}%)",
        perf.completed_tasks, perf.total_tasks, completion
    );
    println!("  Files: {}  Links: {}", perf.total_files, perf.total_links);

    if let Some(best) = &perf.most_productive {
        println!(
            "  Most productive day: {} {} ({} tasks)",
            best.label, best.date, best.tasks
        );
    }

    Ok(())
}

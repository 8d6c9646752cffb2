//! Analytics command
//!
//! Usage breakdown by event type, daily activity and the latest events.

use anyhow::Result;
use chrono::TimeZone;
use daybook_core::services::{entity_totals, user_analytics, RecentEvent};
use serde::Serialize;
use tabled::Tabled;

use super::helpers::{bar, truncate};
use super::{in_zone, Context};
use crate::output::{print_header, print_json, print_output, print_section, OutputFormat};

#[derive(Debug, Serialize, Tabled)]
pub struct EventTypeRow {
    #[tabled(rename = "Event")]
    pub label: String,
    #[tabled(rename = "Count")]
    pub count: usize,
}

#[derive(Debug, Serialize, Tabled)]
pub struct DailyEventRow {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Day")]
    pub weekday: String,
    #[tabled(rename = "Events")]
    pub count: usize,
    #[tabled(rename = "Chart")]
    pub visual: String,
}

#[derive(Debug, Serialize, Tabled)]
pub struct RecentEventRow {
    #[tabled(rename = "When")]
    pub when: String,
    #[tabled(rename = "Event")]
    pub label: String,
    #[tabled(rename = "Detail")]
    pub detail: String,
}

pub async fn execute(ctx: &Context) -> Result<()> {
    let records = ctx.records().await?;
    let today = ctx.today();

    let report = in_zone!(ctx, |tz| user_analytics(&records.analytics, today, tz));
    let totals = entity_totals(&records.tasks, &records.files, &records.links, &records.events);

    if ctx.format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "totals": totals,
            "analytics": report,
        }));
    }

    print_header("Analytics", None);
    println!(
        "  Tasks: {}  Files: {}  Links: {}  Events: {}",
        totals.tasks, totals.files, totals.links, totals.events
    );
    println!();

    print_section("By event type");
    let types: Vec<EventTypeRow> = report
        .by_type
        .iter()
        .map(|(label, count)| EventTypeRow { label: label.clone(), count: *count })
        .collect();
    print_output(&types, ctx.format)?;
    println!();

    print_section("Last 7 days");
    let max = report.daily.iter().map(|d| d.count).max().unwrap_or(0) as f64;
    let daily: Vec<DailyEventRow> = report
        .daily
        .iter()
        .map(|d| DailyEventRow {
            date: d.date.to_string(),
            weekday: d.label.to_string(),
            count: d.count,
            visual: bar(d.count as f64, max, 10),
        })
        .collect();
    print_output(&daily, ctx.format)?;
    println!();

    print_section("Recent events");
    let recent = in_zone!(ctx, |tz| recent_rows(&report.recent, tz));
    print_output(&recent, ctx.format)?;

    Ok(())
}

/// Recent events with timestamps shown in `tz`
fn recent_rows<Tz: TimeZone>(recent: &[RecentEvent], tz: &Tz) -> Vec<RecentEventRow>
where
    Tz::Offset: std::fmt::Display,
{
    recent
        .iter()
        .map(|e| RecentEventRow {
            when: e.created_at.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string(),
            label: e.label.clone(),
            detail: truncate(&e.detail, 40),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn recent() -> Vec<RecentEvent> {
        vec![RecentEvent {
            id: "a1".to_string(),
            label: "File uploaded".to_string(),
            detail: "notes.pdf".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 6, 3, 22, 30, 0).unwrap(),
        }]
    }

    #[test]
    fn test_recent_rows_use_zone() {
        let utc_rows = recent_rows(&recent(), &Utc);
        assert_eq!(utc_rows[0].when, "2024-06-03 22:30");

        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let rows = recent_rows(&recent(), &ist);
        assert_eq!(rows[0].when, "2024-06-04 04:00");
        assert_eq!(rows[0].detail, "notes.pdf");
    }
}

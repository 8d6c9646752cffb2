//! Calendar command
//!
//! Month grid with tasks placed by deadline and events by start date, plus
//! a per-day listing.

use anyhow::Result;
use chrono::{Datelike, NaiveDate, TimeZone};
use daybook_core::services::calendar::{DayCell, DayItems, GridCell};
use daybook_core::services::dates::{parse_month_key, shift_month, MONTH_NAMES, WEEKDAY_LABELS};
use daybook_core::services::{build_month_grid, items_for_date, GridContext, MonthGrid};
use daybook_core::UserRecords;
use serde::Serialize;
use tabled::Tabled;

use super::helpers::{parse_date, truncate};
use super::{in_zone, Context};
use crate::output::{print_header, print_info, print_json, print_output, print_section, OutputFormat};

#[derive(Debug, Serialize, Tabled)]
pub struct CalendarDayRow {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Events")]
    pub events: String,
    #[tabled(rename = "Tasks")]
    pub tasks: String,
    #[tabled(rename = "More")]
    pub more: String,
}

#[derive(Debug, Serialize, Tabled)]
pub struct AgendaRow {
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Time")]
    pub time: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Detail")]
    pub detail: String,
}

pub async fn execute(
    ctx: &Context,
    month: Option<String>,
    shift: i32,
    select: Option<String>,
    day: Option<String>,
) -> Result<()> {
    let today = ctx.today();
    let records = ctx.records().await?;

    if let Some(day) = day {
        let date = parse_date(&day, today)?;
        let items = in_zone!(ctx, |tz| items_for_date(date, &records.tasks, &records.events, tz));
        return in_zone!(ctx, |tz| show_day(ctx, date, &items, tz));
    }

    let (year, month) = match month {
        Some(key) => parse_month_key(&key)?,
        None => (today.year(), today.month()),
    };
    let (year, month) = shift_month(year, month, shift)?;
    let selected = select.map(|s| parse_date(&s, today)).transpose()?;

    let grid = in_zone!(ctx, |tz| build_grid(ctx, &records, year, month, today, selected, tz))?;

    if ctx.format == OutputFormat::Json {
        return print_json(&grid);
    }

    print_header(
        &format!("{} {}", MONTH_NAMES[(grid.month - 1) as usize], grid.year),
        None,
    );
    print_month(&grid);
    println!();

    let rows: Vec<CalendarDayRow> = grid
        .days()
        .filter(|cell| cell.item_count() > 0)
        .map(day_row)
        .collect();
    print_section("Scheduled");
    print_output(&rows, ctx.format)?;

    if let Some(cell) = grid.days().find(|c| c.is_selected) {
        println!();
        print_section(&format!("Selected: {}", cell.date));
        let items = DayItems {
            events: cell.events.clone(),
            tasks: cell.tasks.clone(),
        };
        print_output(&in_zone!(ctx, |tz| agenda_rows(&items, tz)), ctx.format)?;
    }

    Ok(())
}

fn build_grid<Tz: TimeZone>(
    ctx: &Context,
    records: &UserRecords,
    year: i32,
    month: u32,
    today: NaiveDate,
    selected: Option<NaiveDate>,
    tz: &Tz,
) -> daybook_core::Result<MonthGrid> {
    let grid_ctx = GridContext {
        today,
        selected,
        tz: tz.clone(),
    };
    build_month_grid(
        year,
        month,
        &records.tasks,
        &records.events,
        ctx.config.max_items_per_cell,
        &grid_ctx,
    )
}

/// Text rendering of the grid, one line per week.
///
/// Days with items carry a `•`, today is bracketed and the selected day
/// starred.
fn print_month(grid: &MonthGrid) {
    println!("{}", WEEKDAY_LABELS.map(|l| format!("{:>5}", l)).join(""));
    for week in grid.weeks() {
        let line: String = week.iter().map(cell_token).collect();
        println!("{}", line);
    }
}

fn cell_token(cell: &GridCell) -> String {
    match cell {
        GridCell::Blank => "     ".to_string(),
        GridCell::Day(day) => {
            let marker = if day.item_count() > 0 { "•" } else { " " };
            let number = if day.is_today {
                format!("[{:>2}]", day.day)
            } else if day.is_selected {
                format!("*{:>2} ", day.day)
            } else {
                format!(" {:>2} ", day.day)
            };
            format!("{}{}", marker, number)
        }
    }
}

fn day_row(cell: &DayCell) -> CalendarDayRow {
    let events: Vec<&str> = cell.visible_events().iter().map(|e| e.title.as_str()).collect();
    let tasks: Vec<&str> = cell.visible_tasks().iter().map(|t| t.title.as_str()).collect();
    CalendarDayRow {
        date: cell.date.format("%a %d").to_string(),
        events: truncate(&events.join(", "), 36),
        tasks: truncate(&tasks.join(", "), 36),
        more: if cell.preview.overflow > 0 {
            format!("+{} more", cell.preview.overflow)
        } else {
            String::new()
        },
    }
}

fn agenda_rows<Tz: TimeZone>(items: &DayItems, tz: &Tz) -> Vec<AgendaRow>
where
    Tz::Offset: std::fmt::Display,
{
    let events = items.events.iter().map(|e| AgendaRow {
        kind: e.event_type.clone(),
        time: if e.is_all_day {
            "all day".to_string()
        } else {
            let start = e.start_time.with_timezone(tz).format("%H:%M").to_string();
            match e.end_time {
                Some(end) if end >= e.start_time => {
                    format!("{}-{}", start, end.with_timezone(tz).format("%H:%M"))
                }
                _ => start,
            }
        },
        title: truncate(&e.title, 40),
        detail: e.description.clone().unwrap_or_default(),
    });
    let tasks = items.tasks.iter().map(|t| AgendaRow {
        kind: "task".to_string(),
        time: "due".to_string(),
        title: truncate(&t.title, 40),
        detail: t.status.to_string(),
    });
    events.chain(tasks).collect()
}

fn show_day<Tz: TimeZone>(ctx: &Context, date: NaiveDate, items: &DayItems, tz: &Tz) -> Result<()>
where
    Tz::Offset: std::fmt::Display,
{
    if ctx.format == OutputFormat::Json {
        return print_json(items);
    }
    print_header(&date.format("%A, %B %-d, %Y").to_string(), None);
    if items.events.is_empty() && items.tasks.is_empty() {
        print_info("Nothing scheduled", ctx.quiet);
        return Ok(());
    }
    print_output(&agenda_rows(items, tz), ctx.format)
}

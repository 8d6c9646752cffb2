//! Calendar month grid
//!
//! Lays a month out on a 7-column grid (Sunday first) and drops tasks with
//! deadlines and calendar events into their day cells.
//!
//! ```text
//!  Sun  Mon  Tue  Wed  Thu  Fri  Sat
//!  ---- [1]  [2]  [3]  [4]  [5]  [6]     <- leading blanks, then days
//!  [7]  [8]  ...
//! ```
//!
//! Trailing blanks that would complete the last week are left to the
//! renderer.

use chrono::{Datelike, NaiveDate, TimeZone};
use serde::Serialize;

use super::bucketing::bucket_by_day;
use super::dates::{days_in_month, first_of_month, first_weekday_of_month, local_date};
use crate::error::Result;
use crate::models::{CalendarEvent, Task};

/// Default number of items previewed inside one day cell
pub const DEFAULT_MAX_ITEMS_PER_CELL: usize = 2;

/// Caller-supplied state the grid depends on
#[derive(Debug, Clone)]
pub struct GridContext<Tz: TimeZone> {
    pub today: NaiveDate,
    pub selected: Option<NaiveDate>,
    /// Zone used to truncate event start times to a day
    pub tz: Tz,
}

/// How many items of a cell fit into its preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CellPreview {
    pub events: usize,
    pub tasks: usize,
    pub overflow: usize,
}

impl CellPreview {
    /// Events first, remaining budget to tasks, the rest counted as overflow.
    pub fn compute(event_count: usize, task_count: usize, max_items: usize) -> Self {
        let events = event_count.min(max_items);
        let tasks = task_count.min(max_items - events);
        let overflow = (event_count + task_count).saturating_sub(max_items);
        Self { events, tasks, overflow }
    }
}

/// One day of the month with everything scheduled on it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCell {
    pub day: u32,
    pub date: NaiveDate,
    pub events: Vec<CalendarEvent>,
    pub tasks: Vec<Task>,
    pub is_today: bool,
    pub is_selected: bool,
    pub preview: CellPreview,
}

impl DayCell {
    pub fn visible_events(&self) -> &[CalendarEvent] {
        &self.events[..self.preview.events]
    }

    pub fn visible_tasks(&self) -> &[Task] {
        &self.tasks[..self.preview.tasks]
    }

    pub fn item_count(&self) -> usize {
        self.events.len() + self.tasks.len()
    }
}

/// Grid position: a leading placeholder or a day
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GridCell {
    Blank,
    Day(DayCell),
}

impl GridCell {
    pub fn as_day(&self) -> Option<&DayCell> {
        match self {
            GridCell::Day(cell) => Some(cell),
            GridCell::Blank => None,
        }
    }
}

/// A laid-out month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub leading_blanks: u32,
    pub day_count: u32,
    pub max_items_per_cell: usize,
    pub cells: Vec<GridCell>,
}

impl MonthGrid {
    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.cells.iter().filter_map(GridCell::as_day)
    }

    /// Cells split into 7-column rows
    pub fn weeks(&self) -> Vec<&[GridCell]> {
        self.cells.chunks(7).collect()
    }
}

/// Events and tasks scheduled on a single date
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DayItems {
    pub events: Vec<CalendarEvent>,
    pub tasks: Vec<Task>,
}

fn dated_tasks(tasks: &[Task]) -> Vec<(&Task, NaiveDate)> {
    tasks
        .iter()
        .filter_map(|task| task.deadline.map(|deadline| (task, deadline)))
        .collect()
}

fn dated_events<'a, Tz: TimeZone>(events: &'a [CalendarEvent], tz: &Tz) -> Vec<(&'a CalendarEvent, NaiveDate)> {
    events
        .iter()
        .map(|event| {
            if !event.has_valid_span() {
                log::debug!("Event {} ends before it starts; placing it by start time", event.id);
            }
            (event, local_date(&event.start_time, tz))
        })
        .collect()
}

/// Lay out `year`/`month` and place tasks (by deadline) and events (by start date).
pub fn build_month_grid<Tz: TimeZone>(
    year: i32,
    month: u32,
    tasks: &[Task],
    events: &[CalendarEvent],
    max_items_per_cell: usize,
    ctx: &GridContext<Tz>,
) -> Result<MonthGrid> {
    let leading_blanks = first_weekday_of_month(year, month)?;
    let day_count = days_in_month(year, month)?;
    let first = first_of_month(year, month)?;

    let task_days = dated_tasks(tasks);
    let event_days = dated_events(events, &ctx.tz);
    let task_buckets = bucket_by_day(&task_days, |(_, d)| *d, first, day_count);
    let event_buckets = bucket_by_day(&event_days, |(_, d)| *d, first, day_count);

    let mut cells = Vec::with_capacity((leading_blanks + day_count) as usize);
    cells.extend((0..leading_blanks).map(|_| GridCell::Blank));

    for (task_bucket, event_bucket) in task_buckets.into_iter().zip(event_buckets) {
        let date = task_bucket.date;
        let day_tasks: Vec<Task> = task_bucket.records.iter().map(|(t, _)| Task::clone(t)).collect();
        let day_events: Vec<CalendarEvent> =
            event_bucket.records.iter().map(|(e, _)| CalendarEvent::clone(e)).collect();
        let preview = CellPreview::compute(day_events.len(), day_tasks.len(), max_items_per_cell);

        cells.push(GridCell::Day(DayCell {
            day: date.day(),
            date,
            events: day_events,
            tasks: day_tasks,
            is_today: date == ctx.today,
            is_selected: ctx.selected == Some(date),
            preview,
        }));
    }

    log::debug!(
        "Built {}-{:02} grid: {} blanks, {} days",
        year, month, leading_blanks, day_count
    );

    Ok(MonthGrid {
        year,
        month,
        leading_blanks,
        day_count,
        max_items_per_cell,
        cells,
    })
}

/// Events and tasks of one date, e.g. the selected day's side panel.
pub fn items_for_date<Tz: TimeZone>(
    date: NaiveDate,
    tasks: &[Task],
    events: &[CalendarEvent],
    tz: &Tz,
) -> DayItems {
    DayItems {
        events: events
            .iter()
            .filter(|e| local_date(&e.start_time, tz) == date)
            .cloned()
            .collect(),
        tasks: tasks
            .iter()
            .filter(|t| t.deadline == Some(date))
            .cloned()
            .collect(),
    }
}

//! Dashboard analytics views
//!
//! Each view takes record snapshots plus an injected `today` and returns
//! display-ready numbers. None of them read the clock.

use chrono::{Duration, NaiveDate, TimeZone};
use indexmap::IndexMap;
use serde::Serialize;

use super::aggregate::{count_by_key, sum_by_key};
use super::bucketing::{bucket_by_day, window_total};
use super::dates::{local_date, trailing_window_start, weekday_label};
use crate::models::{
    AnalyticsEvent, CalendarEvent, FileRecord, Link, SpendingCategory, SpendingEntry, Task,
    TaskStatus,
};

/// Length of the rolling windows shown on the dashboard
pub const WEEK_WINDOW_DAYS: u32 = 7;

/// How far back the "this week" spending total reaches
pub const WEEK_LOOKBACK_DAYS: i64 = 7;

/// How far back the "this month" spending total reaches
pub const MONTH_LOOKBACK_DAYS: i64 = 30;

/// Recent spending entries listed under the charts
pub const RECENT_SPENDING_LIMIT: usize = 5;

/// Recent analytics events listed under the charts
pub const RECENT_EVENTS_LIMIT: usize = 10;

// ============================================================================
// Dashboard stats
// ============================================================================

/// Headline numbers for the dashboard cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub completed_tasks: usize,
    pub in_progress_tasks: usize,
    pub files_uploaded: usize,
    pub links_saved: usize,
    pub todays_spending: f64,
    pub tasks_created_today: usize,
}

pub fn dashboard_stats<Tz: TimeZone>(
    tasks: &[Task],
    files: &[FileRecord],
    links: &[Link],
    spending: &[SpendingEntry],
    today: NaiveDate,
    tz: &Tz,
) -> DashboardStats {
    DashboardStats {
        completed_tasks: tasks.iter().filter(|t| t.status == TaskStatus::Completed).count(),
        in_progress_tasks: tasks.iter().filter(|t| t.status == TaskStatus::InProgress).count(),
        files_uploaded: files.len(),
        links_saved: links.len(),
        todays_spending: spending
            .iter()
            .filter(|s| s.spend_date == today)
            .map(|s| s.amount)
            .sum(),
        tasks_created_today: tasks
            .iter()
            .filter(|t| local_date(&t.created_at, tz) == today)
            .count(),
    }
}

// ============================================================================
// Weekly performance
// ============================================================================

/// Items created on one day of the week window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayActivity {
    pub date: NaiveDate,
    pub label: &'static str,
    pub tasks: usize,
    pub files: usize,
    pub links: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyPerformance {
    pub days: Vec<DayActivity>,
    pub completed_tasks: usize,
    pub total_tasks: usize,
    pub total_files: usize,
    pub total_links: usize,
    /// Largest daily task count, at least 1 so bar heights can divide by it
    pub max_daily_tasks: usize,
    /// Day with the most tasks created, if any were created this week
    pub most_productive: Option<DayActivity>,
}

pub fn weekly_performance<Tz: TimeZone>(
    tasks: &[Task],
    files: &[FileRecord],
    links: &[Link],
    today: NaiveDate,
    tz: &Tz,
) -> WeeklyPerformance {
    let start = trailing_window_start(today, WEEK_WINDOW_DAYS);
    let task_days = bucket_by_day(tasks, |t| local_date(&t.created_at, tz), start, WEEK_WINDOW_DAYS);
    let file_days = bucket_by_day(files, |f| local_date(&f.created_at, tz), start, WEEK_WINDOW_DAYS);
    let link_days = bucket_by_day(links, |l| local_date(&l.created_at, tz), start, WEEK_WINDOW_DAYS);

    let days: Vec<DayActivity> = task_days
        .iter()
        .zip(&file_days)
        .zip(&link_days)
        .map(|((t, f), l)| DayActivity {
            date: t.date,
            label: weekday_label(t.date),
            tasks: t.count(),
            files: f.count(),
            links: l.count(),
        })
        .collect();

    // A later day wins a tie
    let most_productive = days
        .iter()
        .fold(None::<&DayActivity>, |best, day| match best {
            Some(b) if b.tasks > day.tasks => Some(b),
            _ => Some(day),
        })
        .filter(|d| d.tasks > 0)
        .cloned();

    WeeklyPerformance {
        max_daily_tasks: days.iter().map(|d| d.tasks).max().unwrap_or(0).max(1),
        most_productive,
        days,
        completed_tasks: tasks.iter().filter(|t| t.is_completed()).count(),
        total_tasks: tasks.len(),
        total_files: files.len(),
        total_links: links.len(),
    }
}

// ============================================================================
// Spending
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAmount {
    pub date: NaiveDate,
    pub label: &'static str,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingSummary {
    pub today_total: f64,
    pub week_total: f64,
    pub month_total: f64,
    pub daily: Vec<DailyAmount>,
    pub by_category: IndexMap<SpendingCategory, f64>,
    pub recent: Vec<SpendingEntry>,
}

impl SpendingSummary {
    pub fn has_recent_spending(&self) -> bool {
        self.daily.iter().any(|d| d.amount > 0.0)
    }
}

/// Totals and breakdowns over spending entries sorted newest first.
pub fn spending_summary(entries: &[SpendingEntry], today: NaiveDate) -> SpendingSummary {
    let week_floor = today - Duration::days(WEEK_LOOKBACK_DAYS);
    let month_floor = today - Duration::days(MONTH_LOOKBACK_DAYS);
    let total_since = |floor: NaiveDate| -> f64 {
        entries
            .iter()
            .filter(|e| e.spend_date >= floor)
            .map(|e| e.amount)
            .sum()
    };

    let start = trailing_window_start(today, WEEK_WINDOW_DAYS);
    let buckets = bucket_by_day(entries, |e| e.spend_date, start, WEEK_WINDOW_DAYS);
    let daily = buckets
        .iter()
        .map(|b| DailyAmount {
            date: b.date,
            label: b.weekday_label(),
            amount: b.sum_by(|e| e.amount),
        })
        .collect();

    SpendingSummary {
        today_total: entries
            .iter()
            .filter(|e| e.spend_date == today)
            .map(|e| e.amount)
            .sum(),
        week_total: total_since(week_floor),
        month_total: total_since(month_floor),
        daily,
        by_category: sum_by_key(entries, |e| e.category, |e| e.amount),
        recent: entries.iter().take(RECENT_SPENDING_LIMIT).cloned().collect(),
    }
}

/// Total spent across a trailing window ending on `today`.
pub fn rolling_spending_total(entries: &[SpendingEntry], today: NaiveDate, days: u32) -> f64 {
    let buckets = bucket_by_day(entries, |e| e.spend_date, trailing_window_start(today, days), days);
    window_total(&buckets, |e| e.amount)
}

// ============================================================================
// User analytics
// ============================================================================

/// Counts of the four main collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EntityTotals {
    pub tasks: usize,
    pub files: usize,
    pub links: usize,
    pub events: usize,
}

pub fn entity_totals(
    tasks: &[Task],
    files: &[FileRecord],
    links: &[Link],
    events: &[CalendarEvent],
) -> EntityTotals {
    EntityTotals {
        tasks: tasks.len(),
        files: files.len(),
        links: links.len(),
        events: events.len(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentEvent {
    pub id: String,
    pub label: String,
    pub detail: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserAnalytics {
    pub by_type: IndexMap<String, usize>,
    pub daily: Vec<DailyCount>,
    pub recent: Vec<RecentEvent>,
}

/// "task_created" -> "Task Created".
///
/// Only the first underscore becomes a space; any further underscores are
/// part of the word and stay put ("file_bulk_upload" -> "File Bulk_upload").
pub fn humanize_event_type(event_type: &str) -> String {
    let spaced = event_type.replacen('_', " ", 1);
    let mut out = String::with_capacity(spaced.len());
    let mut prev_is_word = false;
    for c in spaced.chars() {
        let is_word = c.is_alphanumeric() || c == '_';
        if is_word && !prev_is_word {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev_is_word = is_word;
    }
    out
}

/// One-line description of an event payload
pub fn event_detail(event: &AnalyticsEvent) -> String {
    ["title", "file_name"]
        .iter()
        .find_map(|key| {
            event
                .event_data
                .get(key)
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
        })
        .unwrap_or("No details")
        .to_string()
}

/// Activity breakdowns over analytics events sorted newest first.
pub fn user_analytics<Tz: TimeZone>(events: &[AnalyticsEvent], today: NaiveDate, tz: &Tz) -> UserAnalytics {
    let start = trailing_window_start(today, WEEK_WINDOW_DAYS);
    let daily = bucket_by_day(events, |e| local_date(&e.created_at, tz), start, WEEK_WINDOW_DAYS)
        .iter()
        .map(|b| DailyCount {
            date: b.date,
            label: b.weekday_label(),
            count: b.count(),
        })
        .collect();

    UserAnalytics {
        by_type: count_by_key(events, |e| humanize_event_type(&e.event_type)),
        daily,
        recent: events
            .iter()
            .take(RECENT_EVENTS_LIMIT)
            .map(|e| RecentEvent {
                id: e.id.clone(),
                label: humanize_event_type(&e.event_type),
                detail: event_detail(e),
                created_at: e.created_at,
            })
            .collect(),
    }
}

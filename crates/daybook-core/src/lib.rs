//! # daybook-core
//!
//! Core logic for Daybook, a personal productivity dashboard.
//!
//! This crate provides:
//! - Data models (`models` module)
//! - The local record store and its read contract (`db` module)
//! - Date bucketing, aggregation and dashboard views (`services` module)
//! - Dashboard configuration (`config` module)
//! - Unified error handling (`error` module)

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

// Re-exports for convenience
pub use config::{get_config_path, DashboardConfig};
pub use db::{Database, ImportSummary, RecordSource, UserRecords};
pub use error::{Error, Result};

pub use models::{
    AnalyticsEvent, CalendarEvent, DailyLogEntry, EntityKind, FileRecord, Link, Snapshot,
    SpendingCategory, SpendingEntry, Task, TaskStatus, UserAccount,
};

pub use services::{
    aggregate_by_key, bucket_by_day, build_month_grid, dashboard_stats, filter_files, filter_tasks,
    merge_recent_activity, search, spending_summary, user_analytics, weekly_performance,
    ActivityItem, ChangeBus, DayBucket, GridContext, MonthGrid, SearchScope, SourceCaps,
    TaskCounts, TaskFilter,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
pub fn version() -> &'static str {
    VERSION
}

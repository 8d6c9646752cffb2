//! Services module
//!
//! Pure aggregation over record snapshots, plus the change bus.

pub mod activity;
pub mod aggregate;
pub mod analytics;
pub mod bucketing;
pub mod calendar;
pub mod dates;
pub mod logs;
pub mod notify;
pub mod search;
pub mod tasks;

pub use activity::{link_hostname, merge_recent_activity, ActivityItem, ActivitySource, SourceCaps};
pub use aggregate::{aggregate_by_key, count_by_key, sum_by_key};
pub use analytics::{
    dashboard_stats, entity_totals, event_detail, humanize_event_type, rolling_spending_total,
    spending_summary, user_analytics, weekly_performance, DailyAmount, DailyCount, DashboardStats,
    DayActivity, EntityTotals, RecentEvent, SpendingSummary, UserAnalytics, WeeklyPerformance,
};
pub use bucketing::{bucket_by_day, daily_counts, window_total, DayBucket};
pub use calendar::{
    build_month_grid, items_for_date, CellPreview, DayCell, DayItems, GridCell, GridContext,
    MonthGrid,
};
pub use logs::{log_attachments, logs_on, LogAttachment};
pub use notify::{ChangeBus, ChangeKind, ChangeNotification, ChangeSubscription, RefreshRequest};
pub use search::{filter_files, search, SearchResults, SearchScope};
pub use tasks::{filter_tasks, TaskCounts, TaskFilter};

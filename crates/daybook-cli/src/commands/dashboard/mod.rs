//! Dashboard commands
//!
//! CLI commands for the dashboard cards, activity feed and weekly chart.

mod activity;
mod stats;
mod types;
mod weekly;

use anyhow::Result;

use crate::commands::Context;

// Re-export public types
pub use types::{ActivityRow, DashboardAction, StatsRow, WeeklyRow};

pub async fn execute(ctx: &Context, action: DashboardAction) -> Result<()> {
    match action {
        DashboardAction::Stats => stats::show_stats(ctx).await,
        DashboardAction::Activity { limit } => activity::show_activity(ctx, limit).await,
        DashboardAction::Weekly => weekly::show_weekly(ctx).await,
    }
}

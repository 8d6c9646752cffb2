//! Dashboard types
//!
//! Types for dashboard commands and display.

use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

#[derive(Subcommand)]
pub enum DashboardAction {
    /// Show the headline stat cards
    Stats,

    /// Show the recent activity feed
    Activity {
        /// Override the total number of items shown
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show the last seven days of created tasks, files and links
    Weekly,
}

#[derive(Debug, Serialize, Tabled)]
pub struct StatsRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl StatsRow {
    pub fn new(metric: &str, value: impl ToString) -> Self {
        Self {
            metric: metric.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
pub struct ActivityRow {
    #[tabled(rename = "")]
    pub icon: String,
    #[tabled(rename = "Type")]
    pub source: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Detail")]
    pub subtitle: String,
    #[tabled(rename = "When")]
    pub when: String,
}

#[derive(Debug, Serialize, Tabled)]
pub struct WeeklyRow {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Day")]
    pub weekday: String,
    #[tabled(rename = "Tasks")]
    pub tasks: usize,
    #[tabled(rename = "Files")]
    pub files: usize,
    #[tabled(rename = "Links")]
    pub links: usize,
    #[tabled(rename = "Chart")]
    pub visual: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_row_serialization() {
        let row = StatsRow::new("Completed tasks", 4);
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("Completed tasks"));
        assert!(json.contains("\"4\""));
    }

    #[test]
    fn test_weekly_row_serialization() {
        let row = WeeklyRow {
            date: "2025-01-15".to_string(),
            weekday: "Wed".to_string(),
            tasks: 3,
            files: 1,
            links: 0,
            visual: "███".to_string(),
        };
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("2025-01-15"));
        assert!(json.contains("Wed"));
        assert!(json.contains("visual"));
    }
}

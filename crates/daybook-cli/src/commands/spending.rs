//! Spending command
//!
//! Totals for today, the past week and the past month, a seven-day chart,
//! the category breakdown and the latest entries.

use anyhow::Result;
use daybook_core::services::spending_summary;
use serde::Serialize;
use tabled::Tabled;

use super::helpers::{bar, format_amount, truncate};
use super::Context;
use crate::output::{print_header, print_info, print_json, print_output, print_section, OutputFormat};

#[derive(Debug, Serialize, Tabled)]
pub struct TotalRow {
    #[tabled(rename = "Period")]
    pub period: String,
    #[tabled(rename = "Spent")]
    pub amount: String,
}

#[derive(Debug, Serialize, Tabled)]
pub struct DailySpendRow {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Day")]
    pub weekday: String,
    #[tabled(rename = "Spent")]
    pub amount: String,
    #[tabled(rename = "Chart")]
    pub visual: String,
}

#[derive(Debug, Serialize, Tabled)]
pub struct CategoryRow {
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Spent")]
    pub amount: String,
    #[tabled(rename = "Share")]
    pub percentage: String,
}

#[derive(Debug, Serialize, Tabled)]
pub struct EntryRow {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Amount")]
    pub amount: String,
    #[tabled(rename = "Description")]
    pub description: String,
}

pub async fn execute(ctx: &Context) -> Result<()> {
    let records = ctx.records().await?;
    let summary = spending_summary(&records.spending, ctx.today());
    let currency = ctx.config.currency.as_str();

    if ctx.format == OutputFormat::Json {
        return print_json(&summary);
    }

    print_header("Spending", None);

    let totals = vec![
        TotalRow { period: "Today".to_string(), amount: format_amount(summary.today_total, currency) },
        TotalRow { period: "This week".to_string(), amount: format_amount(summary.week_total, currency) },
        TotalRow { period: "This month".to_string(), amount: format_amount(summary.month_total, currency) },
    ];
    print_output(&totals, ctx.format)?;
    println!();

    print_section("Last 7 days");
    if summary.has_recent_spending() {
        let max = summary.daily.iter().map(|d| d.amount).fold(0.0, f64::max);
        let daily: Vec<DailySpendRow> = summary
            .daily
            .iter()
            .map(|d| DailySpendRow {
                date: d.date.to_string(),
                weekday: d.label.to_string(),
                amount: format_amount(d.amount, currency),
                visual: bar(d.amount, max, 12),
            })
            .collect();
        print_output(&daily, ctx.format)?;
    } else {
        print_info("No spending in the last 7 days", ctx.quiet);
    }
    println!();

    if !summary.by_category.is_empty() {
        print_section("By category");
        let total: f64 = summary.by_category.values().sum();
        let categories: Vec<CategoryRow> = summary
            .by_category
            .iter()
            .map(|(category, amount)| {
                let pct = if total > 0.0 { amount / total * 100.0 } else { 0.0 };
                CategoryRow {
                    category: category.to_string(),
                    amount: format_amount(*amount, currency),
                    percentage: format!("{:.1}%", pct),
                }
            })
            .collect();
        print_output(&categories, ctx.format)?;
        println!();
    }

    print_section("Recent");
    let entries: Vec<EntryRow> = summary
        .recent
        .iter()
        .map(|e| EntryRow {
            date: e.spend_date.to_string(),
            category: e.category.to_string(),
            amount: format_amount(e.amount, currency),
            description: truncate(e.description.as_deref().unwrap_or("-"), 40),
        })
        .collect();
    print_output(&entries, ctx.format)?;

    Ok(())
}

//! Daybook CLI - personal productivity dashboard in the terminal
//!
//! Imports record snapshots into a local store and renders the dashboard
//! views: stats, activity feed, weekly chart, calendar month, daily logs,
//! spending and usage analytics.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "daybook")]
#[command(author, version, about = "Personal productivity dashboard CLI", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: table (default) or json
    #[arg(long, global = true, default_value = "table")]
    format: output::OutputFormat,

    /// Suppress progress messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Override database path (or set DAYBOOK_DB_PATH env var)
    #[arg(long, env = "DAYBOOK_DB_PATH", global = true)]
    db: Option<String>,

    /// User whose records to show (defaults to config, then the first user)
    #[arg(long, env = "DAYBOOK_USER", global = true)]
    user: Option<String>,

    /// Override config file path (or set DAYBOOK_CONFIG_PATH env var)
    #[arg(long, env = "DAYBOOK_CONFIG_PATH", global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a JSON snapshot of a user's records
    Import {
        /// Path to the snapshot file
        path: String,
    },

    /// Dashboard cards, activity feed and weekly chart
    Dashboard {
        #[command(subcommand)]
        action: commands::dashboard::DashboardAction,
    },

    /// Show a calendar month with tasks and events
    Calendar {
        /// Month to show (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,

        /// Move that many months forward (negative for back)
        #[arg(long, allow_hyphen_values = true, default_value_t = 0)]
        shift: i32,

        /// Highlight a date (YYYY-MM-DD)
        #[arg(short, long)]
        select: Option<String>,

        /// List everything scheduled on one date (YYYY-MM-DD, today, yesterday)
        #[arg(short, long)]
        day: Option<String>,
    },

    /// Daily journal entries, newest first
    Logs {
        /// Only entries for this date (YYYY-MM-DD, today, yesterday)
        #[arg(short, long)]
        date: Option<String>,

        /// Show at most this many entries
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Spending totals and breakdowns
    Spending,

    /// Usage analytics
    Analytics,

    /// List tasks
    Tasks {
        /// Tab filter: all, active, in-progress, completed
        #[arg(short, long, default_value = "all")]
        filter: String,
    },

    /// Search tasks, files and links
    Search {
        /// Text to look for (case-insensitive)
        query: String,

        /// Limit to one collection: all, tasks, files, links
        #[arg(short, long, default_value = "all")]
        scope: String,

        /// Only files of this MIME type or major type (e.g. image)
        #[arg(long)]
        file_type: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    // Set up paths if provided
    if let Some(db_path) = &cli.db {
        std::env::set_var(daybook_core::db::DB_PATH_ENV, db_path);
    }
    if let Some(config_path) = &cli.config {
        std::env::set_var(daybook_core::config::CONFIG_PATH_ENV, config_path);
    }

    let config_path = daybook_core::get_config_path()?;
    let config = daybook_core::DashboardConfig::load(&config_path)?;

    // Initialize database
    let db = daybook_core::Database::new().await?;

    // Create context for commands
    let ctx = commands::Context {
        db,
        format: cli.format,
        quiet: cli.quiet,
        user: cli.user,
        config,
        config_path,
    };

    // Execute command
    let result = match cli.command {
        Commands::Import { path } => commands::import::execute(&ctx, path).await,
        Commands::Dashboard { action } => commands::dashboard::execute(&ctx, action).await,
        Commands::Calendar { month, shift, select, day } => {
            commands::calendar::execute(&ctx, month, shift, select, day).await
        }
        Commands::Logs { date, limit } => commands::logs::execute(&ctx, date, limit).await,
        Commands::Spending => commands::spending::execute(&ctx).await,
        Commands::Analytics => commands::analytics::execute(&ctx).await,
        Commands::Tasks { filter } => commands::tasks::execute(&ctx, filter).await,
        Commands::Search { query, scope, file_type } => {
            commands::search::execute(&ctx, query, scope, file_type).await
        }
        Commands::Config { action } => commands::config::execute(&ctx, action).await,
    };

    if let Err(e) = &result {
        output::print_error(&format!("Error: {:#}", e));
        std::process::exit(1);
    }
    Ok(())
}

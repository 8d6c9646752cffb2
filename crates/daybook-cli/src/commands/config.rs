//! Config commands
//!
//! Commands for managing dashboard configuration.

use anyhow::Result;
use clap::Subcommand;
use daybook_core::config::CONFIG_PATH_ENV;
use daybook_core::db::{get_db_path, DB_PATH_ENV};
use serde::Serialize;
use tabled::Tabled;

use super::Context;
use crate::output::{print_info, print_output, print_success};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Configuration value
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Print the config file path
    Path,
}

/// Config row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

pub async fn execute(ctx: &Context, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => show_config(ctx),
        ConfigAction::Set { key, value } => set_config(ctx, key, value),
        ConfigAction::Get { key } => get_config(ctx, key),
        ConfigAction::Path => {
            println!("{}", ctx.config_path.display());
            Ok(())
        }
    }
}

fn env_source(var: &str) -> String {
    if std::env::var(var).is_ok() { "env" } else { "default" }.to_string()
}

fn show_config(ctx: &Context) -> Result<()> {
    let file_source = if ctx.config_path.exists() { "file" } else { "default" };

    let mut rows = vec![
        ConfigRow {
            key: DB_PATH_ENV.to_string(),
            value: get_db_path()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_else(|_| "Unknown".to_string()),
            source: env_source(DB_PATH_ENV),
        },
        ConfigRow {
            key: CONFIG_PATH_ENV.to_string(),
            value: ctx.config_path.to_string_lossy().to_string(),
            source: env_source(CONFIG_PATH_ENV),
        },
    ];
    rows.extend(ctx.config.entries().into_iter().map(|(key, value)| ConfigRow {
        key: key.to_string(),
        value,
        source: file_source.to_string(),
    }));

    print_output(&rows, ctx.format)?;
    Ok(())
}

fn get_config(ctx: &Context, key: String) -> Result<()> {
    match ctx.config.get(&key) {
        Some(value) => {
            print_info(&format!("{} = {}", key, value), ctx.quiet);
            Ok(())
        }
        None => Err(anyhow::anyhow!("Config key not found: {}", key)),
    }
}

fn set_config(ctx: &Context, key: String, value: String) -> Result<()> {
    let mut config = ctx.config.clone();
    config.set(&key, &value)?;
    config.save(&ctx.config_path)?;
    let shown = config.get(&key).unwrap_or(value);
    print_success(&format!("Set {} = {}", key, shown), ctx.quiet);
    Ok(())
}

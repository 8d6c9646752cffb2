//! Dashboard configuration
//!
//! A small JSON file holding the display constants of the dashboard. A
//! missing file means defaults; unknown keys in the file are ignored.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::services::activity::{SourceCaps, DEFAULT_TOTAL_ACTIVITY_CAP};
use crate::services::calendar::DEFAULT_MAX_ITEMS_PER_CELL;

pub const CONFIG_PATH_ENV: &str = "DAYBOOK_CONFIG_PATH";

fn default_max_items_per_cell() -> usize {
    DEFAULT_MAX_ITEMS_PER_CELL
}

fn default_total_activity_cap() -> usize {
    DEFAULT_TOTAL_ACTIVITY_CAP
}

/// Symbol the expense form records amounts in
pub const DEFAULT_CURRENCY: &str = "₹";

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Events plus tasks previewed in one calendar cell
    #[serde(default = "default_max_items_per_cell")]
    pub max_items_per_cell: usize,
    #[serde(default)]
    pub per_source_cap: SourceCaps,
    #[serde(default = "default_total_activity_cap")]
    pub total_activity_cap: usize,
    /// Truncate timestamps to dates in UTC instead of the local zone
    #[serde(default)]
    pub utc_dates: bool,
    /// User whose records are shown when `--user` is not given
    #[serde(default)]
    pub default_user: Option<String>,
    /// Prefix for spending amounts
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            max_items_per_cell: DEFAULT_MAX_ITEMS_PER_CELL,
            per_source_cap: SourceCaps::default(),
            total_activity_cap: DEFAULT_TOTAL_ACTIVITY_CAP,
            utc_dates: false,
            default_user: None,
            currency: default_currency(),
        }
    }
}

/// Settable keys, in display order
pub const CONFIG_KEYS: [&str; 8] = [
    "max_items_per_cell",
    "per_source_cap.tasks",
    "per_source_cap.files",
    "per_source_cap.links",
    "total_activity_cap",
    "utc_dates",
    "default_user",
    "currency",
];

fn parse_count(key: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| Error::config(format!("{} must be a non-negative integer, got {:?}", key, value)))
}

impl DashboardConfig {
    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| Error::config(format!("Invalid config file {}: {}", path.display(), e)))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "max_items_per_cell" => self.max_items_per_cell.to_string(),
            "per_source_cap.tasks" => self.per_source_cap.tasks.to_string(),
            "per_source_cap.files" => self.per_source_cap.files.to_string(),
            "per_source_cap.links" => self.per_source_cap.links.to_string(),
            "total_activity_cap" => self.total_activity_cap.to_string(),
            "utc_dates" => self.utc_dates.to_string(),
            "default_user" => self.default_user.clone().unwrap_or_else(|| "-".to_string()),
            "currency" => self.currency.clone(),
            _ => return None,
        };
        Some(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "max_items_per_cell" => self.max_items_per_cell = parse_count(key, value)?,
            "per_source_cap.tasks" => self.per_source_cap.tasks = parse_count(key, value)?,
            "per_source_cap.files" => self.per_source_cap.files = parse_count(key, value)?,
            "per_source_cap.links" => self.per_source_cap.links = parse_count(key, value)?,
            "total_activity_cap" => self.total_activity_cap = parse_count(key, value)?,
            "utc_dates" => {
                self.utc_dates = match value.trim().to_lowercase().as_str() {
                    "true" | "yes" | "1" => true,
                    "false" | "no" | "0" => false,
                    _ => return Err(Error::config(format!("utc_dates must be true or false, got {:?}", value))),
                }
            }
            "default_user" => {
                let value = value.trim();
                self.default_user = (!value.is_empty() && value != "-").then(|| value.to_string());
            }
            "currency" => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(Error::config("currency must not be empty"));
                }
                self.currency = value.to_string();
            }
            _ => {
                return Err(Error::config(format!(
                    "Unknown config key: {} (available: {})",
                    key,
                    CONFIG_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    /// Every key with its current value
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|v| (*key, v)))
            .collect()
    }

    /// Today's date in the configured zone
    pub fn today(&self) -> NaiveDate {
        if self.utc_dates {
            Utc::now().date_naive()
        } else {
            Local::now().date_naive()
        }
    }
}

/// Get the config file path
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }

    let dirs = directories::ProjectDirs::from("com", "daybook", "Daybook")
        .ok_or_else(|| Error::config("Could not determine project directories"))?;

    Ok(dirs.config_dir().join("config.json"))
}

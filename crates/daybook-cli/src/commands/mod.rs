//! CLI commands module
//!
//! Contains all CLI command implementations.

pub mod analytics;
pub mod calendar;
pub mod config;
pub mod dashboard;
pub mod helpers;
pub mod import;
pub mod logs;
pub mod search;
pub mod spending;
pub mod tasks;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use daybook_core::{Database, DashboardConfig, UserRecords};

use crate::output::OutputFormat;

/// Run `$body` with `$tz` bound to the configured date zone.
///
/// Views are generic over the zone, so the body is instantiated once for
/// `Utc` and once for `Local`.
macro_rules! in_zone {
    ($ctx:expr, |$tz:ident| $body:expr) => {
        if $ctx.config.utc_dates {
            let $tz = &chrono::Utc;
            $body
        } else {
            let $tz = &chrono::Local;
            $body
        }
    };
}
pub(crate) use in_zone;

/// Shared context for all commands
pub struct Context {
    pub db: Database,
    pub format: OutputFormat,
    pub quiet: bool,
    /// `--user` from the command line
    pub user: Option<String>,
    pub config: DashboardConfig,
    pub config_path: PathBuf,
}

impl Context {
    /// User to show: `--user`, then the configured default, then the first user in the store.
    pub async fn user_id(&self) -> Result<String> {
        if let Some(user) = self.user.as_ref().or(self.config.default_user.as_ref()) {
            return Ok(user.clone());
        }
        Ok(daybook_core::db::default_user_id(&self.db).await?)
    }

    /// Fresh snapshot of every collection for the current user
    pub async fn records(&self) -> Result<UserRecords> {
        let user_id = self.user_id().await?;
        log::debug!("Loading records for {}", user_id);
        Ok(UserRecords::fetch(&self.db, &user_id).await?)
    }

    pub fn today(&self) -> NaiveDate {
        self.config.today()
    }
}

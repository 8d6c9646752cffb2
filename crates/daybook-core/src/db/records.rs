//! Read side of the store
//!
//! Views never query the store themselves. They get snapshots pulled
//! through `RecordSource`, already filtered to one user and sorted the way
//! each view expects.

use async_trait::async_trait;

use super::Database;
use crate::error::Result;
use crate::models::{
    AnalyticsEvent, CalendarEvent, DailyLogEntry, EntityKind, FileRecord, Link, SpendingEntry,
    Task, UserAccount,
};
use crate::services::notify::RefreshRequest;

/// Snapshot fetches, one per collection
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn user(&self, user_id: &str) -> Result<Option<UserAccount>>;

    /// Newest first
    async fn tasks(&self, user_id: &str) -> Result<Vec<Task>>;

    /// Earliest start first
    async fn calendar_events(&self, user_id: &str) -> Result<Vec<CalendarEvent>>;

    /// Newest first
    async fn files(&self, user_id: &str) -> Result<Vec<FileRecord>>;

    /// Newest first
    async fn links(&self, user_id: &str) -> Result<Vec<Link>>;

    /// Newest first
    async fn daily_logs(&self, user_id: &str) -> Result<Vec<DailyLogEntry>>;

    /// Latest spend date first
    async fn spending(&self, user_id: &str) -> Result<Vec<SpendingEntry>>;

    /// Newest first
    async fn analytics(&self, user_id: &str) -> Result<Vec<AnalyticsEvent>>;
}

#[async_trait]
impl RecordSource for Database {
    async fn user(&self, user_id: &str) -> Result<Option<UserAccount>> {
        let user = sqlx::query_as::<_, UserAccount>(
            "SELECT id, email, display_name, created_at FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, status, deadline, tags, created_at, completed_at
            FROM tasks WHERE user_id = ?
            ORDER BY created_at DESC, rowid ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn calendar_events(&self, user_id: &str) -> Result<Vec<CalendarEvent>> {
        let rows = sqlx::query_as::<_, CalendarEvent>(
            r#"
            SELECT id, user_id, title, description, start_time, end_time, event_type, color,
                   is_all_day, task_id
            FROM calendar_events WHERE user_id = ?
            ORDER BY start_time ASC, rowid ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn files(&self, user_id: &str) -> Result<Vec<FileRecord>> {
        let rows = sqlx::query_as::<_, FileRecord>(
            r#"
            SELECT id, user_id, file_name, file_url, file_size, file_type, created_at
            FROM files WHERE user_id = ?
            ORDER BY created_at DESC, rowid ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn links(&self, user_id: &str) -> Result<Vec<Link>> {
        let rows = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, user_id, url, title, description, tags, created_at
            FROM links WHERE user_id = ?
            ORDER BY created_at DESC, rowid ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn daily_logs(&self, user_id: &str) -> Result<Vec<DailyLogEntry>> {
        let rows = sqlx::query_as::<_, DailyLogEntry>(
            r#"
            SELECT id, user_id, title, description, log_date, image_url, file_url, file_name,
                   file_size, video_url, video_type, created_at
            FROM daily_logs WHERE user_id = ?
            ORDER BY created_at DESC, rowid ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn spending(&self, user_id: &str) -> Result<Vec<SpendingEntry>> {
        let rows = sqlx::query_as::<_, SpendingEntry>(
            r#"
            SELECT id, user_id, amount, category, description, spend_date
            FROM spending_logs WHERE user_id = ?
            ORDER BY spend_date DESC, rowid ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn analytics(&self, user_id: &str) -> Result<Vec<AnalyticsEvent>> {
        let rows = sqlx::query_as::<_, AnalyticsEvent>(
            r#"
            SELECT id, user_id, event_type, event_data, created_at
            FROM user_analytics WHERE user_id = ?
            ORDER BY created_at DESC, rowid ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

/// Everything one user's dashboard reads
#[derive(Debug, Clone, Default)]
pub struct UserRecords {
    pub user_id: String,
    pub tasks: Vec<Task>,
    pub events: Vec<CalendarEvent>,
    pub files: Vec<FileRecord>,
    pub links: Vec<Link>,
    pub daily_logs: Vec<DailyLogEntry>,
    pub spending: Vec<SpendingEntry>,
    pub analytics: Vec<AnalyticsEvent>,
}

impl UserRecords {
    /// Pull every collection concurrently.
    pub async fn fetch<S: RecordSource + ?Sized>(source: &S, user_id: &str) -> Result<Self> {
        let (tasks, events, files, links, daily_logs, spending, analytics) = tokio::try_join!(
            source.tasks(user_id),
            source.calendar_events(user_id),
            source.files(user_id),
            source.links(user_id),
            source.daily_logs(user_id),
            source.spending(user_id),
            source.analytics(user_id),
        )?;

        log::debug!(
            "Fetched records for {}: {} tasks, {} events, {} files, {} links",
            user_id,
            tasks.len(),
            events.len(),
            files.len(),
            links.len()
        );

        Ok(Self {
            user_id: user_id.to_string(),
            tasks,
            events,
            files,
            links,
            daily_logs,
            spending,
            analytics,
        })
    }

    /// Re-pull only the collections named by `request`.
    pub async fn refresh<S: RecordSource + ?Sized>(&mut self, source: &S, request: &RefreshRequest) -> Result<()> {
        for entity in &request.entities {
            match entity {
                EntityKind::Task => self.tasks = source.tasks(&self.user_id).await?,
                EntityKind::CalendarEvent => self.events = source.calendar_events(&self.user_id).await?,
                EntityKind::File => self.files = source.files(&self.user_id).await?,
                EntityKind::Link => self.links = source.links(&self.user_id).await?,
                EntityKind::DailyLog => self.daily_logs = source.daily_logs(&self.user_id).await?,
                EntityKind::Spending => self.spending = source.spending(&self.user_id).await?,
                EntityKind::Analytics => self.analytics = source.analytics(&self.user_id).await?,
            }
        }
        Ok(())
    }
}

//! Snapshot import
//!
//! Loads a user's exported records into the local store. A snapshot is the
//! full export of every collection: inside one transaction records are
//! upserted by id and rows missing from the snapshot are deleted. An id
//! already owned by another user aborts the whole import.

use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::sqlite::SqliteQueryResult;
use sqlx::{Sqlite, Transaction};

use super::Database;
use crate::error::{Error, Result};
use crate::models::{EntityKind, Snapshot};
use crate::services::notify::{ChangeKind, ChangeNotification};

/// Rows written per collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub user_id: String,
    pub tasks: usize,
    pub events: usize,
    pub files: usize,
    pub links: usize,
    pub daily_logs: usize,
    pub spending: usize,
    pub analytics: usize,
    /// Events whose end precedes their start; imported anyway
    pub inverted_events: usize,
    /// Rows deleted because the snapshot no longer has them
    pub removed: BTreeMap<EntityKind, usize>,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.tasks + self.events + self.files + self.links + self.daily_logs + self.spending + self.analytics
    }

    pub fn removed_total(&self) -> usize {
        self.removed.values().sum()
    }

    fn count_for(&self, entity: EntityKind) -> usize {
        match entity {
            EntityKind::Task => self.tasks,
            EntityKind::CalendarEvent => self.events,
            EntityKind::File => self.files,
            EntityKind::Link => self.links,
            EntityKind::DailyLog => self.daily_logs,
            EntityKind::Spending => self.spending,
            EntityKind::Analytics => self.analytics,
        }
    }
}

/// Resolve a record's owner: blank means the snapshot user, anything else must match.
fn resolve_owner<'a>(record_user: &'a str, snapshot_user: &'a str, entity: EntityKind, id: &str) -> Result<&'a str> {
    if record_user.is_empty() || record_user == snapshot_user {
        Ok(snapshot_user)
    } else {
        Err(Error::invalid_record(
            "user_id",
            format!("{} {} belongs to {}, not {}", entity, id, record_user, snapshot_user),
        ))
    }
}

/// Zero affected rows means the conflict guard refused to touch another user's row.
fn ensure_owned(result: SqliteQueryResult, entity: EntityKind, id: &str) -> Result<()> {
    if result.rows_affected() == 0 {
        return Err(Error::invalid_record(
            "id",
            format!("{} {} belongs to another user", entity, id),
        ));
    }
    Ok(())
}

fn require_id(id: &str, entity: EntityKind) -> Result<()> {
    if id.trim().is_empty() {
        return Err(Error::invalid_record("id", format!("{} record without id", entity)));
    }
    Ok(())
}

fn validate(snapshot: &Snapshot) -> Result<()> {
    if snapshot.user.id.trim().is_empty() {
        return Err(Error::invalid_record("user.id", "must not be empty"));
    }
    for task in &snapshot.tasks {
        require_id(&task.id, EntityKind::Task)?;
    }
    for event in &snapshot.events {
        require_id(&event.id, EntityKind::CalendarEvent)?;
    }
    for file in &snapshot.files {
        require_id(&file.id, EntityKind::File)?;
        if file.file_size < 0 {
            return Err(Error::invalid_record("file_size", format!("file {} has negative size", file.id)));
        }
    }
    for link in &snapshot.links {
        require_id(&link.id, EntityKind::Link)?;
    }
    for day_log in &snapshot.daily_logs {
        require_id(&day_log.id, EntityKind::DailyLog)?;
    }
    for entry in &snapshot.spending {
        require_id(&entry.id, EntityKind::Spending)?;
        if !entry.amount.is_finite() {
            return Err(Error::invalid_record("amount", format!("spending {} amount is not a number", entry.id)));
        }
    }
    for event in &snapshot.analytics {
        require_id(&event.id, EntityKind::Analytics)?;
    }
    Ok(())
}

impl Database {
    /// Upsert every record of `snapshot` and notify subscribers.
    pub async fn import_snapshot(&self, snapshot: &Snapshot) -> Result<ImportSummary> {
        validate(snapshot)?;
        let uid = snapshot.user.id.as_str();
        log::info!("Importing snapshot for user {}", uid);

        let mut tx = self.pool.begin().await?;
        let mut summary = ImportSummary {
            user_id: uid.to_string(),
            ..Default::default()
        };

        sqlx::query(
            r#"
            INSERT INTO users (id, email, display_name, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                email = excluded.email,
                display_name = excluded.display_name
            "#,
        )
        .bind(uid)
        .bind(&snapshot.user.email)
        .bind(&snapshot.user.display_name)
        .bind(snapshot.user.created_at)
        .execute(&mut *tx)
        .await?;

        summary.tasks = import_tasks(&mut tx, snapshot, uid).await?;
        let (events, inverted) = import_events(&mut tx, snapshot, uid).await?;
        summary.events = events;
        summary.inverted_events = inverted;
        summary.files = import_files(&mut tx, snapshot, uid).await?;
        summary.links = import_links(&mut tx, snapshot, uid).await?;
        summary.daily_logs = import_daily_logs(&mut tx, snapshot, uid).await?;
        summary.spending = import_spending(&mut tx, snapshot, uid).await?;
        summary.analytics = import_analytics(&mut tx, snapshot, uid).await?;

        for entity in EntityKind::ALL {
            let removed = prune(&mut tx, entity, uid, snapshot_ids(snapshot, entity)).await?;
            if removed > 0 {
                summary.removed.insert(entity, removed);
            }
        }

        tx.commit().await?;
        log::info!(
            "Imported {} records for user {} ({} removed)",
            summary.total(),
            uid,
            summary.removed_total()
        );

        for entity in EntityKind::ALL {
            if summary.removed.contains_key(&entity) {
                self.changes
                    .publish(ChangeNotification::new(entity, uid, ChangeKind::Deleted));
            }
            if summary.count_for(entity) > 0 {
                self.changes
                    .publish(ChangeNotification::new(entity, uid, ChangeKind::Imported));
            }
        }

        Ok(summary)
    }
}

fn snapshot_ids(snapshot: &Snapshot, entity: EntityKind) -> Vec<&str> {
    match entity {
        EntityKind::Task => snapshot.tasks.iter().map(|r| r.id.as_str()).collect(),
        EntityKind::CalendarEvent => snapshot.events.iter().map(|r| r.id.as_str()).collect(),
        EntityKind::File => snapshot.files.iter().map(|r| r.id.as_str()).collect(),
        EntityKind::Link => snapshot.links.iter().map(|r| r.id.as_str()).collect(),
        EntityKind::DailyLog => snapshot.daily_logs.iter().map(|r| r.id.as_str()).collect(),
        EntityKind::Spending => snapshot.spending.iter().map(|r| r.id.as_str()).collect(),
        EntityKind::Analytics => snapshot.analytics.iter().map(|r| r.id.as_str()).collect(),
    }
}

/// Delete the user's rows of one collection whose id is not in `keep`.
async fn prune(
    tx: &mut Transaction<'_, Sqlite>,
    entity: EntityKind,
    uid: &str,
    keep: Vec<&str>,
) -> Result<usize> {
    let sql = format!(
        "DELETE FROM {} WHERE user_id = ? AND id NOT IN (SELECT value FROM json_each(?))",
        entity.table()
    );
    let result = sqlx::query(&sql)
        .bind(uid)
        .bind(serde_json::to_string(&keep)?)
        .execute(&mut **tx)
        .await?;
    let removed = result.rows_affected() as usize;
    if removed > 0 {
        log::debug!("Removed {} {} rows missing from the snapshot", removed, entity);
    }
    Ok(removed)
}

async fn import_tasks(tx: &mut Transaction<'_, Sqlite>, snapshot: &Snapshot, uid: &str) -> Result<usize> {
    for task in &snapshot.tasks {
        let owner = resolve_owner(&task.user_id, uid, EntityKind::Task, &task.id)?;
        let result = sqlx::query(
            r#"
            INSERT INTO tasks
                (id, user_id, title, description, status, deadline, tags, created_at, completed_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                status = excluded.status,
                deadline = excluded.deadline,
                tags = excluded.tags,
                created_at = excluded.created_at,
                completed_at = excluded.completed_at
            WHERE tasks.user_id = excluded.user_id
            "#,
        )
        .bind(&task.id)
        .bind(owner)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.deadline)
        .bind(serde_json::to_string(&task.tags)?)
        .bind(task.created_at)
        .bind(task.completed_at)
        .execute(&mut **tx)
        .await?;
        ensure_owned(result, EntityKind::Task, &task.id)?;
    }
    Ok(snapshot.tasks.len())
}

async fn import_events(tx: &mut Transaction<'_, Sqlite>, snapshot: &Snapshot, uid: &str) -> Result<(usize, usize)> {
    let mut inverted = 0;
    for event in &snapshot.events {
        let owner = resolve_owner(&event.user_id, uid, EntityKind::CalendarEvent, &event.id)?;
        if !event.has_valid_span() {
            log::warn!(
                "Event {} ends before it starts; it will be shown on its start date",
                event.id
            );
            inverted += 1;
        }
        let result = sqlx::query(
            r#"
            INSERT INTO calendar_events
                (id, user_id, title, description, start_time, end_time, event_type, color, is_all_day, task_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                start_time = excluded.start_time,
                end_time = excluded.end_time,
                event_type = excluded.event_type,
                color = excluded.color,
                is_all_day = excluded.is_all_day,
                task_id = excluded.task_id
            WHERE calendar_events.user_id = excluded.user_id
            "#,
        )
        .bind(&event.id)
        .bind(owner)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(&event.event_type)
        .bind(&event.color)
        .bind(event.is_all_day)
        .bind(&event.task_id)
        .execute(&mut **tx)
        .await?;
        ensure_owned(result, EntityKind::CalendarEvent, &event.id)?;
    }
    Ok((snapshot.events.len(), inverted))
}

async fn import_files(tx: &mut Transaction<'_, Sqlite>, snapshot: &Snapshot, uid: &str) -> Result<usize> {
    for file in &snapshot.files {
        let owner = resolve_owner(&file.user_id, uid, EntityKind::File, &file.id)?;
        let result = sqlx::query(
            r#"
            INSERT INTO files
                (id, user_id, file_name, file_url, file_size, file_type, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                file_name = excluded.file_name,
                file_url = excluded.file_url,
                file_size = excluded.file_size,
                file_type = excluded.file_type,
                created_at = excluded.created_at
            WHERE files.user_id = excluded.user_id
            "#,
        )
        .bind(&file.id)
        .bind(owner)
        .bind(&file.file_name)
        .bind(&file.file_url)
        .bind(file.file_size)
        .bind(&file.file_type)
        .bind(file.created_at)
        .execute(&mut **tx)
        .await?;
        ensure_owned(result, EntityKind::File, &file.id)?;
    }
    Ok(snapshot.files.len())
}

async fn import_links(tx: &mut Transaction<'_, Sqlite>, snapshot: &Snapshot, uid: &str) -> Result<usize> {
    for link in &snapshot.links {
        let owner = resolve_owner(&link.user_id, uid, EntityKind::Link, &link.id)?;
        let result = sqlx::query(
            r#"
            INSERT INTO links
                (id, user_id, url, title, description, tags, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                url = excluded.url,
                title = excluded.title,
                description = excluded.description,
                tags = excluded.tags,
                created_at = excluded.created_at
            WHERE links.user_id = excluded.user_id
            "#,
        )
        .bind(&link.id)
        .bind(owner)
        .bind(&link.url)
        .bind(&link.title)
        .bind(&link.description)
        .bind(serde_json::to_string(&link.tags)?)
        .bind(link.created_at)
        .execute(&mut **tx)
        .await?;
        ensure_owned(result, EntityKind::Link, &link.id)?;
    }
    Ok(snapshot.links.len())
}

async fn import_daily_logs(tx: &mut Transaction<'_, Sqlite>, snapshot: &Snapshot, uid: &str) -> Result<usize> {
    for day_log in &snapshot.daily_logs {
        let owner = resolve_owner(&day_log.user_id, uid, EntityKind::DailyLog, &day_log.id)?;
        let result = sqlx::query(
            r#"
            INSERT INTO daily_logs
                (id, user_id, title, description, log_date, image_url, file_url, file_name,
                 file_size, video_url, video_type, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                log_date = excluded.log_date,
                image_url = excluded.image_url,
                file_url = excluded.file_url,
                file_name = excluded.file_name,
                file_size = excluded.file_size,
                video_url = excluded.video_url,
                video_type = excluded.video_type,
                created_at = excluded.created_at
            WHERE daily_logs.user_id = excluded.user_id
            "#,
        )
        .bind(&day_log.id)
        .bind(owner)
        .bind(&day_log.title)
        .bind(&day_log.description)
        .bind(day_log.log_date)
        .bind(&day_log.image_url)
        .bind(&day_log.file_url)
        .bind(&day_log.file_name)
        .bind(day_log.file_size)
        .bind(&day_log.video_url)
        .bind(&day_log.video_type)
        .bind(day_log.created_at)
        .execute(&mut **tx)
        .await?;
        ensure_owned(result, EntityKind::DailyLog, &day_log.id)?;
    }
    Ok(snapshot.daily_logs.len())
}

async fn import_spending(tx: &mut Transaction<'_, Sqlite>, snapshot: &Snapshot, uid: &str) -> Result<usize> {
    for entry in &snapshot.spending {
        let owner = resolve_owner(&entry.user_id, uid, EntityKind::Spending, &entry.id)?;
        let result = sqlx::query(
            r#"
            INSERT INTO spending_logs
                (id, user_id, amount, category, description, spend_date)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                amount = excluded.amount,
                category = excluded.category,
                description = excluded.description,
                spend_date = excluded.spend_date
            WHERE spending_logs.user_id = excluded.user_id
            "#,
        )
        .bind(&entry.id)
        .bind(owner)
        .bind(entry.amount)
        .bind(entry.category)
        .bind(&entry.description)
        .bind(entry.spend_date)
        .execute(&mut **tx)
        .await?;
        ensure_owned(result, EntityKind::Spending, &entry.id)?;
    }
    Ok(snapshot.spending.len())
}

async fn import_analytics(tx: &mut Transaction<'_, Sqlite>, snapshot: &Snapshot, uid: &str) -> Result<usize> {
    for event in &snapshot.analytics {
        let owner = resolve_owner(&event.user_id, uid, EntityKind::Analytics, &event.id)?;
        let result = sqlx::query(
            r#"
            INSERT INTO user_analytics
                (id, user_id, event_type, event_data, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                event_type = excluded.event_type,
                event_data = excluded.event_data,
                created_at = excluded.created_at
            WHERE user_analytics.user_id = excluded.user_id
            "#,
        )
        .bind(&event.id)
        .bind(owner)
        .bind(&event.event_type)
        .bind(serde_json::to_string(&event.event_data)?)
        .bind(event.created_at)
        .execute(&mut **tx)
        .await?;
        ensure_owned(result, EntityKind::Analytics, &event.id)?;
    }
    Ok(snapshot.analytics.len())
}

/*
SQLite Notification Repository Adapter

Concrete implementation of the NotificationStore port using SQLite via
sqlx. Owns the schema for the notifications table and runs its migration
on startup.

The keyset page query anchors on the cursor row's (created_at, id) through
subqueries, so an unknown cursor id simply matches nothing and yields an
empty page. The WHERE fragment is built by one helper shared between the
page and count queries.
*/

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};

use crate::application::storage::notification_store::{NotificationStore, PageQuery};
use crate::domain::entities::notification::{NewNotification, Notification, NotificationKind};
use crate::error::FeedError;

#[derive(Debug, Clone)]
pub struct SqliteNotificationRepository {
    pool: SqlitePool,
}

#[derive(Debug, Clone)]
pub struct SqliteConfig {
    pub database_url: String,
    pub max_connections: u32,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:notifeed.db".to_string(),
            max_connections: 10,
        }
    }
}

impl SqliteNotificationRepository {
    /// Connect and run migrations.
    pub async fn new(database_url: &str) -> Result<Self, FeedError> {
        Self::with_config(SqliteConfig {
            database_url: database_url.to_string(),
            ..Default::default()
        })
        .await
    }

    pub async fn with_config(config: SqliteConfig) -> Result<Self, FeedError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .map_err(|e| FeedError::Store(format!("failed to connect to database: {e}")))?;

        let repository = Self { pool };
        repository.migrate().await?;

        Ok(repository)
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the notifications table and its indexes.
    pub async fn migrate(&self) -> Result<(), FeedError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS notifications (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL,
                created_at TEXT NOT NULL,
                read BOOLEAN NOT NULL DEFAULT 0,
                recipient_id INTEGER NOT NULL,
                actor_id INTEGER,
                post_id INTEGER,
                comment_id INTEGER,
                post_title TEXT NOT NULL DEFAULT ''
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| FeedError::Store(format!("migration failed: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_notifications_recipient_read \
             ON notifications(recipient_id, read)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| FeedError::Store(format!("index creation failed: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_notifications_created \
             ON notifications(created_at, id)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| FeedError::Store(format!("index creation failed: {e}")))?;

        info!("notifications schema is up to date");
        Ok(())
    }

    /// Recipient/read filter shared by the page and count queries.
    fn filter_sql(read: Option<bool>) -> &'static str {
        match read {
            Some(_) => "recipient_id = ? AND read = ?",
            None => "recipient_id = ?",
        }
    }

    /// Convert a database row into the domain entity. A kind string with
    /// no taxonomy entry surfaces as UnrecognizedKind here, at the read
    /// boundary.
    fn row_to_notification(row: &sqlx::sqlite::SqliteRow) -> Result<Notification, FeedError> {
        let raw_kind: String = row
            .try_get("kind")
            .map_err(|e| FeedError::Store(format!("failed to get kind: {e}")))?;
        let kind: NotificationKind = raw_kind.parse()?;

        let created_at: DateTime<Utc> = row
            .try_get("created_at")
            .map_err(|e| FeedError::Store(format!("failed to get created_at: {e}")))?;

        Ok(Notification {
            id: row
                .try_get("id")
                .map_err(|e| FeedError::Store(format!("failed to get id: {e}")))?,
            kind,
            created_at,
            read: row
                .try_get("read")
                .map_err(|e| FeedError::Store(format!("failed to get read: {e}")))?,
            recipient_id: row
                .try_get("recipient_id")
                .map_err(|e| FeedError::Store(format!("failed to get recipient_id: {e}")))?,
            actor_id: row
                .try_get("actor_id")
                .map_err(|e| FeedError::Store(format!("failed to get actor_id: {e}")))?,
            post_id: row
                .try_get("post_id")
                .map_err(|e| FeedError::Store(format!("failed to get post_id: {e}")))?,
            comment_id: row
                .try_get("comment_id")
                .map_err(|e| FeedError::Store(format!("failed to get comment_id: {e}")))?,
            post_title: row
                .try_get("post_title")
                .map_err(|e| FeedError::Store(format!("failed to get post_title: {e}")))?,
        })
    }
}

#[async_trait]
impl NotificationStore for SqliteNotificationRepository {
    async fn fetch_page(
        &self,
        recipient_id: i64,
        query: PageQuery,
    ) -> Result<Vec<Notification>, FeedError> {
        let mut sql = format!(
            "SELECT * FROM notifications WHERE {}",
            Self::filter_sql(query.read)
        );
        if query.cursor.is_some() {
            // Anchor at the cursor row inclusive. An unknown cursor id
            // makes both subqueries NULL and the page comes back empty.
            sql.push_str(
                " AND (created_at < (SELECT created_at FROM notifications WHERE id = ?) \
                 OR (created_at = (SELECT created_at FROM notifications WHERE id = ?) \
                 AND id <= ?))",
            );
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?");

        let mut stmt = sqlx::query(&sql).bind(recipient_id);
        if let Some(read) = query.read {
            stmt = stmt.bind(read);
        }
        if let Some(cursor) = query.cursor {
            stmt = stmt.bind(cursor).bind(cursor).bind(cursor);
        }
        let rows = stmt
            .bind(query.take)
            .bind(query.skip)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| FeedError::Store(format!("page query failed: {e}")))?;

        rows.iter().map(Self::row_to_notification).collect()
    }

    async fn count_unread(&self, recipient_id: i64) -> Result<u64, FeedError> {
        let sql = format!(
            "SELECT COUNT(*) as count FROM notifications WHERE {}",
            Self::filter_sql(Some(false))
        );
        let row = sqlx::query(&sql)
            .bind(recipient_id)
            .bind(false)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| FeedError::Store(format!("count query failed: {e}")))?;

        let count: i64 = row
            .try_get("count")
            .map_err(|e| FeedError::Store(format!("failed to get count: {e}")))?;

        Ok(count as u64)
    }

    async fn mark_read(&self, notification_id: i64) -> Result<Notification, FeedError> {
        let result = sqlx::query("UPDATE notifications SET read = 1 WHERE id = ?")
            .bind(notification_id)
            .execute(&self.pool)
            .await
            .map_err(|e| FeedError::Store(format!("read-state update failed: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(FeedError::NotificationNotFound(notification_id));
        }

        let row = sqlx::query("SELECT * FROM notifications WHERE id = ?")
            .bind(notification_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| FeedError::Store(format!("readback failed: {e}")))?;

        Self::row_to_notification(&row)
    }

    async fn create(&self, new: NewNotification) -> Result<Notification, FeedError> {
        let result = sqlx::query(
            r#"
            INSERT INTO notifications (
                kind, created_at, read, recipient_id, actor_id,
                post_id, comment_id, post_title
            ) VALUES (?, ?, 0, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.kind.as_str())
        .bind(new.created_at)
        .bind(new.recipient_id)
        .bind(new.actor_id)
        .bind(new.post_id)
        .bind(new.comment_id)
        .bind(&new.post_title)
        .execute(&self.pool)
        .await
        .map_err(|e| FeedError::Store(format!("insert failed: {e}")))?;

        let id = result.last_insert_rowid();
        let row = sqlx::query("SELECT * FROM notifications WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| FeedError::Store(format!("readback failed: {e}")))?;

        Self::row_to_notification(&row)
    }
}

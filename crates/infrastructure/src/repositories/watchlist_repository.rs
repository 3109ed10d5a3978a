use crate::database::errors::{is_foreign_key_violation, is_unique_violation};
use crate::database::map_sqlx_error;
use async_trait::async_trait;
use ferrous_watchlist_application::ports::WatchlistRepository;
use ferrous_watchlist_domain::watchlist::WATCHED_AT_FORMAT;
use ferrous_watchlist_domain::{DomainError, NewList, NewListItem, NewWatchEvent};
use sqlx::SqlitePool;
use tracing::{error, instrument};

pub struct SqliteWatchlistRepository {
    pool: SqlitePool,
}

impl SqliteWatchlistRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn now() -> String {
        chrono::Utc::now().format(WATCHED_AT_FORMAT).to_string()
    }
}

#[async_trait]
impl WatchlistRepository for SqliteWatchlistRepository {
    #[instrument(skip(self))]
    async fn create_list(&self, list: &NewList) -> Result<i64, DomainError> {
        let now = Self::now();

        let result = sqlx::query(
            "INSERT INTO lists (owner_id, name, description, category, goal_year, goal_month, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(list.owner_id)
        .bind(list.name.trim())
        .bind(&list.description)
        .bind(list.category.as_str())
        .bind(list.goal_year)
        .bind(list.goal_month)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create list");
            map_sqlx_error(e)
        })?;

        Ok(result.last_insert_rowid())
    }

    #[instrument(skip(self))]
    async fn delete_list(&self, list_id: i64) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM lists WHERE id = ?")
            .bind(list_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to delete list");
                map_sqlx_error(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("List {} not found", list_id)));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn add_list_item(&self, list_id: i64, item: &NewListItem) -> Result<i64, DomainError> {
        let now = Self::now();
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let result = sqlx::query(
            "INSERT INTO list_items (list_id, media_id, title, poster_path, vote_average, position, added_at)
             SELECT ?1, ?2, ?3, ?4, ?5, COALESCE(MAX(position), 0) + 1, ?6
             FROM list_items WHERE list_id = ?1",
        )
        .bind(list_id)
        .bind(item.media_id)
        .bind(item.title.trim())
        .bind(&item.poster_path)
        .bind(item.vote_average)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DomainError::NotFound(format!("List {} not found", list_id))
            } else if is_unique_violation(&e) {
                DomainError::BackendRejected(format!(
                    "Media {} is already in list {}",
                    item.media_id, list_id
                ))
            } else {
                error!(error = %e, "Failed to add list item");
                map_sqlx_error(e)
            }
        })?;

        sqlx::query("UPDATE lists SET updated_at = ? WHERE id = ?")
            .bind(&now)
            .bind(list_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(result.last_insert_rowid())
    }

    #[instrument(skip(self))]
    async fn remove_list_item(&self, item_id: i64) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let removed: Option<(i64,)> =
            sqlx::query_as("DELETE FROM list_items WHERE id = ? RETURNING list_id")
                .bind(item_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    error!(error = %e, "Failed to remove list item");
                    map_sqlx_error(e)
                })?;

        let Some((list_id,)) = removed else {
            return Err(DomainError::NotFound(format!(
                "List item {} not found",
                item_id
            )));
        };

        sqlx::query("UPDATE lists SET updated_at = ? WHERE id = ?")
            .bind(Self::now())
            .bind(list_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn record_watch(&self, event: &NewWatchEvent) -> Result<i64, DomainError> {
        let result = sqlx::query(
            "INSERT INTO watch_events (owner_id, media_id, watched_at, rating, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(event.owner_id)
        .bind(event.media_id)
        .bind(event.watched_at_text())
        .bind(event.rating)
        .bind(Self::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to record watch");
            map_sqlx_error(e)
        })?;

        Ok(result.last_insert_rowid())
    }

    #[instrument(skip(self, events), fields(events = events.len()))]
    async fn import_watches(&self, events: &[NewWatchEvent]) -> Result<u64, DomainError> {
        let now = Self::now();
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let mut written = 0u64;

        for event in events {
            let result = sqlx::query(
                "INSERT INTO watch_events (owner_id, media_id, watched_at, rating, created_at)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(event.owner_id)
            .bind(event.media_id)
            .bind(event.watched_at_text())
            .bind(event.rating)
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!(error = %e, media_id = event.media_id, "Failed to import watch");
                map_sqlx_error(e)
            })?;
            written += result.rows_affected();
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(written)
    }
}

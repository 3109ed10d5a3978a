use super::rows::{
    self, FirstOccurrenceRow, GoalListRow, ListItemRow, ListSummaryRow, ReverseMappingRow,
};
use crate::database::map_sqlx_error;
use async_trait::async_trait;
use ferrous_watchlist_application::ports::AggregationGateway;
use ferrous_watchlist_domain::aggregate::{
    FirstOccurrenceParams, GoalsParams, ListItemsParams, OwnerParams,
};
use ferrous_watchlist_domain::{
    AggregateQuery, DomainError, FirstOccurrence, GoalList, ListItemStatus, ListSummary,
    Operation, ReverseMapping,
};
use sqlx::SqlitePool;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, instrument};

const LISTS_WITH_SUMMARY_SQL: &str = "
    SELECT l.id, l.name, l.description, l.category, l.goal_year, l.goal_month, l.updated_at,
           (SELECT COUNT(*) FROM list_items i WHERE i.list_id = l.id) AS item_count,
           (SELECT COUNT(*) FROM list_items i
             WHERE i.list_id = l.id
               AND EXISTS (SELECT 1 FROM watch_events w
                            WHERE w.owner_id = l.owner_id AND w.media_id = i.media_id)
           ) AS watched_count,
           (SELECT i.poster_path FROM list_items i
             WHERE i.list_id = l.id
             ORDER BY i.position, i.id
             LIMIT 1) AS cover_poster_path
    FROM lists l
    WHERE l.owner_id = ?1
    ORDER BY l.updated_at DESC, l.id DESC";

const GOALS_DATA_SQL: &str = "
    WITH goal_lists AS (
        SELECT id, owner_id, name, category
        FROM lists
        WHERE owner_id = ?1
          AND goal_year = ?2
          AND (category = 'yearly_goal' OR (category = 'monthly_goal' AND goal_month = ?3))
    ),
    goal_items AS (
        SELECT g.id AS list_id, i.id AS item_id, i.media_id, i.title, i.poster_path, i.position,
               EXISTS (
                   SELECT 1 FROM watch_events w
                   WHERE w.owner_id = g.owner_id
                     AND w.media_id = i.media_id
                     AND substr(w.watched_at, 1, CASE g.category WHEN 'monthly_goal' THEN 7 ELSE 4 END)
                         = CASE g.category WHEN 'monthly_goal' THEN ?5 ELSE ?4 END
               ) AS matched
        FROM goal_lists g
        JOIN list_items i ON i.list_id = g.id
    )
    SELECT g.category, g.id, g.name,
           (SELECT COUNT(*) FROM goal_items gi WHERE gi.list_id = g.id) AS total_items,
           (SELECT COUNT(*) FROM goal_items gi WHERE gi.list_id = g.id AND gi.matched) AS matched_count,
           (SELECT json_group_array(json_object(
                       'item_id', o.item_id,
                       'media_id', o.media_id,
                       'title', o.title,
                       'poster_path', o.poster_path,
                       'matched', json(CASE WHEN o.matched THEN 'true' ELSE 'false' END)))
              FROM (SELECT * FROM goal_items gi
                     WHERE gi.list_id = g.id
                     ORDER BY gi.position, gi.item_id) o
           ) AS items
    FROM goal_lists g
    ORDER BY CASE g.category WHEN 'yearly_goal' THEN 0 ELSE 1 END, g.id";

const LIST_ITEMS_WITH_STATUS_SQL: &str = "
    SELECT i.id, i.media_id, i.title, i.poster_path, i.position, i.added_at,
           w.id IS NOT NULL AS watched,
           w.id AS watch_event_id,
           w.rating AS user_rating,
           i.vote_average
    FROM list_items i
    JOIN lists l ON l.id = i.list_id
    LEFT JOIN watch_events w ON w.id = (
        SELECT w2.id FROM watch_events w2
        WHERE w2.owner_id = l.owner_id AND w2.media_id = i.media_id
        ORDER BY w2.watched_at DESC, w2.id DESC
        LIMIT 1
    )
    WHERE i.list_id = ?1
    ORDER BY i.position, i.id
    LIMIT ?2 OFFSET ?3";

const REVERSE_MAPPING_SQL: &str = "
    SELECT i.media_id, group_concat(DISTINCT l.goal_year) AS years
    FROM list_items i
    JOIN lists l ON l.id = i.list_id
    WHERE l.owner_id = ?1
      AND l.category IN ('yearly_goal', 'monthly_goal')
      AND l.goal_year IS NOT NULL
    GROUP BY i.media_id
    ORDER BY i.media_id";

/// The five aggregation contracts, each one SQL statement against the
/// backend of record.
pub struct SqliteAggregationGateway {
    pool: SqlitePool,
    timeout: Duration,
}

impl SqliteAggregationGateway {
    pub fn new(pool: SqlitePool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Bounds a backend round trip. Exceeding the bound is reported the same
    /// way as a refused connection.
    async fn bounded<T, F>(&self, operation: Operation, call: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(rows)) => Ok(rows),
            Ok(Err(e)) => {
                error!(operation = %operation, error = %e, "Aggregation query failed");
                Err(map_sqlx_error(e))
            }
            Err(_) => {
                error!(
                    operation = %operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Aggregation query timed out"
                );
                Err(DomainError::BackendUnavailable(format!(
                    "{} timed out after {:?}",
                    operation, self.timeout
                )))
            }
        }
    }
}

#[async_trait]
impl AggregationGateway for SqliteAggregationGateway {
    #[instrument(skip(self))]
    async fn lists_with_summary(
        &self,
        params: &OwnerParams,
    ) -> Result<Vec<ListSummary>, DomainError> {
        AggregateQuery::ListsWithSummary(params.clone()).validate()?;

        let records = self
            .bounded(
                Operation::ListsWithSummary,
                sqlx::query_as::<_, ListSummaryRow>(LISTS_WITH_SUMMARY_SQL)
                    .bind(params.owner_id)
                    .fetch_all(&self.pool),
            )
            .await?;

        debug!(owner_id = params.owner_id, lists = records.len(), "Lists with summary");
        records.into_iter().map(rows::list_summary).collect()
    }

    #[instrument(skip(self), fields(ids = params.media_ids.len()))]
    async fn first_occurrence_dates(
        &self,
        params: &FirstOccurrenceParams,
    ) -> Result<Vec<FirstOccurrence>, DomainError> {
        AggregateQuery::FirstOccurrenceDates(params.clone()).validate()?;

        let ids = params.distinct_ids();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT media_id,
                    date(MIN(watched_at)) AS first_watched_on,
                    CAST(strftime('%Y', MIN(watched_at)) AS INTEGER) AS year
             FROM watch_events
             WHERE media_id IN ({})
             GROUP BY media_id
             ORDER BY media_id",
            placeholders
        );

        let mut query = sqlx::query_as::<_, FirstOccurrenceRow>(&sql);
        for id in &ids {
            query = query.bind(*id);
        }

        let records = self
            .bounded(Operation::FirstOccurrenceDates, query.fetch_all(&self.pool))
            .await?;

        debug!(requested = ids.len(), found = records.len(), "First occurrence dates");
        records.into_iter().map(rows::first_occurrence).collect()
    }

    #[instrument(skip(self))]
    async fn goals_data(&self, params: &GoalsParams) -> Result<Vec<GoalList>, DomainError> {
        AggregateQuery::GoalsData(params.clone()).validate()?;

        let year_prefix = format!("{:04}", params.year);
        let month_prefix = format!("{:04}-{:02}", params.year, params.month);

        let records = self
            .bounded(
                Operation::GoalsData,
                sqlx::query_as::<_, GoalListRow>(GOALS_DATA_SQL)
                    .bind(params.owner_id)
                    .bind(params.year)
                    .bind(params.month)
                    .bind(&year_prefix)
                    .bind(&month_prefix)
                    .fetch_all(&self.pool),
            )
            .await?;

        debug!(owner_id = params.owner_id, goals = records.len(), "Goals data");
        records.into_iter().map(rows::goal_list).collect()
    }

    #[instrument(skip(self))]
    async fn list_items_with_status(
        &self,
        params: &ListItemsParams,
    ) -> Result<Vec<ListItemStatus>, DomainError> {
        AggregateQuery::ListItemsWithStatus(params.clone()).validate()?;

        // SQLite reads a negative LIMIT as "no limit".
        let (limit, offset) = match params.window {
            Some(w) => (i64::from(w.limit), i64::from(w.offset)),
            None => (-1, 0),
        };

        let records = self
            .bounded(
                Operation::ListItemsWithStatus,
                sqlx::query_as::<_, ListItemRow>(LIST_ITEMS_WITH_STATUS_SQL)
                    .bind(params.list_id)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool),
            )
            .await?;

        debug!(list_id = params.list_id, items = records.len(), "List items with status");
        Ok(records.into_iter().map(rows::list_item).collect())
    }

    #[instrument(skip(self))]
    async fn reverse_mapping(
        &self,
        params: &OwnerParams,
    ) -> Result<Vec<ReverseMapping>, DomainError> {
        AggregateQuery::ReverseMapping(params.clone()).validate()?;

        let records = self
            .bounded(
                Operation::ReverseMapping,
                sqlx::query_as::<_, ReverseMappingRow>(REVERSE_MAPPING_SQL)
                    .bind(params.owner_id)
                    .fetch_all(&self.pool),
            )
            .await?;

        debug!(owner_id = params.owner_id, media = records.len(), "Reverse mapping");
        records.into_iter().map(rows::reverse_mapping).collect()
    }
}

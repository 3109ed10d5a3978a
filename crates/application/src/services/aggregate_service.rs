use crate::cache::ResponseCache;
use crate::ports::AggregationGateway;
use crate::services::FetchCoordinator;
use ferrous_watchlist_domain::config::TtlTable;
use ferrous_watchlist_domain::{
    AggregateQuery, AggregateResult, CacheKey, CacheStats, DomainError, FirstOccurrence, GoalList,
    InvalidationScope, ListItemStatus, ListSummary, Operation, ReverseMapping,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Caller-facing entry point: cached, deduplicated aggregation reads and
/// scoped invalidation after mutations.
pub struct AggregateService {
    gateway: Arc<dyn AggregationGateway>,
    coordinator: FetchCoordinator<AggregateResult>,
    ttl: TtlTable,
}

impl AggregateService {
    pub fn new(
        gateway: Arc<dyn AggregationGateway>,
        cache: Arc<ResponseCache<AggregateResult>>,
        ttl: TtlTable,
    ) -> Self {
        Self {
            gateway,
            coordinator: FetchCoordinator::new(cache),
            ttl,
        }
    }

    #[instrument(skip(self), fields(operation = %query.operation()))]
    pub async fn fetch_aggregate(
        &self,
        query: AggregateQuery,
    ) -> Result<Arc<AggregateResult>, DomainError> {
        query.validate()?;

        if query.is_trivially_empty() {
            debug!("Empty request answered without a backend call");
            return Ok(Arc::new(AggregateResult::empty(query.operation())));
        }

        let key = query.cache_key();
        let ttl = self.ttl.ttl_for(query.operation());
        let gateway = Arc::clone(&self.gateway);

        self.coordinator
            .fetch(key, ttl, move || async move { gateway.execute(&query).await })
            .await
    }

    /// Drops cached aggregates made stale by a mutation. Returns the number
    /// of cache entries removed.
    pub fn invalidate(&self, scope: InvalidationScope) -> usize {
        let removed = match &scope {
            InvalidationScope::Keys(keys) => self.coordinator.invalidate_keys(keys),
            InvalidationScope::Operation(operation) => {
                self.coordinator.invalidate_prefix(operation.as_str())
            }
            InvalidationScope::Entity(entity) => {
                let stale: Vec<Operation> = Operation::affected_by(*entity).collect();
                self.coordinator
                    .invalidate_matching(|key| stale.iter().any(|op| key.belongs_to(op.as_str())))
            }
            InvalidationScope::All => {
                let removed = self.coordinator.clear();
                info!(removed = removed, "Response cache cleared");
                removed
            }
        };

        debug!(scope = ?scope, removed = removed, "Invalidation applied");
        removed
    }

    /// Drops every key matching `predicate`, in flight or cached.
    pub fn invalidate_where<P>(&self, predicate: P) -> usize
    where
        P: Fn(&CacheKey) -> bool,
    {
        self.coordinator.invalidate_matching(predicate)
    }

    pub async fn lists_with_summary(&self, owner_id: i64) -> Result<Vec<ListSummary>, DomainError> {
        let result = self
            .fetch_aggregate(AggregateQuery::lists_with_summary(owner_id))
            .await?;
        rows(result.as_lists_with_summary(), Operation::ListsWithSummary)
    }

    pub async fn first_occurrence_dates(
        &self,
        media_ids: &[i64],
    ) -> Result<Vec<FirstOccurrence>, DomainError> {
        let result = self
            .fetch_aggregate(AggregateQuery::first_occurrence_dates(
                media_ids.iter().copied(),
            ))
            .await?;
        rows(
            result.as_first_occurrence_dates(),
            Operation::FirstOccurrenceDates,
        )
    }

    pub async fn goals_data(
        &self,
        owner_id: i64,
        year: i32,
        month: u32,
    ) -> Result<Vec<GoalList>, DomainError> {
        let result = self
            .fetch_aggregate(AggregateQuery::goals_data(owner_id, year, month))
            .await?;
        rows(result.as_goals_data(), Operation::GoalsData)
    }

    pub async fn list_items_with_status(
        &self,
        list_id: i64,
    ) -> Result<Vec<ListItemStatus>, DomainError> {
        let result = self
            .fetch_aggregate(AggregateQuery::list_items_with_status(list_id))
            .await?;
        rows(
            result.as_list_items_with_status(),
            Operation::ListItemsWithStatus,
        )
    }

    /// One window of a list, cached under its own key.
    pub async fn list_items_page(
        &self,
        list_id: i64,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<ListItemStatus>, DomainError> {
        let result = self
            .fetch_aggregate(AggregateQuery::list_items_page(list_id, offset, limit))
            .await?;
        rows(
            result.as_list_items_with_status(),
            Operation::ListItemsWithStatus,
        )
    }

    pub async fn reverse_mapping(&self, owner_id: i64) -> Result<Vec<ReverseMapping>, DomainError> {
        let result = self
            .fetch_aggregate(AggregateQuery::reverse_mapping(owner_id))
            .await?;
        rows(result.as_reverse_mapping(), Operation::ReverseMapping)
    }

    pub fn stats(&self) -> CacheStats {
        self.coordinator.cache().stats()
    }

    pub fn cache(&self) -> Arc<ResponseCache<AggregateResult>> {
        Arc::clone(self.coordinator.cache())
    }

    pub fn coordinator(&self) -> &FetchCoordinator<AggregateResult> {
        &self.coordinator
    }
}

fn rows<T: Clone>(rows: Option<&[T]>, operation: Operation) -> Result<Vec<T>, DomainError> {
    rows.map(<[T]>::to_vec).ok_or_else(|| {
        DomainError::DecodeFailed(format!("{} returned a different result shape", operation))
    })
}

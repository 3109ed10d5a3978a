use ferrous_watchlist_domain::{DomainError, EntityKind, InvalidationScope};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::ports::WatchlistRepository;
use crate::services::AggregateService;

pub struct DeleteListUseCase {
    repo: Arc<dyn WatchlistRepository>,
    aggregates: Arc<AggregateService>,
}

impl DeleteListUseCase {
    pub fn new(repo: Arc<dyn WatchlistRepository>, aggregates: Arc<AggregateService>) -> Self {
        Self { repo, aggregates }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, list_id: i64) -> Result<(), DomainError> {
        self.repo.delete_list(list_id).await?;

        // Items go with the list.
        self.aggregates
            .invalidate(InvalidationScope::Entity(EntityKind::List));
        self.aggregates
            .invalidate(InvalidationScope::Entity(EntityKind::ListItem));

        info!(list_id = list_id, "List deleted");
        Ok(())
    }
}

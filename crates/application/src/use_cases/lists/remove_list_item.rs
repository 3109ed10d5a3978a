use ferrous_watchlist_domain::{DomainError, EntityKind, InvalidationScope};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::ports::WatchlistRepository;
use crate::services::AggregateService;

pub struct RemoveListItemUseCase {
    repo: Arc<dyn WatchlistRepository>,
    aggregates: Arc<AggregateService>,
}

impl RemoveListItemUseCase {
    pub fn new(repo: Arc<dyn WatchlistRepository>, aggregates: Arc<AggregateService>) -> Self {
        Self { repo, aggregates }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, item_id: i64) -> Result<(), DomainError> {
        self.repo.remove_list_item(item_id).await?;
        self.aggregates
            .invalidate(InvalidationScope::Entity(EntityKind::ListItem));

        info!(item_id = item_id, "Item removed from list");
        Ok(())
    }
}

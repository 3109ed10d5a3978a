use ferrous_watchlist_domain::{DomainError, EntityKind, InvalidationScope, NewListItem};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::ports::WatchlistRepository;
use crate::services::AggregateService;

pub struct AddListItemUseCase {
    repo: Arc<dyn WatchlistRepository>,
    aggregates: Arc<AggregateService>,
}

impl AddListItemUseCase {
    pub fn new(repo: Arc<dyn WatchlistRepository>, aggregates: Arc<AggregateService>) -> Self {
        Self { repo, aggregates }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, list_id: i64, item: NewListItem) -> Result<i64, DomainError> {
        item.validate()?;

        let item_id = self.repo.add_list_item(list_id, &item).await?;
        self.aggregates
            .invalidate(InvalidationScope::Entity(EntityKind::ListItem));

        info!(
            list_id = list_id,
            item_id = item_id,
            media_id = item.media_id,
            "Item added to list"
        );

        Ok(item_id)
    }
}

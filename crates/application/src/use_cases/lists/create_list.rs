use ferrous_watchlist_domain::{DomainError, EntityKind, InvalidationScope, NewList};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::ports::WatchlistRepository;
use crate::services::AggregateService;

pub struct CreateListUseCase {
    repo: Arc<dyn WatchlistRepository>,
    aggregates: Arc<AggregateService>,
}

impl CreateListUseCase {
    pub fn new(repo: Arc<dyn WatchlistRepository>, aggregates: Arc<AggregateService>) -> Self {
        Self { repo, aggregates }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, list: NewList) -> Result<i64, DomainError> {
        list.validate()?;

        let list_id = self.repo.create_list(&list).await?;
        let invalidated = self
            .aggregates
            .invalidate(InvalidationScope::Entity(EntityKind::List));

        info!(
            list_id = list_id,
            owner_id = list.owner_id,
            category = list.category.as_str(),
            invalidated = invalidated,
            "List created"
        );

        Ok(list_id)
    }
}

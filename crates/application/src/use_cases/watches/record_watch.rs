use ferrous_watchlist_domain::{DomainError, EntityKind, InvalidationScope, NewWatchEvent};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::ports::WatchlistRepository;
use crate::services::AggregateService;

pub struct RecordWatchUseCase {
    repo: Arc<dyn WatchlistRepository>,
    aggregates: Arc<AggregateService>,
}

impl RecordWatchUseCase {
    pub fn new(repo: Arc<dyn WatchlistRepository>, aggregates: Arc<AggregateService>) -> Self {
        Self { repo, aggregates }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, event: NewWatchEvent) -> Result<i64, DomainError> {
        event.validate()?;

        let event_id = self.repo.record_watch(&event).await?;
        self.aggregates
            .invalidate(InvalidationScope::Entity(EntityKind::WatchEvent));

        info!(
            event_id = event_id,
            owner_id = event.owner_id,
            media_id = event.media_id,
            "Watch recorded"
        );

        Ok(event_id)
    }
}

use ferrous_watchlist_domain::{DomainError, InvalidationScope, NewWatchEvent};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::ports::WatchlistRepository;
use crate::services::AggregateService;

/// Bulk insert of watch events. Clears the whole response cache afterwards
/// instead of working out which aggregates the batch touched.
pub struct ImportWatchHistoryUseCase {
    repo: Arc<dyn WatchlistRepository>,
    aggregates: Arc<AggregateService>,
}

impl ImportWatchHistoryUseCase {
    pub fn new(repo: Arc<dyn WatchlistRepository>, aggregates: Arc<AggregateService>) -> Self {
        Self { repo, aggregates }
    }

    #[instrument(skip(self, events), fields(events = events.len()))]
    pub async fn execute(&self, events: Vec<NewWatchEvent>) -> Result<u64, DomainError> {
        if events.is_empty() {
            return Ok(0);
        }

        for event in &events {
            event.validate()?;
        }

        let imported = self.repo.import_watches(&events).await?;
        self.aggregates.invalidate(InvalidationScope::All);

        info!(imported = imported, "Watch history imported");
        Ok(imported)
    }
}

use super::PageLoader;
use crate::services::AggregateService;
use async_trait::async_trait;
use ferrous_watchlist_domain::{DomainError, ListItemStatus, Operation};
use std::sync::Arc;

/// Pages `list_items_with_status` windows through the aggregate service, so
/// each window is cached and concurrent requests for it share one call.
pub struct ListItemsPageLoader {
    service: Arc<AggregateService>,
    list_id: i64,
}

impl ListItemsPageLoader {
    pub fn new(service: Arc<AggregateService>, list_id: i64) -> Self {
        Self { service, list_id }
    }

    pub fn list_id(&self) -> i64 {
        self.list_id
    }
}

#[async_trait]
impl PageLoader for ListItemsPageLoader {
    type Item = ListItemStatus;

    async fn load_page(&self, offset: usize, limit: usize) -> Result<Vec<ListItemStatus>, DomainError> {
        let offset = u32::try_from(offset)
            .map_err(|_| DomainError::BackendRejected(format!("offset {} out of range", offset)))?;
        let limit = u32::try_from(limit)
            .map_err(|_| DomainError::BackendRejected(format!("limit {} out of range", limit)))?;

        self.service
            .list_items_page(self.list_id, offset, limit)
            .await
    }

    /// Drops every cached or in-flight window of this list.
    fn reset(&self) {
        let list_id = self.list_id.to_string();
        self.service.invalidate_where(|key| {
            key.belongs_to(Operation::ListItemsWithStatus.as_str())
                && key.param("list_id") == Some(list_id.as_str())
        });
    }
}

use async_trait::async_trait;
use ferrous_watchlist_domain::{DomainError, NewList, NewListItem, NewWatchEvent};

/// Write side of the backend. Callers are responsible for invalidating the
/// aggregates a mutation makes stale.
#[async_trait]
pub trait WatchlistRepository: Send + Sync {
    /// Creates a list and returns its id.
    async fn create_list(&self, list: &NewList) -> Result<i64, DomainError>;

    /// Deletes a list and its items.
    ///
    /// # Errors
    ///
    /// * `DomainError::NotFound` - If no list has this id
    async fn delete_list(&self, list_id: i64) -> Result<(), DomainError>;

    /// Appends an item to a list and returns the item id.
    ///
    /// # Errors
    ///
    /// * `DomainError::NotFound` - If the list doesn't exist
    /// * `DomainError::BackendRejected` - If the media is already in the list
    async fn add_list_item(&self, list_id: i64, item: &NewListItem) -> Result<i64, DomainError>;

    /// # Errors
    ///
    /// * `DomainError::NotFound` - If no item has this id
    async fn remove_list_item(&self, item_id: i64) -> Result<(), DomainError>;

    /// Records a watch and returns the event id.
    async fn record_watch(&self, event: &NewWatchEvent) -> Result<i64, DomainError>;

    /// Bulk insert in one transaction. Returns the number of rows written.
    async fn import_watches(&self, events: &[NewWatchEvent]) -> Result<u64, DomainError>;
}

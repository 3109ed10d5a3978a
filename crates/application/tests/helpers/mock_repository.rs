#![allow(dead_code)]

use async_trait::async_trait;
use ferrous_watchlist_application::ports::WatchlistRepository;
use ferrous_watchlist_domain::{DomainError, NewList, NewListItem, NewWatchEvent};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

// ============================================================================
// Mock WatchlistRepository
// ============================================================================

#[derive(Clone, Default)]
pub struct MockWatchlistRepository {
    next_id: Arc<AtomicI64>,
    lists: Arc<RwLock<Vec<(i64, NewList)>>>,
    items: Arc<RwLock<Vec<(i64, i64, NewListItem)>>>,
    watches: Arc<RwLock<Vec<NewWatchEvent>>>,
    fail_with: Arc<RwLock<Option<DomainError>>>,
}

impl MockWatchlistRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_failure(&self, error: Option<DomainError>) {
        *self.fail_with.write().await = error;
    }

    pub async fn list_count(&self) -> usize {
        self.lists.read().await.len()
    }

    pub async fn item_count(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn watch_count(&self) -> usize {
        self.watches.read().await.len()
    }

    async fn check(&self) -> Result<i64, DomainError> {
        if let Some(error) = self.fail_with.read().await.clone() {
            return Err(error);
        }
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[async_trait]
impl WatchlistRepository for MockWatchlistRepository {
    async fn create_list(&self, list: &NewList) -> Result<i64, DomainError> {
        let id = self.check().await?;
        self.lists.write().await.push((id, list.clone()));
        Ok(id)
    }

    async fn delete_list(&self, list_id: i64) -> Result<(), DomainError> {
        self.check().await?;
        let mut lists = self.lists.write().await;
        let before = lists.len();
        lists.retain(|(id, _)| *id != list_id);
        if lists.len() == before {
            return Err(DomainError::NotFound(format!("list {}", list_id)));
        }
        self.items.write().await.retain(|(_, owner, _)| *owner != list_id);
        Ok(())
    }

    async fn add_list_item(&self, list_id: i64, item: &NewListItem) -> Result<i64, DomainError> {
        let id = self.check().await?;
        if !self.lists.read().await.iter().any(|(l, _)| *l == list_id) {
            return Err(DomainError::NotFound(format!("list {}", list_id)));
        }
        self.items.write().await.push((id, list_id, item.clone()));
        Ok(id)
    }

    async fn remove_list_item(&self, item_id: i64) -> Result<(), DomainError> {
        self.check().await?;
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|(id, _, _)| *id != item_id);
        if items.len() == before {
            return Err(DomainError::NotFound(format!("list item {}", item_id)));
        }
        Ok(())
    }

    async fn record_watch(&self, event: &NewWatchEvent) -> Result<i64, DomainError> {
        let id = self.check().await?;
        self.watches.write().await.push(event.clone());
        Ok(id)
    }

    async fn import_watches(&self, events: &[NewWatchEvent]) -> Result<u64, DomainError> {
        self.check().await?;
        self.watches.write().await.extend_from_slice(events);
        Ok(events.len() as u64)
    }
}

use async_trait::async_trait;
use ferrous_watchlist_domain::DomainError;

/// Source of fixed-size windows over an ordered collection.
#[async_trait]
pub trait PageLoader: Send + Sync {
    type Item: Clone + Send + Sync + 'static;

    /// At most `limit` items starting at `offset`. Fewer than `limit` means
    /// the collection ends inside this window.
    async fn load_page(&self, offset: usize, limit: usize) -> Result<Vec<Self::Item>, DomainError>;

    /// Called before a refresh or jump so the next load bypasses anything
    /// memoized for the old view.
    fn reset(&self) {}
}

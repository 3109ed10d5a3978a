use ferrous_watchlist_application::cache::ResponseCache;
use ferrous_watchlist_domain::AggregateResult;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Periodic active expiry for the response cache. Lookups already treat
/// expired entries as absent; the sweep releases their memory.
pub struct CacheSweepJob {
    cache: Arc<ResponseCache<AggregateResult>>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl CacheSweepJob {
    pub fn new(cache: Arc<ResponseCache<AggregateResult>>) -> Self {
        Self {
            cache,
            interval_secs: 60,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs.max(1);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// One sweep. Returns the number of entries removed.
    pub fn run_once(&self) -> usize {
        self.cache.purge_expired()
    }

    pub async fn start(self: Arc<Self>) {
        info!(interval_secs = self.interval_secs, "Starting cache sweep job");

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("CacheSweepJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let removed = self.run_once();
                        debug!(
                            removed = removed,
                            remaining = self.cache.len(),
                            "CacheSweepJob: sweep completed"
                        );
                    }
                }
            }
        });
    }
}

use crate::CacheSweepJob;
use std::sync::Arc;
use tracing::info;

/// Starts the registered background jobs.
///
/// ```rust,ignore
/// JobRunner::new()
///     .with_cache_sweep(CacheSweepJob::new(cache).with_interval(60))
///     .start()
///     .await;
/// ```
pub struct JobRunner {
    cache_sweep: Option<CacheSweepJob>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self { cache_sweep: None }
    }

    pub fn with_cache_sweep(mut self, job: CacheSweepJob) -> Self {
        self.cache_sweep = Some(job);
        self
    }

    /// Returns how many jobs were started.
    pub async fn start(self) -> usize {
        info!("Starting background job runner");
        let mut started = 0;

        if let Some(job) = self.cache_sweep {
            Arc::new(job).start().await;
            started += 1;
        }

        info!(jobs = started, "All background jobs started");
        started
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}

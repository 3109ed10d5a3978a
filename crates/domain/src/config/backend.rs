use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const MAX_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Bound on a single aggregation call. A call exceeding it is reported
    /// as `BackendUnavailable` (default: 15)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    15
}

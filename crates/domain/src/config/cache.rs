use crate::operation::Operation;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Response cache ceilings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Entry-count ceiling (default: 1024)
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Approximate memory ceiling in bytes (default: 8 MiB)
    #[serde(default = "default_max_cost_bytes")]
    pub max_cost_bytes: usize,

    /// Period of the active expiry sweep (default: 60)
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    #[serde(default)]
    pub ttl: TtlTable,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            max_cost_bytes: default_max_cost_bytes(),
            sweep_interval_secs: default_sweep_interval_secs(),
            ttl: TtlTable::default(),
        }
    }
}

/// Fixed per-operation TTLs, in seconds.
///
/// Aggregates over user mutations get minutes; aggregates over data that
/// rarely changes get hours.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TtlTable {
    #[serde(default = "default_lists_with_summary_secs")]
    pub lists_with_summary_secs: u64,
    #[serde(default = "default_list_items_with_status_secs")]
    pub list_items_with_status_secs: u64,
    #[serde(default = "default_goals_data_secs")]
    pub goals_data_secs: u64,
    #[serde(default = "default_reverse_mapping_secs")]
    pub reverse_mapping_secs: u64,
    #[serde(default = "default_first_occurrence_dates_secs")]
    pub first_occurrence_dates_secs: u64,
}

impl TtlTable {
    pub fn ttl_for(&self, operation: Operation) -> Duration {
        let secs = match operation {
            Operation::ListsWithSummary => self.lists_with_summary_secs,
            Operation::ListItemsWithStatus => self.list_items_with_status_secs,
            Operation::GoalsData => self.goals_data_secs,
            Operation::ReverseMapping => self.reverse_mapping_secs,
            Operation::FirstOccurrenceDates => self.first_occurrence_dates_secs,
        };
        Duration::from_secs(secs)
    }
}

impl Default for TtlTable {
    fn default() -> Self {
        Self {
            lists_with_summary_secs: default_lists_with_summary_secs(),
            list_items_with_status_secs: default_list_items_with_status_secs(),
            goals_data_secs: default_goals_data_secs(),
            reverse_mapping_secs: default_reverse_mapping_secs(),
            first_occurrence_dates_secs: default_first_occurrence_dates_secs(),
        }
    }
}

fn default_max_entries() -> usize {
    1024
}

fn default_max_cost_bytes() -> usize {
    8 * 1024 * 1024
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_lists_with_summary_secs() -> u64 {
    120
}

fn default_list_items_with_status_secs() -> u64 {
    120
}

fn default_goals_data_secs() -> u64 {
    300
}

fn default_reverse_mapping_secs() -> u64 {
    1800
}

fn default_first_occurrence_dates_secs() -> u64 {
    3600
}

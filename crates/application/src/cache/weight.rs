use ferrous_watchlist_domain::{
    AggregateResult, FirstOccurrence, GoalItem, GoalList, ListItemStatus, ListSummary,
    ReverseMapping,
};
use std::mem::size_of;

/// Approximate heap + inline footprint of a cached payload, in bytes.
///
/// Strings count their length, fixed fields count their inline size.
pub trait CacheWeight {
    fn weight(&self) -> usize;
}

impl CacheWeight for String {
    fn weight(&self) -> usize {
        size_of::<String>() + self.len()
    }
}

impl<T: CacheWeight> CacheWeight for Vec<T> {
    fn weight(&self) -> usize {
        size_of::<Vec<T>>() + self.iter().map(CacheWeight::weight).sum::<usize>()
    }
}

fn opt_len(s: &Option<String>) -> usize {
    s.as_ref().map_or(0, String::len)
}

impl CacheWeight for ListSummary {
    fn weight(&self) -> usize {
        size_of::<Self>()
            + self.name.len()
            + opt_len(&self.description)
            + self.updated_at.len()
            + opt_len(&self.cover_poster_path)
    }
}

impl CacheWeight for FirstOccurrence {
    fn weight(&self) -> usize {
        size_of::<Self>()
    }
}

impl CacheWeight for GoalItem {
    fn weight(&self) -> usize {
        size_of::<Self>() + self.title.len() + opt_len(&self.poster_path)
    }
}

impl CacheWeight for GoalList {
    fn weight(&self) -> usize {
        size_of::<Self>() + self.name.len() + self.items.weight()
    }
}

impl CacheWeight for ListItemStatus {
    fn weight(&self) -> usize {
        size_of::<Self>() + self.title.len() + opt_len(&self.poster_path) + self.added_at.len()
    }
}

impl CacheWeight for ReverseMapping {
    fn weight(&self) -> usize {
        // BTreeSet node overhead: count each year twice.
        size_of::<Self>() + self.years.len() * size_of::<i32>() * 2
    }
}

impl CacheWeight for AggregateResult {
    fn weight(&self) -> usize {
        match self {
            AggregateResult::ListsWithSummary(rows) => rows.weight(),
            AggregateResult::FirstOccurrenceDates(rows) => rows.weight(),
            AggregateResult::GoalsData(rows) => rows.weight(),
            AggregateResult::ListItemsWithStatus(rows) => rows.weight(),
            AggregateResult::ReverseMapping(rows) => rows.weight(),
        }
    }
}

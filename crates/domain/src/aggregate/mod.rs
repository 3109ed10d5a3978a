//! Aggregation contracts: typed requests and the typed rows they produce.

pub mod query;
pub mod result;

pub use query::{
    AggregateQuery, FirstOccurrenceParams, GoalsParams, ListItemsParams, OwnerParams, PageWindow,
};
pub use result::{
    AggregateResult, FirstOccurrence, GoalItem, GoalList, ListItemStatus, ListSummary,
    ReverseMapping,
};

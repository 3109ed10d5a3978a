use crate::operation::Operation;
use crate::watchlist::ListCategory;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A list with its derived counters, computed in a single backend round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSummary {
    pub list_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: ListCategory,
    pub goal_year: Option<i32>,
    pub goal_month: Option<u32>,
    pub updated_at: String,
    pub item_count: u32,
    /// Items the list owner has watched.
    pub watched_count: u32,
    /// Poster of the first item by position. `None` for an empty list.
    pub cover_poster_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstOccurrence {
    pub media_id: i64,
    pub first_watched_on: NaiveDate,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalItem {
    pub item_id: i64,
    pub media_id: i64,
    pub title: String,
    pub poster_path: Option<String>,
    /// Watched inside the goal period.
    pub matched: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalList {
    pub category: ListCategory,
    pub list_id: i64,
    pub name: String,
    pub total_items: u32,
    pub matched_count: u32,
    pub items: Vec<GoalItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItemStatus {
    pub item_id: i64,
    pub media_id: i64,
    pub title: String,
    pub poster_path: Option<String>,
    pub position: i64,
    pub added_at: String,
    pub watched: bool,
    /// Most recent watch event of the list owner for this media.
    pub watch_event_id: Option<i64>,
    pub user_rating: Option<f64>,
    pub vote_average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseMapping {
    pub media_id: i64,
    pub years: BTreeSet<i32>,
}

/// Tagged union of the five result shapes, so cached payloads stay typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", content = "rows", rename_all = "snake_case")]
pub enum AggregateResult {
    ListsWithSummary(Vec<ListSummary>),
    FirstOccurrenceDates(Vec<FirstOccurrence>),
    GoalsData(Vec<GoalList>),
    ListItemsWithStatus(Vec<ListItemStatus>),
    ReverseMapping(Vec<ReverseMapping>),
}

impl AggregateResult {
    /// The "no data" result of an operation. Never an error.
    pub fn empty(operation: Operation) -> Self {
        match operation {
            Operation::ListsWithSummary => Self::ListsWithSummary(Vec::new()),
            Operation::FirstOccurrenceDates => Self::FirstOccurrenceDates(Vec::new()),
            Operation::GoalsData => Self::GoalsData(Vec::new()),
            Operation::ListItemsWithStatus => Self::ListItemsWithStatus(Vec::new()),
            Operation::ReverseMapping => Self::ReverseMapping(Vec::new()),
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Self::ListsWithSummary(_) => Operation::ListsWithSummary,
            Self::FirstOccurrenceDates(_) => Operation::FirstOccurrenceDates,
            Self::GoalsData(_) => Operation::GoalsData,
            Self::ListItemsWithStatus(_) => Operation::ListItemsWithStatus,
            Self::ReverseMapping(_) => Operation::ReverseMapping,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::ListsWithSummary(rows) => rows.len(),
            Self::FirstOccurrenceDates(rows) => rows.len(),
            Self::GoalsData(rows) => rows.len(),
            Self::ListItemsWithStatus(rows) => rows.len(),
            Self::ReverseMapping(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_lists_with_summary(&self) -> Option<&[ListSummary]> {
        match self {
            Self::ListsWithSummary(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn as_first_occurrence_dates(&self) -> Option<&[FirstOccurrence]> {
        match self {
            Self::FirstOccurrenceDates(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn as_goals_data(&self) -> Option<&[GoalList]> {
        match self {
            Self::GoalsData(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn as_list_items_with_status(&self) -> Option<&[ListItemStatus]> {
        match self {
            Self::ListItemsWithStatus(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn as_reverse_mapping(&self) -> Option<&[ReverseMapping]> {
        match self {
            Self::ReverseMapping(rows) => Some(rows),
            _ => None,
        }
    }
}

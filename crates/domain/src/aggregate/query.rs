use crate::cache_key::{CacheKey, ParamValue};
use crate::errors::DomainError;
use crate::operation::Operation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 9999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerParams {
    pub owner_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstOccurrenceParams {
    pub media_ids: Vec<i64>,
}

impl FirstOccurrenceParams {
    pub fn new<I: IntoIterator<Item = i64>>(media_ids: I) -> Self {
        Self {
            media_ids: media_ids.into_iter().collect(),
        }
    }

    /// Sorted ids with duplicates removed.
    pub fn distinct_ids(&self) -> Vec<i64> {
        self.media_ids
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalsParams {
    pub owner_id: i64,
    pub year: i32,
    pub month: u32,
}

/// Offset/limit window over an ordered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub offset: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItemsParams {
    pub list_id: i64,
    /// `None` returns the whole list.
    pub window: Option<PageWindow>,
}

/// A typed request for one of the five aggregation contracts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum AggregateQuery {
    ListsWithSummary(OwnerParams),
    FirstOccurrenceDates(FirstOccurrenceParams),
    GoalsData(GoalsParams),
    ListItemsWithStatus(ListItemsParams),
    ReverseMapping(OwnerParams),
}

impl AggregateQuery {
    pub fn lists_with_summary(owner_id: i64) -> Self {
        Self::ListsWithSummary(OwnerParams { owner_id })
    }

    pub fn first_occurrence_dates<I: IntoIterator<Item = i64>>(media_ids: I) -> Self {
        Self::FirstOccurrenceDates(FirstOccurrenceParams::new(media_ids))
    }

    pub fn goals_data(owner_id: i64, year: i32, month: u32) -> Self {
        Self::GoalsData(GoalsParams {
            owner_id,
            year,
            month,
        })
    }

    pub fn list_items_with_status(list_id: i64) -> Self {
        Self::ListItemsWithStatus(ListItemsParams {
            list_id,
            window: None,
        })
    }

    pub fn list_items_page(list_id: i64, offset: u32, limit: u32) -> Self {
        Self::ListItemsWithStatus(ListItemsParams {
            list_id,
            window: Some(PageWindow { offset, limit }),
        })
    }

    pub fn reverse_mapping(owner_id: i64) -> Self {
        Self::ReverseMapping(OwnerParams { owner_id })
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

    pub fn cache_key(&self) -> CacheKey {
        let builder = CacheKey::builder(self.operation().as_str());
        match self {
            Self::ListsWithSummary(p) | Self::ReverseMapping(p) => {
                builder.param("owner_id", p.owner_id).build()
            }
            Self::FirstOccurrenceDates(p) => builder
                .param("media_ids", ParamValue::int_set(p.media_ids.iter().copied()))
                .build(),
            Self::GoalsData(p) => builder
                .param("owner_id", p.owner_id)
                .param("year", p.year)
                .param("month", p.month)
                .build(),
            Self::ListItemsWithStatus(p) => {
                let builder = builder.param("list_id", p.list_id);
                match p.window {
                    Some(w) => builder
                        .param("offset", w.offset)
                        .param("limit", w.limit)
                        .build(),
                    None => builder.build(),
                }
            }
        }
    }

    /// True when the request needs no backend call to answer.
    pub fn is_trivially_empty(&self) -> bool {
        matches!(self, Self::FirstOccurrenceDates(p) if p.media_ids.is_empty())
    }

    /// Rejects malformed parameters before anything reaches the backend.
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            Self::ListsWithSummary(p) | Self::ReverseMapping(p) => {
                positive_id("owner_id", p.owner_id)
            }
            Self::FirstOccurrenceDates(p) => p
                .media_ids
                .iter()
                .try_for_each(|id| positive_id("media_ids", *id)),
            Self::GoalsData(p) => {
                positive_id("owner_id", p.owner_id)?;
                if !(MIN_YEAR..=MAX_YEAR).contains(&p.year) {
                    return Err(DomainError::BackendRejected(format!(
                        "year {} outside {}..={}",
                        p.year, MIN_YEAR, MAX_YEAR
                    )));
                }
                if !(1..=12).contains(&p.month) {
                    return Err(DomainError::BackendRejected(format!(
                        "month {} outside 1..=12",
                        p.month
                    )));
                }
                Ok(())
            }
            Self::ListItemsWithStatus(p) => {
                positive_id("list_id", p.list_id)?;
                match p.window {
                    Some(w) if w.limit == 0 => Err(DomainError::BackendRejected(
                        "page limit must be greater than zero".to_string(),
                    )),
                    _ => Ok(()),
                }
            }
        }
    }
}

fn positive_id(name: &str, id: i64) -> Result<(), DomainError> {
    if id <= 0 {
        return Err(DomainError::BackendRejected(format!(
            "{} must be positive, got {}",
            name, id
        )));
    }
    Ok(())
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Entity kinds whose mutation can make cached aggregates stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    List,
    ListItem,
    WatchEvent,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::List => "list",
            EntityKind::ListItem => "list_item",
            EntityKind::WatchEvent => "watch_event",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five aggregation contracts exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    ListsWithSummary,
    FirstOccurrenceDates,
    GoalsData,
    ListItemsWithStatus,
    ReverseMapping,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::ListsWithSummary,
        Operation::FirstOccurrenceDates,
        Operation::GoalsData,
        Operation::ListItemsWithStatus,
        Operation::ReverseMapping,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ListsWithSummary => "lists_with_summary",
            Operation::FirstOccurrenceDates => "first_occurrence_dates",
            Operation::GoalsData => "goals_data",
            Operation::ListItemsWithStatus => "list_items_with_status",
            Operation::ReverseMapping => "reverse_mapping",
        }
    }

    /// Entity kinds this operation reads. Used for selective invalidation.
    pub fn depends_on(&self) -> &'static [EntityKind] {
        match self {
            Operation::ListsWithSummary => {
                &[EntityKind::List, EntityKind::ListItem, EntityKind::WatchEvent]
            }
            Operation::FirstOccurrenceDates => &[EntityKind::WatchEvent],
            Operation::GoalsData => &[EntityKind::List, EntityKind::ListItem, EntityKind::WatchEvent],
            Operation::ListItemsWithStatus => {
                &[EntityKind::List, EntityKind::ListItem, EntityKind::WatchEvent]
            }
            Operation::ReverseMapping => &[EntityKind::List, EntityKind::ListItem],
        }
    }

    pub fn reads(&self, entity: EntityKind) -> bool {
        self.depends_on().contains(&entity)
    }

    /// Operations that have to be dropped when `entity` is mutated.
    pub fn affected_by(entity: EntityKind) -> impl Iterator<Item = Operation> {
        Self::ALL.into_iter().filter(move |op| op.reads(entity))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| format!("unknown aggregation operation '{}'", s))
    }
}

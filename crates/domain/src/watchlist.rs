use crate::errors::DomainError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const WATCHED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListCategory {
    #[default]
    Custom,
    YearlyGoal,
    MonthlyGoal,
}

impl ListCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListCategory::Custom => "custom",
            ListCategory::YearlyGoal => "yearly_goal",
            ListCategory::MonthlyGoal => "monthly_goal",
        }
    }

    pub fn is_goal(&self) -> bool {
        !matches!(self, ListCategory::Custom)
    }
}

impl fmt::Display for ListCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "custom" => Ok(ListCategory::Custom),
            "yearly_goal" => Ok(ListCategory::YearlyGoal),
            "monthly_goal" => Ok(ListCategory::MonthlyGoal),
            other => Err(format!("unknown list category '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewList {
    pub owner_id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub category: ListCategory,
    pub goal_year: Option<i32>,
    pub goal_month: Option<u32>,
}

impl NewList {
    pub fn custom(owner_id: i64, name: impl Into<String>) -> Self {
        Self {
            owner_id,
            name: name.into(),
            description: None,
            category: ListCategory::Custom,
            goal_year: None,
            goal_month: None,
        }
    }

    pub fn yearly_goal(owner_id: i64, name: impl Into<String>, year: i32) -> Self {
        Self {
            category: ListCategory::YearlyGoal,
            goal_year: Some(year),
            ..Self::custom(owner_id, name)
        }
    }

    pub fn monthly_goal(owner_id: i64, name: impl Into<String>, year: i32, month: u32) -> Self {
        Self {
            category: ListCategory::MonthlyGoal,
            goal_year: Some(year),
            goal_month: Some(month),
            ..Self::custom(owner_id, name)
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.owner_id <= 0 {
            return Err(DomainError::BackendRejected(
                "owner_id must be positive".to_string(),
            ));
        }

        let name = self.name.trim();
        if name.is_empty() {
            return Err(DomainError::BackendRejected(
                "List name cannot be empty".to_string(),
            ));
        }
        if name.len() > 100 {
            return Err(DomainError::BackendRejected(
                "List name cannot exceed 100 characters".to_string(),
            ));
        }

        match self.category {
            ListCategory::Custom => Ok(()),
            ListCategory::YearlyGoal if self.goal_year.is_some() => Ok(()),
            ListCategory::MonthlyGoal
                if self.goal_year.is_some()
                    && self.goal_month.is_some_and(|m| (1..=12).contains(&m)) =>
            {
                Ok(())
            }
            category => Err(DomainError::BackendRejected(format!(
                "{} lists need a goal period",
                category
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewListItem {
    pub media_id: i64,
    pub title: String,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
}

impl NewListItem {
    pub fn new(media_id: i64, title: impl Into<String>) -> Self {
        Self {
            media_id,
            title: title.into(),
            poster_path: None,
            vote_average: None,
        }
    }

    pub fn with_poster(mut self, poster_path: impl Into<String>) -> Self {
        self.poster_path = Some(poster_path.into());
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.media_id <= 0 {
            return Err(DomainError::BackendRejected(
                "media_id must be positive".to_string(),
            ));
        }
        if self.title.trim().is_empty() {
            return Err(DomainError::BackendRejected(
                "Item title cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWatchEvent {
    pub owner_id: i64,
    pub media_id: i64,
    pub watched_at: NaiveDateTime,
    pub rating: Option<f64>,
}

impl NewWatchEvent {
    pub fn new(owner_id: i64, media_id: i64, watched_at: NaiveDateTime) -> Self {
        Self {
            owner_id,
            media_id,
            watched_at,
            rating: None,
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn watched_at_text(&self) -> String {
        self.watched_at.format(WATCHED_AT_FORMAT).to_string()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.owner_id <= 0 || self.media_id <= 0 {
            return Err(DomainError::BackendRejected(
                "owner_id and media_id must be positive".to_string(),
            ));
        }
        if let Some(rating) = self.rating {
            if !(0.0..=10.0).contains(&rating) {
                return Err(DomainError::BackendRejected(format!(
                    "rating {} outside 0..=10",
                    rating
                )));
            }
        }
        Ok(())
    }
}

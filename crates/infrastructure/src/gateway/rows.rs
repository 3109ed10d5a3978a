use chrono::NaiveDate;
use ferrous_watchlist_domain::{
    DomainError, FirstOccurrence, GoalItem, GoalList, ListCategory, ListItemStatus, ListSummary,
    ReverseMapping,
};
use std::collections::BTreeSet;
use std::str::FromStr;

pub type ListSummaryRow = (
    i64,
    String,
    Option<String>,
    String,
    Option<i64>,
    Option<i64>,
    String,
    i64,
    i64,
    Option<String>,
);

pub type FirstOccurrenceRow = (i64, Option<String>, Option<i64>);

pub type GoalListRow = (String, i64, String, i64, i64, String);

pub type ListItemRow = (
    i64,
    i64,
    String,
    Option<String>,
    i64,
    String,
    bool,
    Option<i64>,
    Option<f64>,
    Option<f64>,
);

pub type ReverseMappingRow = (i64, Option<String>);

pub fn list_summary(row: ListSummaryRow) -> Result<ListSummary, DomainError> {
    let (
        list_id,
        name,
        description,
        category,
        goal_year,
        goal_month,
        updated_at,
        item_count,
        watched_count,
        cover_poster_path,
    ) = row;

    Ok(ListSummary {
        list_id,
        name,
        description,
        category: category_of(&category)?,
        goal_year: goal_year.map(narrow).transpose()?,
        goal_month: goal_month.map(narrow).transpose()?,
        updated_at,
        item_count: narrow(item_count)?,
        watched_count: narrow(watched_count)?,
        cover_poster_path,
    })
}

pub fn first_occurrence(row: FirstOccurrenceRow) -> Result<FirstOccurrence, DomainError> {
    let (media_id, first_watched_on, year) = row;

    let text = first_watched_on.ok_or_else(|| {
        DomainError::DecodeFailed(format!("media {} has an unparseable watch date", media_id))
    })?;
    let first_watched_on = NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .map_err(|e| DomainError::DecodeFailed(format!("watch date '{}': {}", text, e)))?;
    let year = year
        .ok_or_else(|| DomainError::DecodeFailed(format!("media {} has no watch year", media_id)))
        .and_then(narrow)?;

    Ok(FirstOccurrence {
        media_id,
        first_watched_on,
        year,
    })
}

pub fn goal_list(row: GoalListRow) -> Result<GoalList, DomainError> {
    let (category, list_id, name, total_items, matched_count, items_json) = row;

    let items: Vec<GoalItem> = serde_json::from_str(&items_json).map_err(|e| {
        DomainError::DecodeFailed(format!("goal items of list {}: {}", list_id, e))
    })?;

    Ok(GoalList {
        category: category_of(&category)?,
        list_id,
        name,
        total_items: narrow(total_items)?,
        matched_count: narrow(matched_count)?,
        items,
    })
}

pub fn list_item(row: ListItemRow) -> ListItemStatus {
    let (
        item_id,
        media_id,
        title,
        poster_path,
        position,
        added_at,
        watched,
        watch_event_id,
        user_rating,
        vote_average,
    ) = row;

    ListItemStatus {
        item_id,
        media_id,
        title,
        poster_path,
        position,
        added_at,
        watched,
        watch_event_id,
        user_rating,
        vote_average,
    }
}

/// `years` is the server-side `group_concat` of distinct goal years.
pub fn reverse_mapping(row: ReverseMappingRow) -> Result<ReverseMapping, DomainError> {
    let (media_id, years) = row;

    let years = years
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .filter(|y| !y.is_empty())
        .map(|y| {
            y.trim().parse::<i32>().map_err(|e| {
                DomainError::DecodeFailed(format!("goal year '{}' of media {}: {}", y, media_id, e))
            })
        })
        .collect::<Result<BTreeSet<_>, _>>()?;

    Ok(ReverseMapping { media_id, years })
}

fn category_of(text: &str) -> Result<ListCategory, DomainError> {
    ListCategory::from_str(text).map_err(DomainError::DecodeFailed)
}

fn narrow<T: TryFrom<i64>>(value: i64) -> Result<T, DomainError> {
    T::try_from(value)
        .map_err(|_| DomainError::DecodeFailed(format!("value {} out of range", value)))
}

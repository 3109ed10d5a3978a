#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use ferrous_watchlist_application::ports::AggregationGateway;
use ferrous_watchlist_domain::aggregate::{
    FirstOccurrenceParams, GoalsParams, ListItemsParams, OwnerParams,
};
use ferrous_watchlist_domain::{
    AggregateQuery, DomainError, FirstOccurrence, GoalList, ListCategory, ListItemStatus,
    ListSummary, Operation, ReverseMapping,
};
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::{oneshot, RwLock};

// ============================================================================
// Mock AggregationGateway
// ============================================================================

#[derive(Clone, Default)]
pub struct MockAggregationGateway {
    calls: Arc<Mutex<Vec<AggregateQuery>>>,
    gates: Arc<Mutex<VecDeque<Option<oneshot::Receiver<()>>>>>,
    fail_with: Arc<RwLock<Option<DomainError>>>,
    summaries: Arc<RwLock<HashMap<i64, Vec<ListSummary>>>>,
    first_watches: Arc<RwLock<HashMap<i64, NaiveDate>>>,
    goals: Arc<RwLock<Vec<GoalList>>>,
    items: Arc<RwLock<HashMap<i64, Vec<ListItemStatus>>>>,
    reverse: Arc<RwLock<HashMap<i64, Vec<ReverseMapping>>>>,
}

impl MockAggregationGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_summaries(&self, owner_id: i64, rows: Vec<ListSummary>) {
        self.summaries.write().await.insert(owner_id, rows);
    }

    pub async fn set_first_watch(&self, media_id: i64, date: NaiveDate) {
        self.first_watches.write().await.insert(media_id, date);
    }

    pub async fn set_goals(&self, rows: Vec<GoalList>) {
        *self.goals.write().await = rows;
    }

    pub async fn set_list_items(&self, list_id: i64, rows: Vec<ListItemStatus>) {
        self.items.write().await.insert(list_id, rows);
    }

    pub async fn set_reverse(&self, owner_id: i64, rows: Vec<ReverseMapping>) {
        self.reverse.write().await.insert(owner_id, rows);
    }

    pub async fn set_failure(&self, error: Option<DomainError>) {
        *self.fail_with.write().await = error;
    }

    /// Holds the next call until the returned sender fires or is dropped.
    pub fn hold_next_call(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(Some(rx));
        tx
    }

    /// Lets the next call through immediately. Used to queue an ungated
    /// call behind held ones.
    pub fn pass_next_call(&self) {
        self.gates.lock().unwrap().push_back(None);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_for(&self, operation: Operation) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|q| q.operation() == operation)
            .count()
    }

    pub fn calls(&self) -> Vec<AggregateQuery> {
        self.calls.lock().unwrap().clone()
    }

    async fn enter(&self, query: AggregateQuery) -> Result<(), DomainError> {
        self.calls.lock().unwrap().push(query);

        let gate = self.gates.lock().unwrap().pop_front().flatten();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        match self.fail_with.read().await.clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AggregationGateway for MockAggregationGateway {
    async fn lists_with_summary(
        &self,
        params: &OwnerParams,
    ) -> Result<Vec<ListSummary>, DomainError> {
        self.enter(AggregateQuery::ListsWithSummary(params.clone()))
            .await?;
        Ok(self
            .summaries
            .read()
            .await
            .get(&params.owner_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn first_occurrence_dates(
        &self,
        params: &FirstOccurrenceParams,
    ) -> Result<Vec<FirstOccurrence>, DomainError> {
        self.enter(AggregateQuery::FirstOccurrenceDates(params.clone()))
            .await?;
        let watches = self.first_watches.read().await;
        Ok(params
            .distinct_ids()
            .into_iter()
            .filter_map(|id| {
                watches.get(&id).map(|date| FirstOccurrence {
                    media_id: id,
                    first_watched_on: *date,
                    year: chrono::Datelike::year(date),
                })
            })
            .collect())
    }

    async fn goals_data(&self, params: &GoalsParams) -> Result<Vec<GoalList>, DomainError> {
        self.enter(AggregateQuery::GoalsData(params.clone())).await?;
        Ok(self.goals.read().await.clone())
    }

    async fn list_items_with_status(
        &self,
        params: &ListItemsParams,
    ) -> Result<Vec<ListItemStatus>, DomainError> {
        self.enter(AggregateQuery::ListItemsWithStatus(params.clone()))
            .await?;
        let items = self
            .items
            .read()
            .await
            .get(&params.list_id)
            .cloned()
            .unwrap_or_default();

        Ok(match params.window {
            Some(w) => items
                .into_iter()
                .skip(w.offset as usize)
                .take(w.limit as usize)
                .collect(),
            None => items,
        })
    }

    async fn reverse_mapping(
        &self,
        params: &OwnerParams,
    ) -> Result<Vec<ReverseMapping>, DomainError> {
        self.enter(AggregateQuery::ReverseMapping(params.clone()))
            .await?;
        Ok(self
            .reverse
            .read()
            .await
            .get(&params.owner_id)
            .cloned()
            .unwrap_or_default())
    }
}

// ============================================================================
// Row builders
// ============================================================================

pub fn summary(list_id: i64, name: &str, item_count: u32, watched_count: u32) -> ListSummary {
    ListSummary {
        list_id,
        name: name.to_string(),
        description: None,
        category: ListCategory::Custom,
        goal_year: None,
        goal_month: None,
        updated_at: "2024-01-01 00:00:00".to_string(),
        item_count,
        watched_count,
        cover_poster_path: None,
    }
}

pub fn list_item(item_id: i64, media_id: i64) -> ListItemStatus {
    ListItemStatus {
        item_id,
        media_id,
        title: format!("Title {}", media_id),
        poster_path: None,
        position: item_id,
        added_at: "2024-01-01 00:00:00".to_string(),
        watched: false,
        watch_event_id: None,
        user_rating: None,
        vote_average: None,
    }
}

/// `count` items with ids 1..=count.
pub fn list_items(count: i64) -> Vec<ListItemStatus> {
    (1..=count).map(|i| list_item(i, 1000 + i)).collect()
}

pub fn reverse(media_id: i64, years: &[i32]) -> ReverseMapping {
    ReverseMapping {
        media_id,
        years: years.iter().copied().collect::<BTreeSet<_>>(),
    }
}

use async_trait::async_trait;
use ferrous_watchlist_domain::aggregate::{
    FirstOccurrenceParams, GoalsParams, ListItemsParams, OwnerParams,
};
use ferrous_watchlist_domain::{
    AggregateQuery, AggregateResult, DomainError, FirstOccurrence, GoalList, ListItemStatus,
    ListSummary, ReverseMapping,
};

/// Thin typed conduit to the backend's aggregation contracts.
///
/// Every method is one backend round trip whose rows already carry the
/// derived fields (counts, flags, classifications). Implementations must
/// validate parameters before calling out, answer an empty id set without a
/// call, treat "no rows" as success, and never retry.
///
/// # Errors
///
/// * `DomainError::BackendUnavailable` - transport failure or timeout
/// * `DomainError::BackendRejected` - malformed parameters or server-side failure
/// * `DomainError::DecodeFailed` - the response did not have the expected shape
#[async_trait]
pub trait AggregationGateway: Send + Sync {
    /// Lists of an owner with item count, watched count and cover poster.
    async fn lists_with_summary(
        &self,
        params: &OwnerParams,
    ) -> Result<Vec<ListSummary>, DomainError>;

    /// First watch date per distinct media id. Ids never watched are absent.
    async fn first_occurrence_dates(
        &self,
        params: &FirstOccurrenceParams,
    ) -> Result<Vec<FirstOccurrence>, DomainError>;

    /// Goal lists targeting the given year (yearly) or year and month
    /// (monthly), with their items and per-item matched flag.
    async fn goals_data(&self, params: &GoalsParams) -> Result<Vec<GoalList>, DomainError>;

    /// Items of a list with the owner's watched status and ratings.
    async fn list_items_with_status(
        &self,
        params: &ListItemsParams,
    ) -> Result<Vec<ListItemStatus>, DomainError>;

    /// Media id to the set of goal years it is tagged under.
    async fn reverse_mapping(
        &self,
        params: &OwnerParams,
    ) -> Result<Vec<ReverseMapping>, DomainError>;

    /// Dispatch a query to its contract and wrap the rows in the tagged union.
    async fn execute(&self, query: &AggregateQuery) -> Result<AggregateResult, DomainError> {
        Ok(match query {
            AggregateQuery::ListsWithSummary(p) => {
                AggregateResult::ListsWithSummary(self.lists_with_summary(p).await?)
            }
            AggregateQuery::FirstOccurrenceDates(p) => {
                AggregateResult::FirstOccurrenceDates(self.first_occurrence_dates(p).await?)
            }
            AggregateQuery::GoalsData(p) => AggregateResult::GoalsData(self.goals_data(p).await?),
            AggregateQuery::ListItemsWithStatus(p) => {
                AggregateResult::ListItemsWithStatus(self.list_items_with_status(p).await?)
            }
            AggregateQuery::ReverseMapping(p) => {
                AggregateResult::ReverseMapping(self.reverse_mapping(p).await?)
            }
        })
    }
}

use ferrous_watchlist_application::cache::ResponseCache;
use ferrous_watchlist_application::ports::{AggregationGateway, WatchlistRepository};
use ferrous_watchlist_application::services::AggregateService;
use ferrous_watchlist_application::use_cases::{
    AddListItemUseCase, CreateListUseCase, DeleteListUseCase, ImportWatchHistoryUseCase,
    RecordWatchUseCase, RemoveListItemUseCase,
};
use ferrous_watchlist_domain::{AggregateResult, Config};
use ferrous_watchlist_infrastructure::gateway::SqliteAggregationGateway;
use ferrous_watchlist_infrastructure::repositories::SqliteWatchlistRepository;
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct Services {
    pub cache: Arc<ResponseCache<AggregateResult>>,
    pub aggregates: Arc<AggregateService>,
}

impl Services {
    pub fn new(pool: SqlitePool, config: &Config) -> Self {
        let gateway: Arc<dyn AggregationGateway> = Arc::new(SqliteAggregationGateway::new(
            pool,
            config.backend.timeout(),
        ));
        let cache = Arc::new(ResponseCache::new(
            config.cache.max_entries,
            config.cache.max_cost_bytes,
        ));
        let aggregates = Arc::new(AggregateService::new(
            gateway,
            Arc::clone(&cache),
            config.cache.ttl.clone(),
        ));

        Self { cache, aggregates }
    }
}

pub struct UseCases {
    pub create_list: CreateListUseCase,
    pub delete_list: DeleteListUseCase,
    pub add_list_item: AddListItemUseCase,
    pub remove_list_item: RemoveListItemUseCase,
    pub record_watch: RecordWatchUseCase,
    pub import_watch_history: ImportWatchHistoryUseCase,
}

impl UseCases {
    pub fn new(pool: SqlitePool, services: &Services) -> Self {
        let repo: Arc<dyn WatchlistRepository> = Arc::new(SqliteWatchlistRepository::new(pool));
        let aggregates = &services.aggregates;

        Self {
            create_list: CreateListUseCase::new(repo.clone(), aggregates.clone()),
            delete_list: DeleteListUseCase::new(repo.clone(), aggregates.clone()),
            add_list_item: AddListItemUseCase::new(repo.clone(), aggregates.clone()),
            remove_list_item: RemoveListItemUseCase::new(repo.clone(), aggregates.clone()),
            record_watch: RecordWatchUseCase::new(repo.clone(), aggregates.clone()),
            import_watch_history: ImportWatchHistoryUseCase::new(repo, aggregates.clone()),
        }
    }
}

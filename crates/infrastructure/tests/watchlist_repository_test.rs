mod helpers;

use ferrous_watchlist_application::ports::{AggregationGateway, WatchlistRepository};
use ferrous_watchlist_domain::aggregate::{ListItemsParams, OwnerParams};
use ferrous_watchlist_domain::{DomainError, NewList, NewListItem, NewWatchEvent};
use ferrous_watchlist_infrastructure::gateway::SqliteAggregationGateway;
use ferrous_watchlist_infrastructure::repositories::SqliteWatchlistRepository;
use helpers::*;
use std::time::Duration;

async fn count(pool: &sqlx::SqlitePool, table: &str) -> i64 {
    let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap();
    n
}

#[tokio::test]
async fn test_create_list_and_items_in_position_order() {
    let pool = create_test_db().await;
    let repo = SqliteWatchlistRepository::new(pool.clone());

    let list_id = repo
        .create_list(&NewList::custom(1, "  Weekend  "))
        .await
        .unwrap();
    repo.add_list_item(list_id, &NewListItem::new(10, "Alien").with_poster("/alien.jpg"))
        .await
        .unwrap();
    repo.add_list_item(list_id, &NewListItem::new(11, "Aliens"))
        .await
        .unwrap();

    let gateway = SqliteAggregationGateway::new(pool, Duration::from_secs(5));
    let items = gateway
        .list_items_with_status(&ListItemsParams {
            list_id,
            window: None,
        })
        .await
        .unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].position, 1);
    assert_eq!(items[1].position, 2);
    assert_eq!(items[0].poster_path.as_deref(), Some("/alien.jpg"));

    let lists = gateway
        .lists_with_summary(&OwnerParams { owner_id: 1 })
        .await
        .unwrap();
    assert_eq!(lists[0].name, "Weekend");
    assert_eq!(lists[0].cover_poster_path.as_deref(), Some("/alien.jpg"));
}

#[tokio::test]
async fn test_add_item_to_missing_list_is_not_found() {
    let pool = create_test_db().await;
    let repo = SqliteWatchlistRepository::new(pool);

    let err = repo
        .add_list_item(404, &NewListItem::new(10, "Alien"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn test_duplicate_media_is_rejected() {
    let pool = create_test_db().await;
    let repo = SqliteWatchlistRepository::new(pool);
    let list_id = repo.create_list(&NewList::custom(1, "Dupes")).await.unwrap();

    repo.add_list_item(list_id, &NewListItem::new(10, "Alien"))
        .await
        .unwrap();
    let err = repo
        .add_list_item(list_id, &NewListItem::new(10, "Alien again"))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::BackendRejected(_)));
}

#[tokio::test]
async fn test_delete_list_cascades_items() {
    let pool = create_test_db().await;
    let repo = SqliteWatchlistRepository::new(pool.clone());
    let list_id = repo.create_list(&NewList::custom(1, "Temp")).await.unwrap();
    repo.add_list_item(list_id, &NewListItem::new(10, "Alien"))
        .await
        .unwrap();

    repo.delete_list(list_id).await.unwrap();

    assert_eq!(count(&pool, "lists").await, 0);
    assert_eq!(count(&pool, "list_items").await, 0);

    let err = repo.delete_list(list_id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn test_remove_list_item() {
    let pool = create_test_db().await;
    let repo = SqliteWatchlistRepository::new(pool.clone());
    let list_id = repo.create_list(&NewList::custom(1, "Temp")).await.unwrap();
    let item_id = repo
        .add_list_item(list_id, &NewListItem::new(10, "Alien"))
        .await
        .unwrap();

    repo.remove_list_item(item_id).await.unwrap();
    assert_eq!(count(&pool, "list_items").await, 0);

    let err = repo.remove_list_item(item_id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn test_record_and_import_watches() {
    let pool = create_test_db().await;
    let repo = SqliteWatchlistRepository::new(pool.clone());

    repo.record_watch(&NewWatchEvent::new(1, 10, at("2024-05-01 20:00:00")).with_rating(8.0))
        .await
        .unwrap();

    let imported = repo
        .import_watches(&[
            NewWatchEvent::new(1, 11, at("2024-05-02 20:00:00")),
            NewWatchEvent::new(1, 12, at("2024-05-03 20:00:00")),
        ])
        .await
        .unwrap();

    assert_eq!(imported, 2);
    assert_eq!(count(&pool, "watch_events").await, 3);

    let (stored,): (String,) =
        sqlx::query_as("SELECT watched_at FROM watch_events WHERE media_id = 10")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(stored, "2024-05-01 20:00:00");
}

#[tokio::test]
async fn test_failed_import_writes_nothing() {
    let pool = create_test_db().await;
    let repo = SqliteWatchlistRepository::new(pool.clone());

    // The second rating violates the table's range check.
    let mut bad = NewWatchEvent::new(1, 11, at("2024-05-02 20:00:00"));
    bad.rating = Some(42.0);

    let result = repo
        .import_watches(&[NewWatchEvent::new(1, 10, at("2024-05-01 20:00:00")), bad])
        .await;

    assert!(result.is_err());
    assert_eq!(count(&pool, "watch_events").await, 0);
}

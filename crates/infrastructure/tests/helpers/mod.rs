#![allow(dead_code)]

use chrono::NaiveDateTime;
use ferrous_watchlist_domain::watchlist::WATCHED_AT_FORMAT;
use sqlx::SqlitePool;

pub async fn create_test_db() -> SqlitePool {
    ferrous_watchlist_infrastructure::database::create_memory_pool()
        .await
        .unwrap()
}

pub async fn insert_list(
    pool: &SqlitePool,
    owner_id: i64,
    name: &str,
    category: &str,
    goal_year: Option<i32>,
    goal_month: Option<u32>,
    updated_at: &str,
) -> i64 {
    sqlx::query(
        "INSERT INTO lists (owner_id, name, category, goal_year, goal_month, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(owner_id)
    .bind(name)
    .bind(category)
    .bind(goal_year)
    .bind(goal_month)
    .bind(updated_at)
    .bind(updated_at)
    .execute(pool)
    .await
    .unwrap()
    .last_insert_rowid()
}

pub async fn insert_item(
    pool: &SqlitePool,
    list_id: i64,
    media_id: i64,
    position: i64,
    poster_path: Option<&str>,
) -> i64 {
    sqlx::query(
        "INSERT INTO list_items (list_id, media_id, title, poster_path, vote_average, position)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(list_id)
    .bind(media_id)
    .bind(format!("Title {}", media_id))
    .bind(poster_path)
    .bind(7.5f64)
    .bind(position)
    .execute(pool)
    .await
    .unwrap()
    .last_insert_rowid()
}

pub async fn insert_watch(
    pool: &SqlitePool,
    owner_id: i64,
    media_id: i64,
    watched_at: &str,
    rating: Option<f64>,
) -> i64 {
    sqlx::query(
        "INSERT INTO watch_events (owner_id, media_id, watched_at, rating) VALUES (?, ?, ?, ?)",
    )
    .bind(owner_id)
    .bind(media_id)
    .bind(watched_at)
    .bind(rating)
    .execute(pool)
    .await
    .unwrap()
    .last_insert_rowid()
}

pub fn at(text: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(text, WATCHED_AT_FORMAT).unwrap()
}

//! Dining table database operations

use shared::models::{DiningTable, TableStatus};
use shared::util::snowflake_id;
use sqlx::PgPool;

pub async fn list(pool: &PgPool, restaurant_id: i64) -> Result<Vec<DiningTable>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, restaurant_id, number, status FROM tables \
         WHERE restaurant_id = $1 ORDER BY number",
    )
    .bind(restaurant_id)
    .fetch_all(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    restaurant_id: i64,
    number: &str,
) -> Result<DiningTable, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO tables (id, restaurant_id, number, status) VALUES ($1, $2, $3, 'free') \
         RETURNING id, restaurant_id, number, status",
    )
    .bind(snowflake_id())
    .bind(restaurant_id)
    .bind(number)
    .fetch_one(pool)
    .await
}

pub async fn set_status(
    pool: &PgPool,
    restaurant_id: i64,
    table_id: i64,
    status: TableStatus,
) -> Result<Option<DiningTable>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE tables SET status = $3 WHERE id = $1 AND restaurant_id = $2 \
         RETURNING id, restaurant_id, number, status",
    )
    .bind(table_id)
    .bind(restaurant_id)
    .bind(status)
    .fetch_optional(pool)
    .await
}

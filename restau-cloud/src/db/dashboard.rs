//! Raw rows for the owner dashboard; aggregation lives in `shared::dashboard`

use shared::dashboard::{RecentOrderRow, RevenueRow, SoldLine};
use sqlx::PgPool;

pub async fn count_active_orders(pool: &PgPool, restaurant_id: i64) -> Result<i64, sqlx::Error> {
    let (n,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM orders WHERE restaurant_id = $1 \
         AND status IN ('pending', 'preparing', 'ready')",
    )
    .bind(restaurant_id)
    .fetch_one(pool)
    .await?;
    Ok(n)
}

pub async fn count_occupied_tables(pool: &PgPool, restaurant_id: i64) -> Result<i64, sqlx::Error> {
    let (n,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM tables WHERE restaurant_id = $1 AND status = 'occupied'",
    )
    .bind(restaurant_id)
    .fetch_one(pool)
    .await?;
    Ok(n)
}

pub async fn count_orders_since(
    pool: &PgPool,
    restaurant_id: i64,
    since: i64,
) -> Result<i64, sqlx::Error> {
    let (n,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM orders WHERE restaurant_id = $1 AND created_at >= $2")
            .bind(restaurant_id)
            .bind(since)
            .fetch_one(pool)
            .await?;
    Ok(n)
}

/// Paid orders created at or after `since`
pub async fn revenue_rows_since(
    pool: &PgPool,
    restaurant_id: i64,
    since: i64,
) -> Result<Vec<RevenueRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT status, total_amount, created_at FROM orders \
         WHERE restaurant_id = $1 AND status = 'paid' AND created_at >= $2",
    )
    .bind(restaurant_id)
    .bind(since)
    .fetch_all(pool)
    .await
}

/// Every order line of the restaurant with its menu item name
pub async fn sold_lines(pool: &PgPool, restaurant_id: i64) -> Result<Vec<SoldLine>, sqlx::Error> {
    sqlx::query_as(
        "SELECT m.name, oi.quantity FROM order_items oi \
         LEFT JOIN menu_items m ON m.id = oi.menu_item_id \
         WHERE oi.restaurant_id = $1",
    )
    .bind(restaurant_id)
    .fetch_all(pool)
    .await
}

pub async fn recent_orders(
    pool: &PgPool,
    restaurant_id: i64,
    limit: i64,
) -> Result<Vec<RecentOrderRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT customer_name, table_number, status, created_at FROM orders \
         WHERE restaurant_id = $1 ORDER BY created_at DESC LIMIT $2",
    )
    .bind(restaurant_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

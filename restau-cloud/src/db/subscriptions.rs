//! Subscription read models (rows are written by the billing provider sync)

use shared::models::SubscriptionWithRestaurant;
use sqlx::PgPool;

pub async fn list_with_restaurants(
    pool: &PgPool,
) -> Result<Vec<SubscriptionWithRestaurant>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT s.id, s.restaurant_id, r.name AS restaurant_name, s.plan, s.status,
               s.current_period_end, s.created_at
        FROM subscriptions s
        LEFT JOIN restaurants r ON r.id = s.restaurant_id
        ORDER BY s.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn count_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM subscriptions WHERE status = 'active'")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

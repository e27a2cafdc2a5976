//! Order database operations
//!
//! Status writes are conditional on the status the caller read, so two
//! staff members racing on the same card cannot both win.

use std::collections::HashMap;

use shared::models::{Order, OrderItemDetail, OrderWithItems};
use shared::order::{Cart, OrderStatus};
use shared::util::snowflake_id;
use sqlx::PgPool;

use super::BoxError;

const ORDER_SELECT: &str = "SELECT o.id, o.restaurant_id, o.table_id, o.table_number, \
     t.number AS linked_table_number, o.customer_name, o.notes, o.status, \
     o.total_amount, o.created_at \
     FROM orders o LEFT JOIN tables t ON t.id = o.table_id";

const ITEM_SELECT: &str = "SELECT oi.id, oi.order_id, oi.menu_item_id, \
     m.name AS menu_item_name, oi.quantity, oi.price_at_time, oi.notes \
     FROM order_items oi LEFT JOIN menu_items m ON m.id = oi.menu_item_id";

/// Checkout header fields, already validated
pub struct NewOrder<'a> {
    pub restaurant_id: i64,
    pub table_id: Option<i64>,
    pub table_number: Option<&'a str>,
    pub customer_name: &'a str,
    pub notes: Option<&'a str>,
}

/// Insert an order and its priced lines in one transaction.
///
/// A `table_id` from another restaurant is silently dropped. Returns the
/// new order id.
pub async fn insert_checkout(
    pool: &PgPool,
    order: &NewOrder<'_>,
    cart: &Cart,
    now: i64,
) -> Result<i64, BoxError> {
    let order_id = snowflake_id();
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO orders (id, restaurant_id, table_id, table_number, customer_name, notes, status, total_amount, created_at)
        VALUES ($1, $2,
                (SELECT id FROM tables WHERE id = $3 AND restaurant_id = $2),
                $4, $5, $6, 'pending', $7, $8)
        "#,
    )
    .bind(order_id)
    .bind(order.restaurant_id)
    .bind(order.table_id)
    .bind(order.table_number)
    .bind(order.customer_name)
    .bind(order.notes)
    .bind(cart.total())
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for line in cart.lines() {
        sqlx::query(
            "INSERT INTO order_items (id, order_id, restaurant_id, menu_item_id, quantity, price_at_time, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(snowflake_id())
        .bind(order_id)
        .bind(order.restaurant_id)
        .bind(line.menu_item_id)
        .bind(i32::try_from(line.quantity)?)
        .bind(line.unit_price)
        .bind(&line.notes)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(order_id)
}

async fn load_items(
    pool: &PgPool,
    order_ids: &[i64],
) -> Result<HashMap<i64, Vec<OrderItemDetail>>, sqlx::Error> {
    if order_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<OrderItemDetail> = sqlx::query_as(&format!(
        "{ITEM_SELECT} WHERE oi.order_id = ANY($1) ORDER BY oi.order_id, oi.id"
    ))
    .bind(order_ids)
    .fetch_all(pool)
    .await?;

    let mut by_order: HashMap<i64, Vec<OrderItemDetail>> = HashMap::new();
    for row in rows {
        by_order.entry(row.order_id).or_default().push(row);
    }
    Ok(by_order)
}

fn attach_items(
    orders: Vec<Order>,
    mut items: HashMap<i64, Vec<OrderItemDetail>>,
) -> Vec<OrderWithItems> {
    orders
        .into_iter()
        .map(|order| OrderWithItems {
            items: items.remove(&order.id).unwrap_or_default(),
            order,
        })
        .collect()
}

pub async fn find_with_items(
    pool: &PgPool,
    restaurant_id: i64,
    order_id: i64,
) -> Result<Option<OrderWithItems>, sqlx::Error> {
    let order: Option<Order> = sqlx::query_as(&format!(
        "{ORDER_SELECT} WHERE o.id = $1 AND o.restaurant_id = $2"
    ))
    .bind(order_id)
    .bind(restaurant_id)
    .fetch_optional(pool)
    .await?;

    let Some(order) = order else {
        return Ok(None);
    };
    let items = load_items(pool, &[order.id]).await?;
    Ok(attach_items(vec![order], items).pop())
}

/// Orders still on the board (not paid, not cancelled), oldest first
pub async fn list_board(
    pool: &PgPool,
    restaurant_id: i64,
) -> Result<Vec<OrderWithItems>, sqlx::Error> {
    let orders: Vec<Order> = sqlx::query_as(&format!(
        "{ORDER_SELECT} WHERE o.restaurant_id = $1 \
         AND o.status NOT IN ('paid', 'cancelled') ORDER BY o.created_at ASC"
    ))
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;

    let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    let items = load_items(pool, &ids).await?;
    Ok(attach_items(orders, items))
}

pub async fn find_status(
    pool: &PgPool,
    restaurant_id: i64,
    order_id: i64,
) -> Result<Option<OrderStatus>, sqlx::Error> {
    let row: Option<(OrderStatus,)> =
        sqlx::query_as("SELECT status FROM orders WHERE id = $1 AND restaurant_id = $2")
            .bind(order_id)
            .bind(restaurant_id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|(s,)| s))
}

/// Move an order from `expected` to `target`. Returns false when the stored
/// status is no longer `expected` (or the order is gone).
pub async fn transition(
    pool: &PgPool,
    restaurant_id: i64,
    order_id: i64,
    expected: OrderStatus,
    target: OrderStatus,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE orders SET status = $4 WHERE id = $1 AND restaurant_id = $2 AND status = $3",
    )
    .bind(order_id)
    .bind(restaurant_id)
    .bind(expected)
    .bind(target)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn order(id: i64) -> Order {
        Order {
            id,
            restaurant_id: 1,
            table_id: None,
            table_number: None,
            linked_table_number: None,
            customer_name: None,
            notes: None,
            status: OrderStatus::Pending,
            total_amount: Decimal::ZERO,
            created_at: id,
        }
    }

    fn item(id: i64, order_id: i64) -> OrderItemDetail {
        OrderItemDetail {
            id,
            order_id,
            menu_item_id: Some(9),
            menu_item_name: Some("Soup".to_string()),
            quantity: 1,
            price_at_time: Decimal::ONE,
            notes: None,
        }
    }

    #[test]
    fn attach_items_keeps_order_and_groups_lines() {
        let mut items = HashMap::new();
        items.insert(2, vec![item(20, 2), item(21, 2)]);
        let out = attach_items(vec![order(1), order(2)], items);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].order.id, 1);
        assert!(out[0].items.is_empty());
        assert_eq!(out[1].items.len(), 2);
    }
}

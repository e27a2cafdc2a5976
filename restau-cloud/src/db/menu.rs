//! Menu (category + item) database operations

use shared::models::{Category, MenuItem, MenuItemCreate, MenuItemUpdate, next_category_sort_order};
use shared::util::snowflake_id;
use sqlx::{PgConnection, PgPool};

use super::BoxError;

const ITEM_COLUMNS: &str =
    "id, restaurant_id, category_id, name, description, price, image_url, is_available, created_at";

pub async fn list_categories(
    pool: &PgPool,
    restaurant_id: i64,
) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, restaurant_id, name, sort_order, created_at FROM categories \
         WHERE restaurant_id = $1 ORDER BY sort_order, name",
    )
    .bind(restaurant_id)
    .fetch_all(pool)
    .await
}

async fn count_categories(conn: &mut PgConnection, restaurant_id: i64) -> Result<i64, sqlx::Error> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories WHERE restaurant_id = $1")
        .bind(restaurant_id)
        .fetch_one(conn)
        .await?;
    Ok(n)
}

async fn insert_category(
    conn: &mut PgConnection,
    restaurant_id: i64,
    name: &str,
    sort_order: Option<i32>,
    now: i64,
) -> Result<Category, sqlx::Error> {
    let sort_order = match sort_order {
        Some(s) => s,
        None => {
            let existing = count_categories(&mut *conn, restaurant_id).await?;
            next_category_sort_order(usize::try_from(existing).unwrap_or(0))
        }
    };
    sqlx::query_as(
        "INSERT INTO categories (id, restaurant_id, name, sort_order, created_at) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, restaurant_id, name, sort_order, created_at",
    )
    .bind(snowflake_id())
    .bind(restaurant_id)
    .bind(name)
    .bind(sort_order)
    .bind(now)
    .fetch_one(conn)
    .await
}

/// Create a category, appended after the existing ones unless a sort order
/// is given
pub async fn create_category(
    pool: &PgPool,
    restaurant_id: i64,
    name: &str,
    sort_order: Option<i32>,
    now: i64,
) -> Result<Category, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let category = insert_category(&mut tx, restaurant_id, name, sort_order, now).await?;
    tx.commit().await?;
    Ok(category)
}

async fn category_belongs(
    conn: &mut PgConnection,
    restaurant_id: i64,
    category_id: i64,
) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM categories WHERE id = $1 AND restaurant_id = $2")
            .bind(category_id)
            .bind(restaurant_id)
            .fetch_optional(conn)
            .await?;
    Ok(row.is_some())
}

pub async fn list_items(pool: &PgPool, restaurant_id: i64) -> Result<Vec<MenuItem>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {ITEM_COLUMNS} FROM menu_items WHERE restaurant_id = $1 ORDER BY created_at"
    ))
    .bind(restaurant_id)
    .fetch_all(pool)
    .await
}

pub async fn list_available_items(
    pool: &PgPool,
    restaurant_id: i64,
) -> Result<Vec<MenuItem>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {ITEM_COLUMNS} FROM menu_items \
         WHERE restaurant_id = $1 AND is_available ORDER BY created_at"
    ))
    .bind(restaurant_id)
    .fetch_all(pool)
    .await
}

/// Outcome of creating a menu item
pub enum CreateItemOutcome {
    Created(MenuItem),
    /// `category_id` does not belong to the restaurant
    UnknownCategory,
}

/// Create a menu item, first creating `new_category_name` when given.
/// Both inserts share one transaction.
pub async fn create_item(
    pool: &PgPool,
    restaurant_id: i64,
    payload: &MenuItemCreate,
    now: i64,
) -> Result<CreateItemOutcome, BoxError> {
    let mut tx = pool.begin().await?;

    let new_category = payload
        .new_category_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    let category_id = match (new_category, payload.category_id) {
        (Some(name), _) => {
            let category = insert_category(&mut tx, restaurant_id, name, None, now).await?;
            tracing::info!(restaurant_id, category_id = category.id, "Category created inline");
            Some(category.id)
        }
        (None, Some(id)) => {
            if !category_belongs(&mut tx, restaurant_id, id).await? {
                return Ok(CreateItemOutcome::UnknownCategory);
            }
            Some(id)
        }
        (None, None) => None,
    };

    let item: MenuItem = sqlx::query_as(&format!(
        "INSERT INTO menu_items (id, restaurant_id, category_id, name, description, price, image_url, is_available, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {ITEM_COLUMNS}"
    ))
    .bind(snowflake_id())
    .bind(restaurant_id)
    .bind(category_id)
    .bind(payload.name.trim())
    .bind(&payload.description)
    .bind(payload.price)
    .bind(&payload.image_url)
    .bind(payload.is_available.unwrap_or(true))
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(CreateItemOutcome::Created(item))
}

/// Outcome of updating a menu item
pub enum UpdateItemOutcome {
    Updated(MenuItem),
    NotFound,
    UnknownCategory,
}

pub async fn update_item(
    pool: &PgPool,
    restaurant_id: i64,
    item_id: i64,
    u: &MenuItemUpdate,
) -> Result<UpdateItemOutcome, BoxError> {
    let mut tx = pool.begin().await?;

    if let Some(category_id) = u.category_id
        && !category_belongs(&mut tx, restaurant_id, category_id).await?
    {
        return Ok(UpdateItemOutcome::UnknownCategory);
    }

    let item: Option<MenuItem> = sqlx::query_as(&format!(
        r#"
        UPDATE menu_items SET
            name         = COALESCE($3, name),
            description  = COALESCE($4, description),
            price        = COALESCE($5, price),
            category_id  = COALESCE($6, category_id),
            image_url    = COALESCE($7, image_url),
            is_available = COALESCE($8, is_available)
        WHERE id = $1 AND restaurant_id = $2
        RETURNING {ITEM_COLUMNS}
        "#
    ))
    .bind(item_id)
    .bind(restaurant_id)
    .bind(u.name.as_deref().map(str::trim))
    .bind(&u.description)
    .bind(u.price)
    .bind(u.category_id)
    .bind(&u.image_url)
    .bind(u.is_available)
    .fetch_optional(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(match item {
        Some(item) => UpdateItemOutcome::Updated(item),
        None => UpdateItemOutcome::NotFound,
    })
}

pub async fn delete_item(
    pool: &PgPool,
    restaurant_id: i64,
    item_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM menu_items WHERE id = $1 AND restaurant_id = $2")
        .bind(item_id)
        .bind(restaurant_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

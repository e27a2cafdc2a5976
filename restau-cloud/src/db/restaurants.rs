//! Restaurant (tenant) database operations

use shared::models::{Restaurant, RestaurantSettingsUpdate, RestaurantSummary};
use sqlx::PgPool;

const RESTAURANT_COLUMNS: &str = "id, name, slug, description, is_active, currency, \
     primary_color, secondary_color, logo_url, banner_url, \
     phone, email_public, address, instagram_url, facebook_url, website_url, \
     seo_title, seo_description, brand_story, created_at";

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Restaurant>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Restaurant>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE slug = $1"
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await
}

/// Admin listing, newest first, with the first owner's email
pub async fn list_summaries(pool: &PgPool) -> Result<Vec<RestaurantSummary>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT r.id, r.name, r.slug, r.is_active, r.created_at,
               (SELECT p.email FROM profiles p
                 WHERE p.restaurant_id = r.id AND p.role = 'owner'
                 ORDER BY p.created_at LIMIT 1) AS owner_email
        FROM restaurants r
        ORDER BY r.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    id: i64,
    name: &str,
    slug: &str,
    now: i64,
) -> Result<Restaurant, sqlx::Error> {
    sqlx::query_as(&format!(
        "INSERT INTO restaurants (id, name, slug, is_active, currency, created_at) \
         VALUES ($1, $2, $3, TRUE, 'USD', $4) RETURNING {RESTAURANT_COLUMNS}"
    ))
    .bind(id)
    .bind(name)
    .bind(slug)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Activate or suspend. Returns false when the restaurant does not exist.
pub async fn set_active(pool: &PgPool, id: i64, is_active: bool) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE restaurants SET is_active = $2 WHERE id = $1")
        .bind(id)
        .bind(is_active)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM restaurants WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Apply owner settings. `None` keeps the stored value, an empty string
/// clears optional text columns. The payload is expected to be validated.
pub async fn update_settings(
    pool: &PgPool,
    id: i64,
    s: &RestaurantSettingsUpdate,
) -> Result<Option<Restaurant>, sqlx::Error> {
    sqlx::query_as(&format!(
        r#"
        UPDATE restaurants SET
            name            = COALESCE($2, name),
            slug            = COALESCE($3, slug),
            currency        = COALESCE($4, currency),
            description     = CASE WHEN $5::TEXT  IS NULL THEN description     ELSE NULLIF($5, '')  END,
            primary_color   = CASE WHEN $6::TEXT  IS NULL THEN primary_color   ELSE NULLIF($6, '')  END,
            secondary_color = CASE WHEN $7::TEXT  IS NULL THEN secondary_color ELSE NULLIF($7, '')  END,
            logo_url        = CASE WHEN $8::TEXT  IS NULL THEN logo_url        ELSE NULLIF($8, '')  END,
            banner_url      = CASE WHEN $9::TEXT  IS NULL THEN banner_url      ELSE NULLIF($9, '')  END,
            phone           = CASE WHEN $10::TEXT IS NULL THEN phone           ELSE NULLIF($10, '') END,
            email_public    = CASE WHEN $11::TEXT IS NULL THEN email_public    ELSE NULLIF($11, '') END,
            address         = CASE WHEN $12::TEXT IS NULL THEN address         ELSE NULLIF($12, '') END,
            instagram_url   = CASE WHEN $13::TEXT IS NULL THEN instagram_url   ELSE NULLIF($13, '') END,
            facebook_url    = CASE WHEN $14::TEXT IS NULL THEN facebook_url    ELSE NULLIF($14, '') END,
            website_url     = CASE WHEN $15::TEXT IS NULL THEN website_url     ELSE NULLIF($15, '') END,
            seo_title       = CASE WHEN $16::TEXT IS NULL THEN seo_title       ELSE NULLIF($16, '') END,
            seo_description = CASE WHEN $17::TEXT IS NULL THEN seo_description ELSE NULLIF($17, '') END,
            brand_story     = CASE WHEN $18::TEXT IS NULL THEN brand_story     ELSE NULLIF($18, '') END
        WHERE id = $1
        RETURNING {RESTAURANT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&s.name)
    .bind(&s.slug)
    .bind(&s.currency)
    .bind(&s.description)
    .bind(&s.primary_color)
    .bind(&s.secondary_color)
    .bind(&s.logo_url)
    .bind(&s.banner_url)
    .bind(&s.phone)
    .bind(&s.email_public)
    .bind(&s.address)
    .bind(&s.instagram_url)
    .bind(&s.facebook_url)
    .bind(&s.website_url)
    .bind(&s.seo_title)
    .bind(&s.seo_description)
    .bind(&s.brand_story)
    .fetch_optional(pool)
    .await
}

/// Whether another restaurant already uses `slug`
pub async fn slug_in_use(pool: &PgPool, slug: &str, except_id: i64) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM restaurants WHERE slug = $1 AND id <> $2")
            .bind(slug)
            .bind(except_id)
            .fetch_optional(pool)
            .await?;
    Ok(row.is_some())
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM restaurants")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

pub async fn count_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM restaurants WHERE is_active")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

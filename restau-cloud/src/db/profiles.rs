//! Profile database operations

use shared::models::{Profile, ProfileStatus, ProfileUpdate, ProfileWithRestaurant};
use sqlx::PgPool;

const PROFILE_COLUMNS: &str = "id, email, full_name, role, status, restaurant_id, created_at";

pub async fn find(pool: &PgPool, id: &str) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// First sign-in: create an owner profile awaiting approval. An existing
/// profile is returned unchanged.
pub async fn create_if_missing(
    pool: &PgPool,
    id: &str,
    email: Option<&str>,
    full_name: Option<&str>,
    now: i64,
) -> Result<Profile, sqlx::Error> {
    sqlx::query(
        "INSERT INTO profiles (id, email, full_name, role, status, created_at) \
         VALUES ($1, $2, $3, 'owner', 'pending', $4) ON CONFLICT (id) DO NOTHING",
    )
    .bind(id)
    .bind(email)
    .bind(full_name)
    .bind(now)
    .execute(pool)
    .await?;

    sqlx::query_as(&format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"))
        .bind(id)
        .fetch_one(pool)
        .await
}

/// Make the user an approved admin, creating the profile if needed
pub async fn promote_to_admin(
    pool: &PgPool,
    id: &str,
    email: Option<&str>,
    now: i64,
) -> Result<Profile, sqlx::Error> {
    sqlx::query_as(&format!(
        "INSERT INTO profiles (id, email, role, status, created_at) \
         VALUES ($1, $2, 'admin', 'approved', $3) \
         ON CONFLICT (id) DO UPDATE SET role = 'admin', status = 'approved', \
             email = COALESCE(profiles.email, EXCLUDED.email) \
         RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(id)
    .bind(email)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Owners and admins with their restaurant name, newest first
pub async fn list_owners_and_admins(
    pool: &PgPool,
) -> Result<Vec<ProfileWithRestaurant>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT p.id, p.email, p.full_name, p.role, p.status, p.restaurant_id,
               r.name AS restaurant_name, p.created_at
        FROM profiles p
        LEFT JOIN restaurants r ON r.id = p.restaurant_id
        WHERE p.role IN ('owner', 'admin')
        ORDER BY p.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn set_status(
    pool: &PgPool,
    id: &str,
    status: ProfileStatus,
) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as(&format!(
        "UPDATE profiles SET status = $2 WHERE id = $1 RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(id)
    .bind(status)
    .fetch_optional(pool)
    .await
}

/// Admin edit. Absent fields are kept; `restaurant_id: null` unlinks.
pub async fn update(
    pool: &PgPool,
    id: &str,
    u: &ProfileUpdate,
) -> Result<Option<Profile>, sqlx::Error> {
    let (touch_restaurant, restaurant_id) = match u.restaurant_id {
        Some(value) => (true, value),
        None => (false, None),
    };
    sqlx::query_as(&format!(
        r#"
        UPDATE profiles SET
            full_name     = COALESCE($2, full_name),
            role          = COALESCE($3, role),
            status        = COALESCE($4, status),
            restaurant_id = CASE WHEN $5 THEN $6 ELSE restaurant_id END
        WHERE id = $1
        RETURNING {PROFILE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&u.full_name)
    .bind(u.role)
    .bind(u.status)
    .bind(touch_restaurant)
    .bind(restaurant_id)
    .fetch_optional(pool)
    .await
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM profiles")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

pub async fn count_pending(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let (n,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM profiles WHERE status = 'pending' AND role <> 'admin'")
            .fetch_one(pool)
            .await?;
    Ok(n)
}

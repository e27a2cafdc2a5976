//! Tenant management: list, create, activate / suspend, delete

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{Restaurant, RestaurantCreate, RestaurantStatusUpdate, RestaurantSummary};
use shared::util::{now_millis, sanitize_slug, snowflake_id};

use crate::api::{ApiResult, record_audit};
use crate::auth::AdminUser;
use crate::auth::rate_limit::ClientIp;
use crate::db;
use crate::db::is_unique_violation;
use crate::error::ServiceError;
use crate::state::AppState;

/// GET /api/admin/restaurants
pub async fn list_restaurants(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Vec<RestaurantSummary>> {
    let rows = db::restaurants::list_summaries(&state.pool)
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(rows))
}

/// POST /api/admin/restaurants
pub async fn create_restaurant(
    State(state): State<AppState>,
    admin: AdminUser,
    ClientIp(ip): ClientIp,
    Json(payload): Json<RestaurantCreate>,
) -> ApiResult<Restaurant> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::required("name"));
    }
    let slug = sanitize_slug(&payload.slug);
    if !slug.chars().any(|c| c.is_ascii_alphanumeric()) {
        return Err(
            AppError::new(ErrorCode::InvalidSlug).with_detail("slug", payload.slug.as_str())
        );
    }

    let restaurant = db::restaurants::create(&state.pool, snowflake_id(), name, &slug, now_millis())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::new(ErrorCode::SlugTaken).with_detail("slug", slug.as_str())
            } else {
                ServiceError::from(e).into()
            }
        })?;

    record_audit(
        &state,
        &admin.user.user_id,
        "restaurant.created",
        serde_json::json!({ "restaurant_id": restaurant.id, "slug": restaurant.slug }),
        &ip,
    )
    .await;
    tracing::info!(restaurant_id = restaurant.id, slug = %restaurant.slug, "Restaurant created");

    Ok(Json(restaurant))
}

/// PUT /api/admin/restaurants/{id}/status
pub async fn update_restaurant_status(
    State(state): State<AppState>,
    admin: AdminUser,
    ClientIp(ip): ClientIp,
    Path(restaurant_id): Path<i64>,
    Json(payload): Json<RestaurantStatusUpdate>,
) -> ApiResult<serde_json::Value> {
    let found = db::restaurants::set_active(&state.pool, restaurant_id, payload.is_active)
        .await
        .map_err(ServiceError::from)?;
    if !found {
        return Err(AppError::new(ErrorCode::RestaurantNotFound));
    }

    let action = if payload.is_active {
        "restaurant.activated"
    } else {
        "restaurant.suspended"
    };
    record_audit(
        &state,
        &admin.user.user_id,
        action,
        serde_json::json!({ "restaurant_id": restaurant_id }),
        &ip,
    )
    .await;
    tracing::info!(restaurant_id, is_active = payload.is_active, "Restaurant status changed");

    Ok(Json(serde_json::json!({
        "id": restaurant_id,
        "is_active": payload.is_active,
    })))
}

/// DELETE /api/admin/restaurants/{id}
///
/// Cascades to menu, tables and orders; linked profiles are unlinked.
pub async fn delete_restaurant(
    State(state): State<AppState>,
    admin: AdminUser,
    ClientIp(ip): ClientIp,
    Path(restaurant_id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let deleted = db::restaurants::delete(&state.pool, restaurant_id)
        .await
        .map_err(ServiceError::from)?;
    if !deleted {
        return Err(AppError::new(ErrorCode::RestaurantNotFound));
    }

    record_audit(
        &state,
        &admin.user.user_id,
        "restaurant.deleted",
        serde_json::json!({ "restaurant_id": restaurant_id }),
        &ip,
    )
    .await;
    tracing::warn!(restaurant_id, admin = %admin.user.user_id, "Restaurant deleted");

    Ok(Json(serde_json::json!({ "deleted": restaurant_id })))
}

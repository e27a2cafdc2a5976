//! User management: approval and profile edits

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{Profile, ProfileStatusUpdate, ProfileUpdate, ProfileWithRestaurant};

use crate::api::{ApiResult, record_audit};
use crate::auth::AdminUser;
use crate::auth::rate_limit::ClientIp;
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Vec<ProfileWithRestaurant>> {
    let users = db::profiles::list_owners_and_admins(&state.pool)
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(users))
}

/// PUT /api/admin/users/{id}/status
pub async fn update_user_status(
    State(state): State<AppState>,
    admin: AdminUser,
    ClientIp(ip): ClientIp,
    Path(user_id): Path<String>,
    Json(payload): Json<ProfileStatusUpdate>,
) -> ApiResult<Profile> {
    let profile = db::profiles::set_status(&state.pool, &user_id, payload.status)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound))?;

    record_audit(
        &state,
        &admin.user.user_id,
        "user.status_changed",
        serde_json::json!({ "user_id": user_id, "status": payload.status }),
        &ip,
    )
    .await;
    tracing::info!(user_id = %user_id, status = ?payload.status, "Profile status changed");

    Ok(Json(profile))
}

/// PUT /api/admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    admin: AdminUser,
    ClientIp(ip): ClientIp,
    Path(user_id): Path<String>,
    Json(payload): Json<ProfileUpdate>,
) -> ApiResult<Profile> {
    if let Some(Some(restaurant_id)) = payload.restaurant_id
        && db::restaurants::find_by_id(&state.pool, restaurant_id)
            .await
            .map_err(ServiceError::from)?
            .is_none()
    {
        return Err(AppError::new(ErrorCode::RestaurantNotFound));
    }

    let profile = db::profiles::update(&state.pool, &user_id, &payload)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound))?;

    record_audit(
        &state,
        &admin.user.user_id,
        "user.updated",
        update_audit_detail(&user_id, &payload),
        &ip,
    )
    .await;
    tracing::info!(user_id = %user_id, role = ?profile.role, "Profile updated");

    Ok(Json(profile))
}

/// Audit detail for a profile edit: the target profile and the submitted fields
fn update_audit_detail(user_id: &str, payload: &ProfileUpdate) -> serde_json::Value {
    serde_json::json!({
        "user_id": user_id,
        "changes": serde_json::to_value(payload).unwrap_or_default(),
    })
}

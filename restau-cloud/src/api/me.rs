//! Signed-in user endpoints: profile, access decision, admin bootstrap

use axum::{Json, extract::State};
use serde::Serialize;
use shared::access::{AccessDecision, evaluate_access, is_admin};
use shared::error::{AppError, ErrorCode};
use shared::models::{Profile, ProfileCreate, Restaurant};
use shared::util::now_millis;

use crate::auth::AuthUser;
use crate::auth::rate_limit::ClientIp;
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;
use crate::util::non_empty;

use super::{ApiResult, record_audit};

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user_id: String,
    pub email: Option<String>,
    pub profile: Option<Profile>,
    pub access: AccessDecision,
    pub is_admin: bool,
    /// Linked restaurant, for the dashboard header
    pub restaurant: Option<Restaurant>,
}

/// GET /api/me
///
/// Never fails on an unapproved account: the client uses `access` to pick
/// the lock screen.
pub async fn get_me(State(state): State<AppState>, user: AuthUser) -> ApiResult<MeResponse> {
    let profile = db::profiles::find(&state.pool, &user.user_id)
        .await
        .map_err(ServiceError::from)?;

    let email = user.email.as_deref();
    let access = evaluate_access(profile.as_ref(), email, &state.fallback_admin_email);
    let is_admin = is_admin(profile.as_ref(), email, &state.fallback_admin_email);

    let restaurant = match profile.as_ref().and_then(|p| p.restaurant_id) {
        Some(id) if access.is_granted() => db::restaurants::find_by_id(&state.pool, id)
            .await
            .map_err(ServiceError::from)?,
        _ => None,
    };

    Ok(Json(MeResponse {
        user_id: user.user_id,
        email: user.email,
        profile,
        access,
        is_admin,
        restaurant,
    }))
}

/// POST /api/me
///
/// First sign-in: creates a pending owner profile.
pub async fn bootstrap_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ProfileCreate>,
) -> ApiResult<Profile> {
    let full_name = non_empty(payload.full_name.as_deref());
    let profile = db::profiles::create_if_missing(
        &state.pool,
        &user.user_id,
        user.email.as_deref(),
        full_name,
        now_millis(),
    )
    .await
    .map_err(|e| {
        tracing::error!(user_id = %user.user_id, "Profile bootstrap error: {e}");
        AppError::new(ErrorCode::DatabaseError)
    })?;

    tracing::info!(user_id = %user.user_id, status = ?profile.status, "Profile ready");
    Ok(Json(profile))
}

/// POST /api/become-admin
///
/// Only an existing admin or the fallback admin email may (re)claim the
/// admin role.
pub async fn become_admin(
    State(state): State<AppState>,
    user: AuthUser,
    ClientIp(ip): ClientIp,
) -> ApiResult<Profile> {
    let existing = db::profiles::find(&state.pool, &user.user_id)
        .await
        .map_err(ServiceError::from)?;

    if !is_admin(
        existing.as_ref(),
        user.email.as_deref(),
        &state.fallback_admin_email,
    ) {
        tracing::warn!(user_id = %user.user_id, ip = %ip, "Admin self-promotion refused");
        return Err(AppError::new(ErrorCode::AdminRequired));
    }

    let profile = db::profiles::promote_to_admin(
        &state.pool,
        &user.user_id,
        user.email.as_deref(),
        now_millis(),
    )
    .await
    .map_err(ServiceError::from)?;

    record_audit(
        &state,
        &user.user_id,
        "admin.promoted",
        serde_json::json!({ "email": user.email }),
        &ip,
    )
    .await;

    tracing::info!(user_id = %user.user_id, "User promoted to admin");
    Ok(Json(profile))
}

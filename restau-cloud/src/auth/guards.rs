//! Access gating extractors
//!
//! Each guard builds on the previous one and caches its result in the
//! request extensions:
//!
//! ```text
//! AuthUser ──▶ DashboardUser ──▶ OwnerContext  (owner | manager + restaurant)
//!                    │      └──▶ StaffContext  (owner | manager | staff + restaurant)
//!                    └──────────▶ AdminUser     (admin role or fallback email)
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::access::{evaluate_access, is_admin};
use shared::error::{AppError, ErrorCode};
use shared::models::{Profile, Role};

use super::session::{AuthUser, authenticate, bearer_token};
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        // Already verified by require_auth
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(AppError::not_authenticated)?;
        let token = bearer_token(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?;

        let user = authenticate(state, token)?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// Signed-in user whose access to dashboard content is granted
#[derive(Debug, Clone)]
pub struct DashboardUser {
    pub user: AuthUser,
    /// `None` only for the fallback admin without a profile row
    pub profile: Option<Profile>,
    pub is_admin: bool,
}

impl DashboardUser {
    pub async fn load(state: &AppState, user: AuthUser) -> Result<Self, AppError> {
        let profile = db::profiles::find(&state.pool, &user.user_id)
            .await
            .map_err(ServiceError::from)?;
        let email = user.email.as_deref();

        evaluate_access(profile.as_ref(), email, &state.fallback_admin_email)
            .require_granted()
            .inspect_err(|e| {
                tracing::debug!(
                    user_id = %user.user_id,
                    code = %e.code,
                    "Dashboard access blocked"
                );
            })?;

        Ok(Self {
            is_admin: is_admin(profile.as_ref(), email, &state.fallback_admin_email),
            profile,
            user,
        })
    }

    /// Linked restaurant, if the profile's role passes `allowed`
    fn restaurant_scope(&self, allowed: fn(&Role) -> bool) -> Result<(i64, Profile), AppError> {
        let profile = self
            .profile
            .clone()
            .ok_or_else(|| AppError::new(ErrorCode::NoRestaurantLinked))?;
        let restaurant_id = profile
            .restaurant_id
            .ok_or_else(|| AppError::new(ErrorCode::NoRestaurantLinked))?;
        if !allowed(&profile.role) {
            return Err(AppError::new(ErrorCode::RoleRequired));
        }
        Ok((restaurant_id, profile))
    }
}

impl FromRequestParts<AppState> for DashboardUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        if let Some(existing) = parts.extensions.get::<DashboardUser>() {
            return Ok(existing.clone());
        }
        let user = AuthUser::from_request_parts(parts, state).await?;
        let dashboard = DashboardUser::load(state, user).await?;
        parts.extensions.insert(dashboard.clone());
        Ok(dashboard)
    }
}

/// Owner or manager of a linked restaurant
#[derive(Debug, Clone)]
pub struct OwnerContext {
    pub user: AuthUser,
    pub profile: Profile,
    pub restaurant_id: i64,
}

impl TryFrom<DashboardUser> for OwnerContext {
    type Error = AppError;

    fn try_from(dashboard: DashboardUser) -> Result<Self, AppError> {
        let (restaurant_id, profile) = dashboard.restaurant_scope(Role::manages_restaurant)?;
        Ok(Self {
            user: dashboard.user,
            profile,
            restaurant_id,
        })
    }
}

impl FromRequestParts<AppState> for OwnerContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        DashboardUser::from_request_parts(parts, state)
            .await?
            .try_into()
    }
}

/// Anyone allowed on the order board of a linked restaurant
#[derive(Debug, Clone)]
pub struct StaffContext {
    pub user: AuthUser,
    pub profile: Profile,
    pub restaurant_id: i64,
}

impl TryFrom<DashboardUser> for StaffContext {
    type Error = AppError;

    fn try_from(dashboard: DashboardUser) -> Result<Self, AppError> {
        let (restaurant_id, profile) = dashboard.restaurant_scope(Role::works_orders)?;
        Ok(Self {
            user: dashboard.user,
            profile,
            restaurant_id,
        })
    }
}

impl FromRequestParts<AppState> for StaffContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        DashboardUser::from_request_parts(parts, state)
            .await?
            .try_into()
    }
}

/// Platform administrator
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub user: AuthUser,
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let dashboard = DashboardUser::from_request_parts(parts, state).await?;
        if !dashboard.is_admin {
            tracing::warn!(user_id = %dashboard.user.user_id, "Admin route denied");
            return Err(AppError::new(ErrorCode::AdminRequired));
        }
        Ok(Self {
            user: dashboard.user,
        })
    }
}

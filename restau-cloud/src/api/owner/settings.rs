//! Restaurant settings: branding, contact, SEO and the storefront QR link

use axum::{Json, extract::State};
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Restaurant, RestaurantSettingsUpdate};
use shared::util::{is_hex_color, sanitize_slug};

use crate::api::ApiResult;
use crate::auth::OwnerContext;
use crate::db;
use crate::db::is_unique_violation;
use crate::error::ServiceError;
use crate::state::AppState;
use crate::util::storefront_url;

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub restaurant: Restaurant,
    pub storefront_url: String,
}

#[derive(Debug, Serialize)]
pub struct QrResponse {
    pub slug: String,
    /// Value to encode in the QR code
    pub url: String,
}

/// Clean up a settings payload: sanitise the slug, check colours, trim the
/// name and currency.
fn normalize(mut s: RestaurantSettingsUpdate) -> Result<RestaurantSettingsUpdate, AppError> {
    if let Some(name) = s.name.as_deref() {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::required("name"));
        }
        s.name = Some(name.to_string());
    }

    if let Some(raw) = s.slug.as_deref() {
        let slug = sanitize_slug(raw);
        if !slug.chars().any(|c| c.is_ascii_alphanumeric()) {
            return Err(AppError::new(ErrorCode::InvalidSlug).with_detail("slug", raw));
        }
        s.slug = Some(slug);
    }

    for (field, value) in [
        ("primary_color", &s.primary_color),
        ("secondary_color", &s.secondary_color),
    ] {
        if let Some(color) = value.as_deref()
            && !color.is_empty()
            && !is_hex_color(color)
        {
            return Err(AppError::new(ErrorCode::InvalidColor).with_detail("field", field));
        }
    }

    if let Some(currency) = s.currency.as_deref() {
        let currency = currency.trim().to_ascii_uppercase();
        if currency.is_empty() {
            return Err(AppError::required("currency"));
        }
        s.currency = Some(currency);
    }

    Ok(s)
}

async fn load(state: &AppState, restaurant_id: i64) -> Result<Restaurant, AppError> {
    db::restaurants::find_by_id(&state.pool, restaurant_id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))
}

/// GET /api/owner/settings
pub async fn get_settings(
    State(state): State<AppState>,
    ctx: OwnerContext,
) -> ApiResult<SettingsResponse> {
    let restaurant = load(&state, ctx.restaurant_id).await?;
    Ok(Json(SettingsResponse {
        storefront_url: storefront_url(&state.public_base_url, &restaurant.slug),
        restaurant,
    }))
}

/// PUT /api/owner/settings
pub async fn update_settings(
    State(state): State<AppState>,
    ctx: OwnerContext,
    Json(payload): Json<RestaurantSettingsUpdate>,
) -> ApiResult<SettingsResponse> {
    let update = normalize(payload)?;

    if let Some(slug) = update.slug.as_deref()
        && db::restaurants::slug_in_use(&state.pool, slug, ctx.restaurant_id)
            .await
            .map_err(ServiceError::from)?
    {
        return Err(AppError::new(ErrorCode::SlugTaken).with_detail("slug", slug));
    }

    let restaurant = db::restaurants::update_settings(&state.pool, ctx.restaurant_id, &update)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::new(ErrorCode::SlugTaken)
            } else {
                ServiceError::from(e).into()
            }
        })?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;

    tracing::info!(
        restaurant_id = ctx.restaurant_id,
        user_id = %ctx.user.user_id,
        role = ?ctx.profile.role,
        "Settings updated"
    );
    Ok(Json(SettingsResponse {
        storefront_url: storefront_url(&state.public_base_url, &restaurant.slug),
        restaurant,
    }))
}

/// GET /api/owner/settings/qr
pub async fn get_qr(State(state): State<AppState>, ctx: OwnerContext) -> ApiResult<QrResponse> {
    let restaurant = load(&state, ctx.restaurant_id).await?;
    Ok(Json(QrResponse {
        url: storefront_url(&state.public_base_url, &restaurant.slug),
        slug: restaurant.slug,
    }))
}

//! Menu management: categories and items

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Category, CategoryCreate, MenuItem, MenuItemCreate, MenuItemUpdate, MenuOverview,
};
use shared::util::now_millis;

use crate::api::ApiResult;
use crate::auth::OwnerContext;
use crate::db;
use crate::db::menu::{CreateItemOutcome, UpdateItemOutcome};
use crate::db::{BoxError, is_unique_violation};
use crate::error::ServiceError;
use crate::state::AppState;

fn validate_price(price: Decimal) -> Result<(), AppError> {
    if price.is_sign_negative() {
        return Err(
            AppError::new(ErrorCode::MenuItemInvalidPrice).with_detail("price", price.to_string())
        );
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::required("name"));
    }
    Ok(())
}

/// Unique violations on categories mean a duplicate name
fn category_conflict(err: BoxError) -> AppError {
    if let Some(db_err) = err.downcast_ref::<sqlx::Error>()
        && is_unique_violation(db_err)
    {
        return AppError::new(ErrorCode::CategoryNameExists);
    }
    ServiceError::Db(err).into()
}

/// GET /api/owner/menu
pub async fn get_menu(State(state): State<AppState>, ctx: OwnerContext) -> ApiResult<MenuOverview> {
    let (categories, items) = tokio::try_join!(
        db::menu::list_categories(&state.pool, ctx.restaurant_id),
        db::menu::list_items(&state.pool, ctx.restaurant_id),
    )
    .map_err(ServiceError::from)?;
    Ok(Json(MenuOverview { categories, items }))
}

/// POST /api/owner/menu/categories
pub async fn create_category(
    State(state): State<AppState>,
    ctx: OwnerContext,
    Json(payload): Json<CategoryCreate>,
) -> ApiResult<Category> {
    validate_name(&payload.name)?;
    let category = db::menu::create_category(
        &state.pool,
        ctx.restaurant_id,
        payload.name.trim(),
        payload.sort_order,
        now_millis(),
    )
    .await
    .map_err(|e| category_conflict(e.into()))?;

    tracing::info!(
        restaurant_id = ctx.restaurant_id,
        category_id = category.id,
        "Category created"
    );
    Ok(Json(category))
}

/// POST /api/owner/menu/items
///
/// With `new_category_name` the category is created first, in the same
/// transaction.
pub async fn create_item(
    State(state): State<AppState>,
    ctx: OwnerContext,
    Json(payload): Json<MenuItemCreate>,
) -> ApiResult<MenuItem> {
    validate_name(&payload.name)?;
    validate_price(payload.price)?;

    let outcome = db::menu::create_item(&state.pool, ctx.restaurant_id, &payload, now_millis())
        .await
        .map_err(category_conflict)?;

    match outcome {
        CreateItemOutcome::Created(item) => {
            tracing::info!(
                restaurant_id = ctx.restaurant_id,
                item_id = item.id,
                "Menu item created"
            );
            Ok(Json(item))
        }
        CreateItemOutcome::UnknownCategory => Err(AppError::new(ErrorCode::CategoryNotFound)),
    }
}

/// PUT /api/owner/menu/items/{id}
pub async fn update_item(
    State(state): State<AppState>,
    ctx: OwnerContext,
    Path(item_id): Path<i64>,
    Json(payload): Json<MenuItemUpdate>,
) -> ApiResult<MenuItem> {
    if let Some(name) = &payload.name {
        validate_name(name)?;
    }
    if let Some(price) = payload.price {
        validate_price(price)?;
    }

    match db::menu::update_item(&state.pool, ctx.restaurant_id, item_id, &payload)
        .await
        .map_err(ServiceError::from)?
    {
        UpdateItemOutcome::Updated(item) => Ok(Json(item)),
        UpdateItemOutcome::NotFound => Err(AppError::new(ErrorCode::MenuItemNotFound)),
        UpdateItemOutcome::UnknownCategory => Err(AppError::new(ErrorCode::CategoryNotFound)),
    }
}

/// DELETE /api/owner/menu/items/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    ctx: OwnerContext,
    Path(item_id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let deleted = db::menu::delete_item(&state.pool, ctx.restaurant_id, item_id)
        .await
        .map_err(ServiceError::from)?;
    if !deleted {
        return Err(AppError::new(ErrorCode::MenuItemNotFound));
    }
    tracing::info!(restaurant_id = ctx.restaurant_id, item_id, "Menu item deleted");
    Ok(Json(serde_json::json!({ "deleted": item_id })))
}

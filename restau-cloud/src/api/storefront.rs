//! Public storefront: menu page and checkout
//!
//! GET  /api/r/{slug}          restaurant profile + menu
//! POST /api/r/{slug}/orders   place an order (prices resolved server-side)

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Category, CheckoutReceipt, CheckoutRequest, MenuItem, Restaurant};
use shared::order::{Cart, OrderStatus};
use shared::util::now_millis;

use crate::db;
use crate::db::orders::NewOrder;
use crate::error::ServiceError;
use crate::state::AppState;
use crate::util::{non_empty, storefront_url};

use super::ApiResult;

#[derive(Debug, Serialize)]
pub struct Storefront {
    pub restaurant: Restaurant,
    pub url: String,
    pub categories: Vec<Category>,
    pub items: Vec<MenuItem>,
}

/// Active restaurant by slug
async fn open_restaurant(state: &AppState, slug: &str) -> Result<Restaurant, AppError> {
    let restaurant = db::restaurants::find_by_slug(&state.pool, slug)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;
    if !restaurant.is_active {
        return Err(AppError::new(ErrorCode::RestaurantInactive));
    }
    Ok(restaurant)
}

/// GET /api/r/{slug}
pub async fn get_storefront(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Storefront> {
    let restaurant = open_restaurant(&state, &slug).await?;

    let (categories, items) = tokio::try_join!(
        db::menu::list_categories(&state.pool, restaurant.id),
        db::menu::list_available_items(&state.pool, restaurant.id),
    )
    .map_err(ServiceError::from)?;

    Ok(Json(Storefront {
        url: storefront_url(&state.public_base_url, &restaurant.slug),
        restaurant,
        categories,
        items,
    }))
}

/// POST /api/r/{slug}/orders
pub async fn checkout(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<CheckoutRequest>,
) -> ApiResult<CheckoutReceipt> {
    let customer_name = non_empty(Some(req.customer_name.as_str()))
        .ok_or_else(|| AppError::new(ErrorCode::CustomerNameRequired))?;

    let restaurant = open_restaurant(&state, &slug).await?;

    let menu = db::menu::list_items(&state.pool, restaurant.id)
        .await
        .map_err(ServiceError::from)?;
    let cart = Cart::price(&req.items, &menu)?;

    let new_order = NewOrder {
        restaurant_id: restaurant.id,
        table_id: req.table_id,
        table_number: non_empty(req.table_number.as_deref()),
        customer_name,
        notes: non_empty(req.notes.as_deref()),
    };
    let order_id = db::orders::insert_checkout(&state.pool, &new_order, &cart, now_millis())
        .await
        .map_err(|e| {
            tracing::error!(restaurant_id = restaurant.id, "Checkout insert error: {e}");
            AppError::new(ErrorCode::DatabaseError)
        })?;

    tracing::info!(
        restaurant_id = restaurant.id,
        order_id,
        items = cart.count(),
        total = %cart.total(),
        "Order placed"
    );

    // Push the stored order (with resolved table number) to open boards
    match db::orders::find_with_items(&state.pool, restaurant.id, order_id).await {
        Ok(Some(order)) => {
            state.live_orders.publish_created(restaurant.id, order);
        }
        Ok(None) => tracing::warn!(order_id, "Placed order vanished before broadcast"),
        Err(e) => tracing::error!(order_id, "Order reload for broadcast failed: {e}"),
    }

    Ok(Json(CheckoutReceipt {
        order_id,
        status: OrderStatus::Pending,
        total_amount: cart.total(),
        item_count: cart.count(),
    }))
}

//! Dining tables

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{DiningTable, TableStatusUpdate};

use crate::api::ApiResult;
use crate::auth::OwnerContext;
use crate::db;
use crate::db::is_unique_violation;
use crate::error::ServiceError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TableCreate {
    pub number: String,
}

/// GET /api/owner/tables
pub async fn list_tables(
    State(state): State<AppState>,
    ctx: OwnerContext,
) -> ApiResult<Vec<DiningTable>> {
    let tables = db::tables::list(&state.pool, ctx.restaurant_id)
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(tables))
}

/// POST /api/owner/tables
pub async fn create_table(
    State(state): State<AppState>,
    ctx: OwnerContext,
    Json(payload): Json<TableCreate>,
) -> ApiResult<DiningTable> {
    let number = payload.number.trim();
    if number.is_empty() {
        return Err(AppError::required("number"));
    }
    let table = db::tables::create(&state.pool, ctx.restaurant_id, number)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists(format!("Table {number}"))
            } else {
                ServiceError::from(e).into()
            }
        })?;
    Ok(Json(table))
}

/// PUT /api/owner/tables/{id}/status
pub async fn update_table_status(
    State(state): State<AppState>,
    ctx: OwnerContext,
    Path(table_id): Path<i64>,
    Json(payload): Json<TableStatusUpdate>,
) -> ApiResult<DiningTable> {
    let table = db::tables::set_status(&state.pool, ctx.restaurant_id, table_id, payload.status)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::TableNotFound))?;
    tracing::debug!(table_id, status = ?table.status, "Table status updated");
    Ok(Json(table))
}

//! Kitchen order board and status actions
//!
//! Every write is a compare-and-set on the status the caller acted on; a
//! lost race surfaces as `OrderStatusConflict` and the board reloads.

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{AppError, ErrorCode};
use shared::live::OrderPatch;
use shared::models::AdvanceRequest;
use shared::order::{OrderBoard, OrderFlowError, OrderStatus};
use shared::util::now_millis;

use crate::api::ApiResult;
use crate::auth::StaffContext;
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;

/// GET /api/owner/orders
pub async fn get_board(State(state): State<AppState>, ctx: StaffContext) -> ApiResult<OrderBoard> {
    let orders = db::orders::list_board(&state.pool, ctx.restaurant_id)
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(OrderBoard::build(orders, now_millis())))
}

/// POST /api/owner/orders/{id}/advance
///
/// `from` is the status the staff member saw on the card; the order moves
/// to its single successor.
pub async fn advance_order(
    State(state): State<AppState>,
    ctx: StaffContext,
    Path(order_id): Path<i64>,
    Json(req): Json<AdvanceRequest>,
) -> ApiResult<OrderPatch> {
    apply(&state, &ctx, order_id, |current| advance_target(current, req.from)).await
}

/// Successor of `seen`, provided the order is still in `seen`.
///
/// A mismatch means another staff member moved the order first; the
/// current status goes back in the details so the board can resync.
fn advance_target(current: OrderStatus, seen: OrderStatus) -> Result<OrderStatus, AppError> {
    if current != seen {
        return Err(AppError::new(ErrorCode::OrderStatusConflict)
            .with_detail("current", current.as_str()));
    }
    let target = seen.next().ok_or(OrderFlowError::InvalidTransition {
        from: seen,
        to: seen,
    })?;
    Ok(current.advance_to(target)?)
}

/// POST /api/owner/orders/{id}/pay
pub async fn pay_order(
    State(state): State<AppState>,
    ctx: StaffContext,
    Path(order_id): Path<i64>,
) -> ApiResult<OrderPatch> {
    apply(&state, &ctx, order_id, |current| Ok(current.settle()?)).await
}

/// POST /api/owner/orders/{id}/cancel
pub async fn cancel_order(
    State(state): State<AppState>,
    ctx: StaffContext,
    Path(order_id): Path<i64>,
) -> ApiResult<OrderPatch> {
    apply(&state, &ctx, order_id, |current| Ok(current.cancel()?)).await
}

/// Read the current status, pick the target, write it conditionally and
/// broadcast the change.
async fn apply(
    state: &AppState,
    ctx: &StaffContext,
    order_id: i64,
    decide: impl FnOnce(OrderStatus) -> Result<OrderStatus, AppError>,
) -> ApiResult<OrderPatch> {
    let rid = ctx.restaurant_id;
    let current = db::orders::find_status(&state.pool, rid, order_id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    let target = decide(current)?;

    let written = db::orders::transition(&state.pool, rid, order_id, current, target)
        .await
        .map_err(ServiceError::from)?;
    if !written {
        tracing::info!(order_id, from = %current, to = %target, "Order status race lost");
        return Err(AppError::new(ErrorCode::OrderStatusConflict));
    }

    tracing::info!(
        restaurant_id = rid,
        order_id,
        user_id = %ctx.user.user_id,
        role = ?ctx.profile.role,
        from = %current,
        to = %target,
        "Order status changed"
    );

    let patch = OrderPatch {
        id: order_id,
        status: target,
        total_amount: None,
    };
    state.live_orders.publish_updated(rid, patch.clone());
    Ok(Json(patch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_moves_to_successor() {
        assert_eq!(
            advance_target(OrderStatus::Pending, OrderStatus::Pending).unwrap(),
            OrderStatus::Preparing
        );
        assert_eq!(
            advance_target(OrderStatus::Ready, OrderStatus::Ready).unwrap(),
            OrderStatus::Served
        );
    }

    #[test]
    fn stale_board_gets_conflict_with_current_status() {
        // Staff saw `pending`, a colleague already started cooking
        let err = advance_target(OrderStatus::Preparing, OrderStatus::Pending).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderStatusConflict);
        assert_eq!(err.details.unwrap()["current"], "preparing");

        let err = advance_target(OrderStatus::Cancelled, OrderStatus::Ready).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderStatusConflict);
        assert_eq!(err.details.unwrap()["current"], "cancelled");
    }

    #[test]
    fn terminal_states_cannot_advance() {
        for status in [OrderStatus::Served, OrderStatus::Paid, OrderStatus::Cancelled] {
            let err = advance_target(status, status).unwrap_err();
            assert_eq!(err.code, ErrorCode::OrderInvalidTransition);
        }
    }
}

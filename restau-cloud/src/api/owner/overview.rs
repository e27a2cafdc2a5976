//! Owner dashboard overview

use axum::{Json, extract::State};
use shared::dashboard::{
    DashboardStats, RECENT_ACTIVITY, TOP_SELLERS, chart_window_start, recent_activity,
    sum_revenue, top_selling, weekly_chart,
};
use shared::util::{now_millis, start_of_day_millis};

use crate::api::ApiResult;
use crate::auth::OwnerContext;
use crate::db::dashboard as queries;
use crate::error::ServiceError;
use crate::state::AppState;

/// GET /api/owner/overview
///
/// Independent reads run concurrently; numbers are recomputed per request.
pub async fn get_overview(
    State(state): State<AppState>,
    ctx: OwnerContext,
) -> ApiResult<DashboardStats> {
    let now = now_millis();
    let today = start_of_day_millis(now);
    let rid = ctx.restaurant_id;
    let pool = &state.pool;

    let (active_orders, active_tables, total_orders_today, revenue_rows, sold, recent) =
        tokio::try_join!(
            queries::count_active_orders(pool, rid),
            queries::count_occupied_tables(pool, rid),
            queries::count_orders_since(pool, rid, today),
            queries::revenue_rows_since(pool, rid, chart_window_start(now)),
            queries::sold_lines(pool, rid),
            queries::recent_orders(pool, rid, RECENT_ACTIVITY as i64),
        )
        .map_err(ServiceError::from)?;

    Ok(Json(DashboardStats {
        total_revenue: sum_revenue(&revenue_rows, today, i64::MAX),
        active_orders,
        active_tables,
        total_orders_today,
        chart_data: weekly_chart(&revenue_rows, now),
        top_selling: top_selling(&sold, TOP_SELLERS),
        recent_activity: recent_activity(&recent),
    }))
}

//! Billing overview (read-only mirror of the billing provider)

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::{SubscriptionStatus, SubscriptionWithRestaurant};

use crate::api::ApiResult;
use crate::auth::AdminUser;
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct BillingOverview {
    pub subscriptions: Vec<SubscriptionWithRestaurant>,
    pub active_count: i64,
    /// Active subscriptions × plan price
    #[serde(with = "rust_decimal::serde::float")]
    pub estimated_mrr: Decimal,
}

/// Monthly recurring revenue estimate
fn estimate_mrr(active: i64, plan_price: Decimal) -> Decimal {
    Decimal::from(active) * plan_price
}

/// GET /api/admin/billing
pub async fn get_billing(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<BillingOverview> {
    let subscriptions = db::subscriptions::list_with_restaurants(&state.pool)
        .await
        .map_err(ServiceError::from)?;
    let active_count = subscriptions
        .iter()
        .filter(|s| s.status == SubscriptionStatus::Active)
        .count() as i64;

    Ok(Json(BillingOverview {
        estimated_mrr: estimate_mrr(active_count, state.plan_monthly_price),
        active_count,
        subscriptions,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mrr_is_active_times_price() {
        assert_eq!(estimate_mrr(0, Decimal::from(29)), Decimal::ZERO);
        assert_eq!(estimate_mrr(4, Decimal::from(29)), Decimal::from(116));
        assert_eq!(estimate_mrr(3, Decimal::new(4990, 2)), Decimal::new(14970, 2));
    }
}

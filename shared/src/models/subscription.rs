//! Subscription Model (read-only mirror of the billing provider)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "text", rename_all = "snake_case"))]
pub enum SubscriptionStatus {
    Active,
    PastDue,
    Canceled,
    Trialing,
}

/// Subscription row joined with the restaurant name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SubscriptionWithRestaurant {
    pub id: i64,
    pub restaurant_id: i64,
    pub restaurant_name: Option<String>,
    pub plan: String,
    pub status: SubscriptionStatus,
    pub current_period_end: Option<i64>,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&SubscriptionStatus::PastDue).unwrap(),
            "\"past_due\""
        );
        let s: SubscriptionStatus = serde_json::from_str("\"trialing\"").unwrap();
        assert_eq!(s, SubscriptionStatus::Trialing);
    }
}

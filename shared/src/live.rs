//! Order board WebSocket protocol
//!
//! Cloud -> board: [`LiveMessage`] (push only, the board never sends commands)

use crate::models::OrderWithItems;
use crate::order::{OrderBoard, OrderStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LiveMessage {
    /// Sent on connect and after the socket fell behind: the full board
    Ready { board: OrderBoard },

    /// A diner placed an order
    OrderCreated {
        order: Box<OrderWithItems>,
        notification: OrderNotification,
    },

    /// Fields to merge into an order already on the board
    OrderUpdated { patch: OrderPatch },
}

/// Toast shown to kitchen staff for a new order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderNotification {
    pub title: String,
    pub description: String,
    pub play_sound: bool,
}

impl OrderNotification {
    pub fn new_order(order: &OrderWithItems) -> Self {
        Self {
            title: "New Order Received!".to_string(),
            description: format!(
                "{} - {}",
                order.order.table_label(),
                order.order.customer_display()
            ),
            play_sound: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPatch {
    pub id: i64,
    pub status: OrderStatus,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub total_amount: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Order;

    fn order(table_number: Option<&str>, customer: Option<&str>) -> OrderWithItems {
        OrderWithItems {
            order: Order {
                id: 9,
                restaurant_id: 1,
                table_id: None,
                table_number: table_number.map(String::from),
                linked_table_number: None,
                customer_name: customer.map(String::from),
                notes: None,
                status: OrderStatus::Pending,
                total_amount: Decimal::new(1200, 2),
                created_at: 0,
            },
            items: vec![],
        }
    }

    #[test]
    fn test_new_order_notification() {
        let n = OrderNotification::new_order(&order(Some("12"), Some("Ana")));
        assert_eq!(n.title, "New Order Received!");
        assert_eq!(n.description, "12 - Ana");
        assert!(n.play_sound);

        let n = OrderNotification::new_order(&order(None, None));
        assert_eq!(n.description, "Express - Guest");
    }

    #[test]
    fn test_message_tagging() {
        let msg = LiveMessage::OrderUpdated {
            patch: OrderPatch {
                id: 9,
                status: OrderStatus::Ready,
                total_amount: None,
            },
        };
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["type"], "OrderUpdated");
        assert_eq!(v["patch"]["status"], "ready");
        assert!(v["patch"].get("total_amount").is_none());
    }
}

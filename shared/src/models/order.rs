//! Order Models

use crate::order::OrderStatus;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub restaurant_id: i64,
    pub table_id: Option<i64>,
    /// Free-text table entered at checkout
    pub table_number: Option<String>,
    /// `tables.number` of the linked table, if any
    pub linked_table_number: Option<String>,
    pub customer_name: Option<String>,
    pub notes: Option<String>,
    pub status: OrderStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub created_at: i64,
}

impl Order {
    /// Table shown on notifications: free text, else `Table <n>`, else `Express`
    pub fn table_label(&self) -> String {
        self.table_label_with("Table")
    }

    /// Table shown on board cards: free text, else `No. <n>`, else `Express`
    pub fn board_table_label(&self) -> String {
        self.table_label_with("No.")
    }

    fn table_label_with(&self, prefix: &str) -> String {
        match (non_blank(&self.table_number), non_blank(&self.linked_table_number)) {
            (Some(text), _) => text.to_string(),
            (None, Some(number)) => format!("{prefix} {number}"),
            (None, None) => "Express".to_string(),
        }
    }

    /// Customer name, `Guest` when absent
    pub fn customer_display(&self) -> &str {
        non_blank(&self.customer_name).unwrap_or("Guest")
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Order line joined with its menu item name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItemDetail {
    pub id: i64,
    pub order_id: i64,
    /// `None` once the menu item has been deleted
    pub menu_item_id: Option<i64>,
    pub menu_item_name: Option<String>,
    pub quantity: i32,
    /// Unit price captured at checkout
    #[serde(with = "rust_decimal::serde::float")]
    pub price_at_time: Decimal,
    pub notes: Option<String>,
}

/// Order with its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemDetail>,
}

/// One requested line in a checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutLine {
    pub menu_item_id: i64,
    pub quantity: i32,
    pub notes: Option<String>,
}

/// Storefront checkout payload (prices are resolved server-side)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub table_number: Option<String>,
    pub table_id: Option<i64>,
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<CheckoutLine>,
}

/// Checkout result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    pub order_id: i64,
    pub status: OrderStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub item_count: u32,
}

/// Staff advance payload: the status the client last saw
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceRequest {
    pub from: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(table_number: Option<&str>, linked: Option<&str>, customer: Option<&str>) -> Order {
        Order {
            id: 1,
            restaurant_id: 1,
            table_id: None,
            table_number: table_number.map(String::from),
            linked_table_number: linked.map(String::from),
            customer_name: customer.map(String::from),
            notes: None,
            status: OrderStatus::Pending,
            total_amount: Decimal::ZERO,
            created_at: 0,
        }
    }

    #[test]
    fn test_table_label_fallbacks() {
        assert_eq!(order(Some("Patio"), Some("4"), None).table_label(), "Patio");
        assert_eq!(order(None, Some("4"), None).table_label(), "Table 4");
        assert_eq!(order(None, Some("4"), None).board_table_label(), "No. 4");
        assert_eq!(order(Some("  "), None, None).table_label(), "Express");
    }

    #[test]
    fn test_customer_display() {
        assert_eq!(order(None, None, Some("Ana")).customer_display(), "Ana");
        assert_eq!(order(None, None, None).customer_display(), "Guest");
        assert_eq!(order(None, None, Some("")).customer_display(), "Guest");
    }

    #[test]
    fn test_order_with_items_flattens() {
        let o = OrderWithItems {
            order: order(Some("7"), None, Some("Bo")),
            items: vec![],
        };
        let v = serde_json::to_value(&o).unwrap();
        assert_eq!(v["table_number"], "7");
        assert_eq!(v["status"], "pending");
        assert!(v["items"].as_array().unwrap().is_empty());
    }
}

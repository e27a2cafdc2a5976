//! Kitchen order board

use super::status::{OrderStatus, StaffAction, elapsed_minutes, is_late};
use crate::models::OrderWithItems;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardCard {
    #[serde(flatten)]
    pub order: OrderWithItems,
    pub table_label: String,
    pub elapsed_minutes: i64,
    pub is_late: bool,
    pub action: Option<StaffAction>,
    pub next_status: Option<OrderStatus>,
}

impl BoardCard {
    pub fn new(order: OrderWithItems, now: i64) -> Self {
        let created_at = order.order.created_at;
        let status = order.order.status;
        Self {
            table_label: order.order.board_table_label(),
            elapsed_minutes: elapsed_minutes(created_at, now),
            is_late: is_late(created_at, now),
            action: status.action(),
            next_status: status.next(),
            order,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardColumn {
    pub status: OrderStatus,
    pub title: String,
    pub count: usize,
    pub cards: Vec<BoardCard>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBoard {
    pub columns: Vec<BoardColumn>,
    /// Served orders waiting to be settled
    pub awaiting_payment: Vec<BoardCard>,
}

pub fn column_title(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "New Orders",
        OrderStatus::Preparing => "Preparing",
        OrderStatus::Ready => "Ready to Serve",
        OrderStatus::Served => "Served",
        OrderStatus::Paid => "Paid",
        OrderStatus::Cancelled => "Cancelled",
    }
}

impl OrderBoard {
    /// Split orders into board columns, keeping the input order inside each.
    /// Paid and cancelled orders are dropped.
    pub fn build(orders: Vec<OrderWithItems>, now: i64) -> Self {
        let mut columns: Vec<BoardColumn> = OrderStatus::BOARD
            .iter()
            .map(|&status| BoardColumn {
                status,
                title: column_title(status).to_string(),
                count: 0,
                cards: Vec::new(),
            })
            .collect();
        let mut awaiting_payment = Vec::new();

        for order in orders {
            let status = order.order.status;
            if !status.is_on_board() {
                continue;
            }
            let card = BoardCard::new(order, now);
            match columns.iter_mut().find(|c| c.status == status) {
                Some(column) => column.cards.push(card),
                None => awaiting_payment.push(card),
            }
        }
        for column in &mut columns {
            column.count = column.cards.len();
        }

        Self {
            columns,
            awaiting_payment,
        }
    }
}

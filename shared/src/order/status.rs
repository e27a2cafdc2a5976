//! Order status workflow
//!
//! ```text
//! pending -> preparing -> ready -> served
//!    \_________\____________\________\____ paid      (settle)
//!    \_________\____________\_____________ cancelled (cancel)
//! ```
//!
//! Staff actions only move an order one step forward. Settling and
//! cancelling are the two terminal exits.

use crate::error::{AppError, ErrorCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Minutes after which an open order is flagged late on the board
pub const LATE_AFTER_MINUTES: i64 = 15;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "text", rename_all = "lowercase"))]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Served,
    Paid,
    Cancelled,
}

/// Button shown to staff for an order in a given state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaffAction {
    Cook,
    Ready,
    Serve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OrderFlowError {
    #[error("cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("order is already paid")]
    AlreadyPaid,
    #[error("order is already cancelled")]
    AlreadyCancelled,
    #[error("served orders can only be settled")]
    AlreadyServed,
}

impl From<OrderFlowError> for AppError {
    fn from(err: OrderFlowError) -> Self {
        let code = match err {
            OrderFlowError::InvalidTransition { .. } | OrderFlowError::AlreadyServed => {
                ErrorCode::OrderInvalidTransition
            }
            OrderFlowError::AlreadyPaid => ErrorCode::OrderAlreadyPaid,
            OrderFlowError::AlreadyCancelled => ErrorCode::OrderAlreadyCancelled,
        };
        AppError::with_message(code, err.to_string())
    }
}

impl OrderStatus {
    /// Board columns, in display order
    pub const BOARD: [OrderStatus; 3] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::Ready,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Served => "served",
            OrderStatus::Paid => "paid",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// The single forward successor
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Served),
            OrderStatus::Served | OrderStatus::Paid | OrderStatus::Cancelled => None,
        }
    }

    /// Validate a staff transition. Only `self.next()` is accepted.
    pub fn advance_to(&self, target: OrderStatus) -> Result<OrderStatus, OrderFlowError> {
        match self.next() {
            Some(next) if next == target => Ok(target),
            _ => Err(OrderFlowError::InvalidTransition {
                from: *self,
                to: target,
            }),
        }
    }

    pub fn action(&self) -> Option<StaffAction> {
        match self {
            OrderStatus::Pending => Some(StaffAction::Cook),
            OrderStatus::Preparing => Some(StaffAction::Ready),
            OrderStatus::Ready => Some(StaffAction::Serve),
            _ => None,
        }
    }

    /// Counted as "active" on the owner dashboard
    pub fn is_active(&self) -> bool {
        !matches!(
            self,
            OrderStatus::Served | OrderStatus::Paid | OrderStatus::Cancelled
        )
    }

    /// Listed on the kitchen board
    pub fn is_on_board(&self) -> bool {
        !self.is_terminal()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Cancelled)
    }

    pub fn settle(&self) -> Result<OrderStatus, OrderFlowError> {
        match self {
            OrderStatus::Paid => Err(OrderFlowError::AlreadyPaid),
            OrderStatus::Cancelled => Err(OrderFlowError::AlreadyCancelled),
            _ => Ok(OrderStatus::Paid),
        }
    }

    pub fn cancel(&self) -> Result<OrderStatus, OrderFlowError> {
        match self {
            OrderStatus::Paid => Err(OrderFlowError::AlreadyPaid),
            OrderStatus::Cancelled => Err(OrderFlowError::AlreadyCancelled),
            OrderStatus::Served => Err(OrderFlowError::AlreadyServed),
            _ => Ok(OrderStatus::Cancelled),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            "served" => Ok(OrderStatus::Served),
            "paid" => Ok(OrderStatus::Paid),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(AppError::validation(format!("unknown order status: {other}"))),
        }
    }
}

/// Whole minutes since `created_at`, never negative
pub fn elapsed_minutes(created_at: i64, now: i64) -> i64 {
    (now - created_at).max(0) / 60_000
}

pub fn is_late(created_at: i64, now: i64) -> bool {
    elapsed_minutes(created_at, now) > LATE_AFTER_MINUTES
}

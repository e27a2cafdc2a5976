//! Order domain: status workflow, cart pricing and the kitchen board

pub mod board;
pub mod cart;
pub mod status;

pub use board::{BoardCard, BoardColumn, OrderBoard};
pub use cart::{Cart, CartError, CartLine, MAX_LINE_QUANTITY};
pub use status::{
    LATE_AFTER_MINUTES, OrderFlowError, OrderStatus, StaffAction, elapsed_minutes, is_late,
};

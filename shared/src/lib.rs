//! Shared types for Restau Plus
//!
//! Domain models, error codes and the pure parts of the ordering workflow
//! (status transitions, cart pricing, board layout, dashboard figures).

pub mod access;
pub mod dashboard;
pub mod error;
pub mod live;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

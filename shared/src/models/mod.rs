//! Data models
//!
//! Shared between restau-cloud and its API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! Resource IDs are Snowflake `i64`; user IDs are the auth provider's subject.

pub mod menu;
pub mod order;
pub mod profile;
pub mod restaurant;
pub mod subscription;
pub mod table;

// Re-exports
pub use menu::*;
pub use order::*;
pub use profile::*;
pub use restaurant::*;
pub use subscription::*;
pub use table::*;

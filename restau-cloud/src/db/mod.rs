//! Database access layer
//!
//! Functions take `&PgPool` (or a transaction) and return raw database
//! errors; handlers map them through `ServiceError`.

pub mod audit;
pub mod dashboard;
pub mod menu;
pub mod orders;
pub mod profiles;
pub mod restaurants;
pub mod subscriptions;
pub mod tables;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// PostgreSQL unique_violation
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

//! Authentication and access gating
//!
//! Sign-in happens at the external auth provider; this service only
//! verifies its HS256 session tokens and applies the profile-based gates.

pub mod guards;
pub mod rate_limit;
pub mod session;

pub use guards::{AdminUser, DashboardUser, OwnerContext, StaffContext};
pub use session::{AuthUser, require_auth};

//! Error codes and the API error envelope
//!
//! Codes are grouped by thousand: 0xxx general, 1xxx auth, 2xxx account
//! access, 3xxx tenant, 4xxx orders, 6xxx menu, 7xxx tables, 9xxx system.
//!
//! ```
//! use shared::error::{AppError, ErrorBody, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::OrderStatusConflict).with_detail("current", "ready");
//! let body = ErrorBody::from(&err);
//! assert_eq!(body.code, 4009);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorBody};

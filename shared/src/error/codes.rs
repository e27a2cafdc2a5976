//! Unified error codes for the Restau Plus platform
//!
//! Every error surfaced by the API carries one of these codes.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission / access gating errors
//! - 3xxx: Restaurant (tenant) errors
//! - 4xxx: Order errors
//! - 6xxx: Menu errors
//! - 7xxx: Table errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Serialized as a plain `u16` so dashboards and storefront clients can
/// switch on it without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Required field missing
    RequiredField = 7,
    /// Too many requests from one client
    RateLimited = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Signed-in user has no profile row yet
    ProfileNotFound = 1008,

    // ==================== 2xxx: Permission ====================
    /// Specific role required
    RoleRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,
    /// Account awaiting administrator approval
    AccountPending = 2006,
    /// Account rejected by an administrator
    AccountRejected = 2007,

    // ==================== 3xxx: Restaurant ====================
    /// Profile is not linked to any restaurant
    NoRestaurantLinked = 3001,
    /// Restaurant not found
    RestaurantNotFound = 3002,
    /// Restaurant storefront is not publicly active
    RestaurantInactive = 3003,
    /// Slug already used by another restaurant
    SlugTaken = 3004,
    /// Slug is empty after sanitising
    InvalidSlug = 3005,
    /// Colour is not a `#rrggbb` value
    InvalidColor = 3006,
    /// Too many live order board connections for one restaurant
    LiveConnectionLimit = 3007,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has already been paid
    OrderAlreadyPaid = 4002,
    /// Order has already been cancelled
    OrderAlreadyCancelled = 4004,
    /// Order has no line items
    OrderEmpty = 4007,
    /// Requested status is not the next step of the workflow
    OrderInvalidTransition = 4008,
    /// Order status changed since the client last saw it
    OrderStatusConflict = 4009,
    /// Checkout without a customer name
    CustomerNameRequired = 4010,
    /// Line quantity outside the accepted range
    InvalidQuantity = 4011,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Menu item has invalid price
    MenuItemInvalidPrice = 6002,
    /// Menu item is not available for ordering
    MenuItemUnavailable = 6003,
    /// Category not found
    CategoryNotFound = 6101,
    /// Category name already exists
    CategoryNameExists = 6103,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::RateLimited => "Too many requests, try again later",

            // Auth
            ErrorCode::NotAuthenticated => "Not authenticated",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::ProfileNotFound => "Profile not found",

            // Permission
            ErrorCode::RoleRequired => "Unauthorized Access: Owners/Managers only",
            ErrorCode::AdminRequired => "Unauthorized: Admin only",
            ErrorCode::AccountPending => {
                "Your account is currently awaiting administrator approval. \
                 You will gain full access once your request is reviewed."
            }
            ErrorCode::AccountRejected => {
                "Your account access has been rejected by the administrator. \
                 Please contact support if you believe this is an error."
            }

            // Restaurant
            ErrorCode::NoRestaurantLinked => "No Restaurant Linked. Please contact support.",
            ErrorCode::RestaurantNotFound => "Restaurant not found",
            ErrorCode::RestaurantInactive => {
                "Restaurant Unavailable: this restaurant's page is currently not publicly active"
            }
            ErrorCode::SlugTaken => "Slug is already in use",
            ErrorCode::InvalidSlug => "Slug must contain at least one letter or digit",
            ErrorCode::InvalidColor => "Colour must be a #rrggbb hex value",
            ErrorCode::LiveConnectionLimit => "Too many live order board connections",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAlreadyPaid => "Order has already been paid",
            ErrorCode::OrderAlreadyCancelled => "Order has already been cancelled",
            ErrorCode::OrderEmpty => "Order has no items",
            ErrorCode::OrderInvalidTransition => "Order cannot move to the requested status",
            ErrorCode::OrderStatusConflict => "Order status was changed by someone else",
            ErrorCode::CustomerNameRequired => "Please enter your name.",
            ErrorCode::InvalidQuantity => "Quantity is out of range",

            // Menu
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::MenuItemInvalidPrice => "Menu item has invalid price",
            ErrorCode::MenuItemUnavailable => "Menu item is not available",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryNameExists => "Category name already exists",

            // Table
            ErrorCode::TableNotFound => "Table not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            7 => Ok(ErrorCode::RequiredField),
            9 => Ok(ErrorCode::RateLimited),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1008 => Ok(ErrorCode::ProfileNotFound),

            // Permission
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::AdminRequired),
            2006 => Ok(ErrorCode::AccountPending),
            2007 => Ok(ErrorCode::AccountRejected),

            // Restaurant
            3001 => Ok(ErrorCode::NoRestaurantLinked),
            3002 => Ok(ErrorCode::RestaurantNotFound),
            3003 => Ok(ErrorCode::RestaurantInactive),
            3004 => Ok(ErrorCode::SlugTaken),
            3005 => Ok(ErrorCode::InvalidSlug),
            3006 => Ok(ErrorCode::InvalidColor),
            3007 => Ok(ErrorCode::LiveConnectionLimit),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderAlreadyPaid),
            4004 => Ok(ErrorCode::OrderAlreadyCancelled),
            4007 => Ok(ErrorCode::OrderEmpty),
            4008 => Ok(ErrorCode::OrderInvalidTransition),
            4009 => Ok(ErrorCode::OrderStatusConflict),
            4010 => Ok(ErrorCode::CustomerNameRequired),
            4011 => Ok(ErrorCode::InvalidQuantity),

            // Menu
            6001 => Ok(ErrorCode::MenuItemNotFound),
            6002 => Ok(ErrorCode::MenuItemInvalidPrice),
            6003 => Ok(ErrorCode::MenuItemUnavailable),
            6101 => Ok(ErrorCode::CategoryNotFound),
            6103 => Ok(ErrorCode::CategoryNameExists),

            // Table
            7001 => Ok(ErrorCode::TableNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::AccountPending.code(), 2006);
        assert_eq!(ErrorCode::AccountRejected.code(), 2007);
        assert_eq!(ErrorCode::RestaurantInactive.code(), 3003);
        assert_eq!(ErrorCode::OrderInvalidTransition.code(), 4008);
        assert_eq!(ErrorCode::MenuItemNotFound.code(), 6001);
        assert_eq!(ErrorCode::TableNotFound.code(), 7001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_known_codes() {
        let codes = [
            ErrorCode::TokenExpired,
            ErrorCode::AccountRejected,
            ErrorCode::SlugTaken,
            ErrorCode::OrderStatusConflict,
            ErrorCode::CategoryNameExists,
            ErrorCode::TableNotFound,
        ];
        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_unknown_codes() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(5001), Err(InvalidErrorCode(5001)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::OrderEmpty).unwrap();
        assert_eq!(json, "4007");
        let code: ErrorCode = serde_json::from_str("2006").unwrap();
        assert_eq!(code, ErrorCode::AccountPending);
        assert!(serde_json::from_str::<ErrorCode>("1234").is_err());
    }

    #[test]
    fn test_customer_facing_messages() {
        assert_eq!(
            ErrorCode::CustomerNameRequired.message(),
            "Please enter your name."
        );
        assert!(ErrorCode::AccountPending.message().contains("awaiting"));
        assert!(ErrorCode::AccountRejected.message().contains("rejected"));
    }
}

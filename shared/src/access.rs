//! Dashboard access decision
//!
//! A signed-in user only reaches dashboard content once an administrator
//! approved their profile. Admins (by role, or the configured fallback admin
//! email) are always let through.

use crate::error::{AppError, ErrorCode};
use crate::models::{Profile, ProfileStatus, Role};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessDecision {
    Granted,
    Pending,
    Rejected,
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted)
    }

    /// `Ok` when granted, otherwise the lock-screen error
    pub fn require_granted(self) -> Result<(), AppError> {
        match self {
            AccessDecision::Granted => Ok(()),
            AccessDecision::Pending => Err(AppError::new(ErrorCode::AccountPending)),
            AccessDecision::Rejected => Err(AppError::new(ErrorCode::AccountRejected)),
        }
    }
}

/// Email match against the fallback admin address, ignoring case and
/// surrounding whitespace
pub fn is_fallback_admin(email: Option<&str>, fallback_admin_email: &str) -> bool {
    let fallback = fallback_admin_email.trim();
    !fallback.is_empty()
        && email.is_some_and(|e| e.trim().eq_ignore_ascii_case(fallback))
}

/// Admin by role or by fallback email
pub fn is_admin(
    profile: Option<&Profile>,
    email: Option<&str>,
    fallback_admin_email: &str,
) -> bool {
    profile.is_some_and(|p| p.role == Role::Admin) || is_fallback_admin(email, fallback_admin_email)
}

/// Decide whether a user may see dashboard content.
///
/// A missing profile (not yet bootstrapped, or unreadable) is treated as
/// pending.
pub fn evaluate_access(
    profile: Option<&Profile>,
    email: Option<&str>,
    fallback_admin_email: &str,
) -> AccessDecision {
    if is_admin(profile, email, fallback_admin_email) {
        return AccessDecision::Granted;
    }
    match profile.map(|p| p.status) {
        Some(ProfileStatus::Approved) => AccessDecision::Granted,
        Some(ProfileStatus::Rejected) => AccessDecision::Rejected,
        Some(ProfileStatus::Pending) | None => AccessDecision::Pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FALLBACK: &str = "admin@restauplus.com";

    fn profile(role: Role, status: ProfileStatus) -> Profile {
        Profile {
            id: "user-1".to_string(),
            email: Some("owner@example.com".to_string()),
            full_name: None,
            role,
            status,
            restaurant_id: Some(1),
            created_at: 0,
        }
    }

    #[test]
    fn test_pending_and_rejected_blocked() {
        let p = profile(Role::Owner, ProfileStatus::Pending);
        assert_eq!(
            evaluate_access(Some(&p), p.email.as_deref(), FALLBACK),
            AccessDecision::Pending
        );
        let p = profile(Role::Owner, ProfileStatus::Rejected);
        assert_eq!(
            evaluate_access(Some(&p), p.email.as_deref(), FALLBACK),
            AccessDecision::Rejected
        );
    }

    #[test]
    fn test_missing_profile_is_pending() {
        assert_eq!(
            evaluate_access(None, Some("someone@example.com"), FALLBACK),
            AccessDecision::Pending
        );
        assert_eq!(evaluate_access(None, None, FALLBACK), AccessDecision::Pending);
    }

    #[test]
    fn test_approved_owner_granted() {
        let p = profile(Role::Owner, ProfileStatus::Approved);
        assert_eq!(
            evaluate_access(Some(&p), p.email.as_deref(), FALLBACK),
            AccessDecision::Granted
        );
    }

    #[test]
    fn test_admin_granted_regardless_of_status() {
        let p = profile(Role::Admin, ProfileStatus::Pending);
        assert_eq!(
            evaluate_access(Some(&p), None, FALLBACK),
            AccessDecision::Granted
        );
        let p = profile(Role::Owner, ProfileStatus::Rejected);
        assert_eq!(
            evaluate_access(Some(&p), Some("Admin@RestauPlus.com "), FALLBACK),
            AccessDecision::Granted
        );
        assert_eq!(
            evaluate_access(None, Some(FALLBACK), FALLBACK),
            AccessDecision::Granted
        );
    }

    #[test]
    fn test_empty_fallback_never_matches() {
        assert!(!is_fallback_admin(Some(""), ""));
        assert!(!is_fallback_admin(None, FALLBACK));
    }

    #[test]
    fn test_require_granted_errors() {
        assert!(AccessDecision::Granted.require_granted().is_ok());
        assert_eq!(
            AccessDecision::Pending.require_granted().unwrap_err().code,
            ErrorCode::AccountPending
        );
        assert_eq!(
            AccessDecision::Rejected.require_granted().unwrap_err().code,
            ErrorCode::AccountRejected
        );
    }
}

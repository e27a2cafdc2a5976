//! Profile Model

use serde::{Deserialize, Serialize};

/// Platform role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "text", rename_all = "lowercase"))]
pub enum Role {
    #[default]
    Owner,
    Manager,
    Admin,
    Staff,
}

impl Role {
    /// Owners and managers run the restaurant dashboard
    pub fn manages_restaurant(&self) -> bool {
        matches!(self, Role::Owner | Role::Manager)
    }

    /// Roles allowed on the order board
    pub fn works_orders(&self) -> bool {
        matches!(self, Role::Owner | Role::Manager | Role::Staff)
    }
}

/// Approval status of a profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "text", rename_all = "lowercase"))]
pub enum ProfileStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Profile entity, keyed by the auth provider's user id
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Profile {
    pub id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Role,
    pub status: ProfileStatus,
    pub restaurant_id: Option<i64>,
    pub created_at: i64,
}

/// Admin listing row: profile joined with its restaurant name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProfileWithRestaurant {
    pub id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Role,
    pub status: ProfileStatus,
    pub restaurant_id: Option<i64>,
    pub restaurant_name: Option<String>,
    pub created_at: i64,
}

/// First sign-in bootstrap payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileCreate {
    pub full_name: Option<String>,
}

/// Admin: approve / reject payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileStatusUpdate {
    pub status: ProfileStatus,
}

/// Admin: full profile edit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub role: Option<Role>,
    pub status: Option<ProfileStatus>,
    /// `Some(None)` unlinks the restaurant
    #[serde(default, with = "double_option")]
    pub restaurant_id: Option<Option<i64>>,
}

/// Distinguishes an absent field from an explicit `null`
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Option<i64>>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(inner) => inner.serialize(s),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Option<i64>>, D::Error> {
        Option::<i64>::deserialize(d).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Manager).unwrap(), "\"manager\"");
        let role: Role = serde_json::from_str("\"staff\"").unwrap();
        assert_eq!(role, Role::Staff);
        assert!(serde_json::from_str::<Role>("\"chef\"").is_err());
    }

    #[test]
    fn test_role_capabilities() {
        assert!(Role::Owner.manages_restaurant());
        assert!(Role::Manager.manages_restaurant());
        assert!(!Role::Staff.manages_restaurant());
        assert!(!Role::Admin.manages_restaurant());
        assert!(Role::Staff.works_orders());
        assert!(!Role::Admin.works_orders());
    }

    #[test]
    fn test_profile_update_restaurant_field() {
        let absent: ProfileUpdate = serde_json::from_str(r#"{"full_name":"Ana"}"#).unwrap();
        assert_eq!(absent.restaurant_id, None);

        let cleared: ProfileUpdate = serde_json::from_str(r#"{"restaurant_id":null}"#).unwrap();
        assert_eq!(cleared.restaurant_id, Some(None));

        let linked: ProfileUpdate = serde_json::from_str(r#"{"restaurant_id":42}"#).unwrap();
        assert_eq!(linked.restaurant_id, Some(Some(42)));
    }
}

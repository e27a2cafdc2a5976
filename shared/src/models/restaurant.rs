//! Restaurant Model

use serde::{Deserialize, Serialize};

/// Restaurant (tenant) entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
    /// ISO 4217 code shown on the storefront
    pub currency: String,

    // -- Branding --
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,

    // -- Contact --
    pub phone: Option<String>,
    pub email_public: Option<String>,
    pub address: Option<String>,

    // -- Social --
    pub instagram_url: Option<String>,
    pub facebook_url: Option<String>,
    pub website_url: Option<String>,

    // -- SEO --
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub brand_story: Option<String>,

    pub created_at: i64,
}

/// Admin: create restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantCreate {
    pub name: String,
    pub slug: String,
}

/// Admin: activate / suspend payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantStatusUpdate {
    pub is_active: bool,
}

/// Owner settings payload
///
/// `None` leaves a field untouched; an empty string clears optional text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantSettingsUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub currency: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub phone: Option<String>,
    pub email_public: Option<String>,
    pub address: Option<String>,
    pub instagram_url: Option<String>,
    pub facebook_url: Option<String>,
    pub website_url: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub brand_story: Option<String>,
}

/// Admin listing row: restaurant with its owner count
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RestaurantSummary {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub is_active: bool,
    pub created_at: i64,
    pub owner_email: Option<String>,
}

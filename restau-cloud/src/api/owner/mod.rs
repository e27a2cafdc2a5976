//! Restaurant dashboard endpoints, scoped to the caller's restaurant

pub mod menu;
pub mod orders;
pub mod overview;
pub mod settings;
pub mod tables;

//! Platform administration endpoints

pub mod audit;
pub mod billing;
pub mod health;
pub mod restaurants;
pub mod users;

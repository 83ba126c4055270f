pub mod admin;
pub mod health;
pub mod mint;
pub mod types;

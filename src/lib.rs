// Blog service - posts and comments CRUD over a relational store

pub mod api;
pub mod app_state;
pub mod config;
pub mod database;
pub mod error;
pub mod external;
pub mod models;
pub mod seed;

// Re-exports for convenience
pub use error::{AppError, AppResult};

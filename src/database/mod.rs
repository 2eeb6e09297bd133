//! # Database Module
//!
//! PostgreSQL integration using tokio-postgres and deadpool for async
//! operations. Includes connection management, models, store traits and the
//! schema bootstrap.

pub mod community;
pub mod connection;
pub mod lesson_plans;
pub mod migrations;
pub mod models;
pub mod store;
pub mod users;

#[cfg(test)]
pub mod memory;

pub use connection::DatabaseConnection;
pub use models::*;
pub use store::{Store, StoreError};

//! Database
//!
//! PostgreSQL pool setup and migrations

pub mod connection;

pub use connection::DatabaseConnection;

//! Shared utilities
//!
//! Error handling, validation and lenient deserialization helpers.

pub mod errors;
pub mod serde_helpers;
pub mod validation;

pub use errors::{AppError, AppResult};

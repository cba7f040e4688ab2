//! PostgreSQL store
//!
//! Raw `sqlx::query_as` against the schema in `migrations/`. Multi-record
//! operations run in a transaction and lock rows in a fixed order
//! (driver, then vehicle) so concurrent requests serialize instead of
//! deadlocking.

mod assignment_repository;
mod booking_repository;
mod default_package_repository;
mod driver_repository;
mod vehicle_repository;

use sqlx::PgPool;

use super::FleetStore;
use crate::utils::errors::AppError;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl FleetStore for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

/// Turn a unique-index violation into `Conflict`, anything else into a store error.
pub(crate) fn unique_violation_as_conflict(err: sqlx::Error, message: impl FnOnce() -> String) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::Conflict(message()),
        _ => AppError::Database(err),
    }
}

//! Repositories
//!
//! One trait per collection. `FleetStore` bundles them so handlers can hold a
//! single `Arc<dyn FleetStore>`; `PgStore` is the production backend and
//! `MemoryStore` backs tests and local runs.
//!
//! Operations that must observe and mutate several records at once
//! (starting/ending an assignment, deleting a driver or vehicle) are single
//! repository calls so each backend can make them atomic.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    Assignment, AssignmentFilter, AvailabilityPolicy, Booking, BookingChanges, DefaultPackage,
    DefaultPackageChanges, Driver, DriverChanges, DriverFilter, NewAssignment, NewBooking,
    NewDefaultPackage, NewDriver, NewVehicle, Vehicle, VehicleChanges, VehicleFilter,
};
use crate::utils::errors::AppResult;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait DriverRepository: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn create_driver(&self, new: NewDriver) -> AppResult<Driver>;

    async fn find_driver(&self, id: Uuid) -> AppResult<Option<Driver>>;

    async fn find_drivers_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Driver>>;

    /// Ordered by registration time.
    async fn list_drivers(&self, filter: DriverFilter) -> AppResult<Vec<Driver>>;

    async fn update_driver(&self, id: Uuid, changes: DriverChanges) -> AppResult<Option<Driver>>;

    /// Fails with `Conflict` while the driver has an active assignment.
    async fn delete_driver(&self, id: Uuid) -> AppResult<Option<Driver>>;
}

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    /// Fails with `Conflict` when the plate number is already registered.
    async fn create_vehicle(&self, new: NewVehicle) -> AppResult<Vehicle>;

    async fn find_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>>;

    async fn find_vehicles_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Vehicle>>;

    async fn list_vehicles(&self, filter: VehicleFilter) -> AppResult<Vec<Vehicle>>;

    async fn update_vehicle(&self, id: Uuid, changes: VehicleChanges) -> AppResult<Option<Vehicle>>;

    /// Fails with `Conflict` while the vehicle has an active assignment.
    async fn delete_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>>;
}

#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Atomically: load both records, run
    /// [`check_can_start`](crate::models::assignment::check_can_start), insert
    /// the assignment and apply `policy` to both availability flags.
    async fn start_assignment(&self, new: NewAssignment, policy: AvailabilityPolicy) -> AppResult<Assignment>;

    /// Atomically: end the assignment and mark its driver and vehicle available.
    async fn end_assignment(&self, id: Uuid, ended_at: DateTime<Utc>) -> AppResult<Assignment>;

    async fn find_assignment(&self, id: Uuid) -> AppResult<Option<Assignment>>;

    /// Ordered by `start_date`, most recent first.
    async fn list_assignments(&self, filter: AssignmentFilter) -> AppResult<Vec<Assignment>>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create_booking(&self, new: NewBooking) -> AppResult<Booking>;

    async fn find_booking(&self, id: Uuid) -> AppResult<Option<Booking>>;

    async fn list_bookings(&self) -> AppResult<Vec<Booking>>;

    async fn update_booking(&self, id: Uuid, changes: BookingChanges) -> AppResult<Option<Booking>>;

    async fn delete_booking(&self, id: Uuid) -> AppResult<Option<Booking>>;
}

#[async_trait]
pub trait DefaultPackageRepository: Send + Sync {
    async fn create_package(&self, new: NewDefaultPackage) -> AppResult<DefaultPackage>;

    async fn find_package(&self, id: Uuid) -> AppResult<Option<DefaultPackage>>;

    async fn list_packages(&self) -> AppResult<Vec<DefaultPackage>>;

    async fn update_package(&self, id: Uuid, changes: DefaultPackageChanges) -> AppResult<Option<DefaultPackage>>;

    async fn delete_package(&self, id: Uuid) -> AppResult<Option<DefaultPackage>>;
}

/// Every collection the back office persists
pub trait FleetStore:
    DriverRepository + VehicleRepository + AssignmentRepository + BookingRepository + DefaultPackageRepository
{
    fn backend_name(&self) -> &'static str;
}

//! Domain models
//!
//! Row structs map one-to-one to the PostgreSQL schema in `migrations/` and
//! serialize with the camelCase field names the admin frontend expects.

pub mod assignment;
pub mod booking;
pub mod default_package;
pub mod driver;
pub mod vehicle;

pub use assignment::{Assignment, AssignmentFilter, AvailabilityPolicy, NewAssignment, PopulatedAssignment};
pub use booking::{Booking, BookingChanges, BookingStatus, NewBooking};
pub use default_package::{DefaultPackage, DefaultPackageChanges, NewDefaultPackage};
pub use driver::{Driver, DriverChanges, DriverFilter, Gender, NewDriver};
pub use vehicle::{FuelType, NewVehicle, Vehicle, VehicleChanges, VehicleFilter, VehicleType};

//! Controllers
//!
//! One per resource. Routes parse the request, controllers validate it, call
//! the store or a service and wrap the result in the response envelope.

pub mod assignment_controller;
pub mod booking_controller;
pub mod default_package_controller;
pub mod driver_controller;
pub mod vehicle_controller;

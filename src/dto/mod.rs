//! Request payloads and the response envelope

pub mod api_response;
pub mod assignment_dto;
pub mod booking_dto;
pub mod default_package_dto;
pub mod driver_dto;
pub mod vehicle_dto;

pub use api_response::ApiResponse;

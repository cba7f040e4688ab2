//! Fleet rental back office
//!
//! Drivers, vehicles, bookings and tour package requests, plus the
//! driver/vehicle assignment lifecycle that drives availability.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_app_router;
pub use state::AppState;

//! HTTP routes
//!
//! `create_app_router` assembles every resource router under the paths the
//! admin frontend calls, plus health, static uploads and the shared layers.

pub mod assignment_routes;
pub mod booking_routes;
pub mod default_package_routes;
pub mod driver_routes;
pub mod vehicle_routes;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::Uri,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

use crate::middleware::cors_layer;
use crate::services::upload_service::PUBLIC_PREFIX;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Headroom for the text fields sent alongside the files of one form
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn create_app_router(state: AppState) -> Router {
    // A registration form carries up to two files
    let body_limit = state
        .config
        .max_upload_bytes
        .saturating_mul(2)
        .saturating_add(FORM_OVERHEAD_BYTES);

    Router::new()
        .route("/health", get(health))
        .nest("/api/assignments", assignment_routes::create_assignment_router())
        .nest("/assignment", assignment_routes::create_assignment_router())
        .nest("/driver", driver_routes::create_driver_router())
        .nest("/vehicle", vehicle_routes::create_vehicle_router())
        .nest("/booking", booking_routes::create_booking_router())
        .nest("/defaultPackage", default_package_routes::create_default_package_router())
        .nest_service(PUBLIC_PREFIX, ServeDir::new(state.uploads.root()))
        .fallback(route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_origins))
                .layer(CompressionLayer::new())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "store": state.store.backend_name(),
        "availabilityPolicy": state.assignments.policy().as_str(),
    }))
}

async fn route_not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Route {} not found", uri.path()))
}

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::controllers::booking_controller::BookingController;
use crate::dto::booking_dto::{CreateBookingRequest, UpdateBookingRequest};
use crate::dto::ApiResponse;
use crate::models::Booking;
use crate::state::AppState;
use crate::utils::errors::AppResult;
use crate::utils::validation::parse_id;

pub fn create_booking_router() -> Router<AppState> {
    Router::new()
        .route("/all", get(list_bookings))
        .route("/create", post(create_booking))
        .route("/booking/:id", get(get_booking))
        .route("/edit/:id", put(update_booking))
        .route("/delete/:id", delete(delete_booking))
}

async fn list_bookings(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<Booking>>>> {
    let response = BookingController::new(&state).list().await?;
    Ok(Json(response))
}

async fn create_booking(
    State(state): State<AppState>,
    request: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<Booking>>)> {
    let Json(request) = request?;
    let response = BookingController::new(&state).create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    let id = parse_id("id", &id)?;
    let response = BookingController::new(&state).get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Result<Json<UpdateBookingRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    let id = parse_id("id", &id)?;
    let Json(request) = request?;
    let response = BookingController::new(&state).update(id, request).await?;
    Ok(Json(response))
}

async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    let id = parse_id("id", &id)?;
    let response = BookingController::new(&state).delete(id).await?;
    Ok(Json(response))
}

use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, State},
    extract::multipart::MultipartRejection,
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::UpdateVehicleRequest;
use crate::dto::ApiResponse;
use crate::models::{Vehicle, VehicleFilter};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::parse_id;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_vehicle))
        .route("/all", get(list_vehicles))
        .route("/available", get(list_available_vehicles))
        .route("/type/:type", get(list_vehicles_by_type))
        .route("/vehicle/:id", get(get_vehicle))
        .route("/edit/:id", put(update_vehicle))
        .route("/delete/:id", delete(delete_vehicle))
}

async fn create_vehicle(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<Vehicle>>)> {
    let multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let form = state.uploads.read_form(multipart).await?;
    let response = VehicleController::new(&state).create(form).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_vehicles(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<Vehicle>>>> {
    let response = VehicleController::new(&state).list(VehicleFilter::All).await?;
    Ok(Json(response))
}

async fn list_available_vehicles(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<Vehicle>>>> {
    let response = VehicleController::new(&state).list(VehicleFilter::Available).await?;
    Ok(Json(response))
}

async fn list_vehicles_by_type(
    State(state): State<AppState>,
    Path(vehicle_type): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<Vehicle>>>> {
    let response = VehicleController::new(&state).list_by_type(&vehicle_type).await?;
    Ok(Json(response))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Vehicle>>> {
    let id = parse_id("id", &id)?;
    let response = VehicleController::new(&state).get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Result<Json<UpdateVehicleRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Vehicle>>> {
    let id = parse_id("id", &id)?;
    let Json(request) = request?;
    let response = VehicleController::new(&state).update(id, request).await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Vehicle>>> {
    let id = parse_id("id", &id)?;
    let response = VehicleController::new(&state).delete(id).await?;
    Ok(Json(response))
}

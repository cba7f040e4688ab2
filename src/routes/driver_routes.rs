use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, State},
    extract::multipart::MultipartRejection,
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::controllers::driver_controller::DriverController;
use crate::dto::driver_dto::UpdateDriverRequest;
use crate::dto::ApiResponse;
use crate::models::{Driver, DriverFilter};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::parse_id;

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_driver))
        .route("/all", get(list_drivers))
        .route("/available", get(list_available_drivers))
        .route("/category/:category", get(list_drivers_by_category))
        .route("/language/:language", get(list_drivers_by_language))
        .route("/driver/:id", get(get_driver))
        .route("/edit/:id", put(update_driver))
        .route("/delete/:id", delete(delete_driver))
}

async fn create_driver(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<Driver>>)> {
    let multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let form = state.uploads.read_form(multipart).await?;
    let response = DriverController::new(&state).create(form).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_drivers(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<Driver>>>> {
    let response = DriverController::new(&state).list(DriverFilter::All).await?;
    Ok(Json(response))
}

async fn list_available_drivers(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<Driver>>>> {
    let response = DriverController::new(&state).list(DriverFilter::Available).await?;
    Ok(Json(response))
}

async fn list_drivers_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<Driver>>>> {
    let response = DriverController::new(&state)
        .list(DriverFilter::LicenseCategory(category))
        .await?;
    Ok(Json(response))
}

async fn list_drivers_by_language(
    State(state): State<AppState>,
    Path(language): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<Driver>>>> {
    let response = DriverController::new(&state)
        .list(DriverFilter::Language(language))
        .await?;
    Ok(Json(response))
}

async fn get_driver(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Driver>>> {
    let id = parse_id("id", &id)?;
    let response = DriverController::new(&state).get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_driver(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Result<Json<UpdateDriverRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Driver>>> {
    let id = parse_id("id", &id)?;
    let Json(request) = request?;
    let response = DriverController::new(&state).update(id, request).await?;
    Ok(Json(response))
}

async fn delete_driver(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Driver>>> {
    let id = parse_id("id", &id)?;
    let response = DriverController::new(&state).delete(id).await?;
    Ok(Json(response))
}

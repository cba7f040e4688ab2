use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::controllers::default_package_controller::DefaultPackageController;
use crate::dto::default_package_dto::{CreateDefaultPackageRequest, UpdateDefaultPackageRequest};
use crate::dto::ApiResponse;
use crate::models::DefaultPackage;
use crate::state::AppState;
use crate::utils::errors::AppResult;
use crate::utils::validation::parse_id;

pub fn create_default_package_router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_package))
        .route("/allPackages", get(list_packages))
        .route("/package/:id", get(get_package))
        .route("/editPackage/:id", put(update_package))
        .route("/deletePackage/:id", delete(delete_package))
}

async fn create_package(
    State(state): State<AppState>,
    request: Result<Json<CreateDefaultPackageRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<DefaultPackage>>)> {
    let Json(request) = request?;
    let response = DefaultPackageController::new(&state).create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_packages(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<DefaultPackage>>>> {
    let response = DefaultPackageController::new(&state).list().await?;
    Ok(Json(response))
}

async fn get_package(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<DefaultPackage>>> {
    let id = parse_id("id", &id)?;
    let response = DefaultPackageController::new(&state).get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_package(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Result<Json<UpdateDefaultPackageRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<DefaultPackage>>> {
    let id = parse_id("id", &id)?;
    let Json(request) = request?;
    let response = DefaultPackageController::new(&state).update(id, request).await?;
    Ok(Json(response))
}

async fn delete_package(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<DefaultPackage>>> {
    let id = parse_id("id", &id)?;
    let response = DefaultPackageController::new(&state).delete(id).await?;
    Ok(Json(response))
}

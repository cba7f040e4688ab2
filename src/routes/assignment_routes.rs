use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use crate::controllers::assignment_controller::AssignmentController;
use crate::dto::assignment_dto::CreateAssignmentRequest;
use crate::dto::ApiResponse;
use crate::models::{AssignmentFilter, PopulatedAssignment};
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_assignment_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_assignments).post(create_assignment))
        .route("/active", get(list_active_assignments))
        .route("/:id/end", put(end_assignment))
        .route("/driver/:driver_id", get(list_driver_assignments))
        .route("/vehicle/:vehicle_id", get(list_vehicle_assignments))
}

async fn create_assignment(
    State(state): State<AppState>,
    request: Result<Json<CreateAssignmentRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<PopulatedAssignment>>)> {
    let Json(request) = request?;
    let response = AssignmentController::new(&state).create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_assignments(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<PopulatedAssignment>>>> {
    let response = AssignmentController::new(&state).list(AssignmentFilter::All).await?;
    Ok(Json(response))
}

async fn list_active_assignments(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<PopulatedAssignment>>>> {
    let response = AssignmentController::new(&state).list(AssignmentFilter::Active).await?;
    Ok(Json(response))
}

async fn end_assignment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<PopulatedAssignment>>> {
    let response = AssignmentController::new(&state).end(&id).await?;
    Ok(Json(response))
}

async fn list_driver_assignments(
    State(state): State<AppState>,
    Path(driver_id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<PopulatedAssignment>>>> {
    let response = AssignmentController::new(&state).list_by_driver(&driver_id).await?;
    Ok(Json(response))
}

async fn list_vehicle_assignments(
    State(state): State<AppState>,
    Path(vehicle_id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<PopulatedAssignment>>>> {
    let response = AssignmentController::new(&state).list_by_vehicle(&vehicle_id).await?;
    Ok(Json(response))
}

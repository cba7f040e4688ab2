use validator::Validate;

use crate::dto::assignment_dto::CreateAssignmentRequest;
use crate::dto::ApiResponse;
use crate::models::{AssignmentFilter, PopulatedAssignment};
use crate::services::AssignmentService;
use crate::state::AppState;
use crate::utils::errors::AppResult;
use crate::utils::validation::parse_id;

pub struct AssignmentController {
    service: AssignmentService,
}

impl AssignmentController {
    pub fn new(state: &AppState) -> Self {
        Self {
            service: state.assignments.clone(),
        }
    }

    pub async fn create(&self, request: CreateAssignmentRequest) -> AppResult<ApiResponse<PopulatedAssignment>> {
        request.validate()?;
        let driver_id = parse_id("driver", &request.driver)?;
        let vehicle_id = parse_id("vehicle", &request.vehicle)?;

        let assignment = self
            .service
            .create(driver_id, vehicle_id, request.start_date, request.notes)
            .await?;

        Ok(ApiResponse::success_with_message(assignment, "Assignment created successfully"))
    }

    pub async fn end(&self, raw_id: &str) -> AppResult<ApiResponse<PopulatedAssignment>> {
        let id = parse_id("id", raw_id)?;
        let assignment = self.service.end(id).await?;
        Ok(ApiResponse::success_with_message(assignment, "Assignment ended successfully"))
    }

    pub async fn list(&self, filter: AssignmentFilter) -> AppResult<ApiResponse<Vec<PopulatedAssignment>>> {
        let assignments = self.service.list(filter).await?;
        let message = format!("{} assignment(s) found", assignments.len());
        Ok(ApiResponse::success_with_message(assignments, message))
    }

    pub async fn list_by_driver(&self, raw_id: &str) -> AppResult<ApiResponse<Vec<PopulatedAssignment>>> {
        let driver_id = parse_id("driverId", raw_id)?;
        self.list(AssignmentFilter::Driver(driver_id)).await
    }

    pub async fn list_by_vehicle(&self, raw_id: &str) -> AppResult<ApiResponse<Vec<PopulatedAssignment>>> {
        let vehicle_id = parse_id("vehicleId", raw_id)?;
        self.list(AssignmentFilter::Vehicle(vehicle_id)).await
    }
}

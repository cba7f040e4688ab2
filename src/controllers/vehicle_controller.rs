use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest};
use crate::dto::ApiResponse;
use crate::models::{Vehicle, VehicleFilter};
use crate::repositories::FleetStore;
use crate::services::{MultipartForm, UploadStore};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, validation_error, AppResult};

const UPLOAD_CATEGORY: &str = "vehicles";

pub struct VehicleController {
    store: Arc<dyn FleetStore>,
    uploads: UploadStore,
}

impl VehicleController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            uploads: state.uploads.clone(),
        }
    }

    pub async fn create(&self, mut form: MultipartForm) -> AppResult<ApiResponse<Vehicle>> {
        let request: CreateVehicleRequest = form.payload()?;
        request.validate()?;

        let image_path = match form.take_file("vehicleImage") {
            Some(image) => Some(self.uploads.save(UPLOAD_CATEGORY, &image).await?),
            None => None,
        };

        let vehicle = match self.store.create_vehicle(request.into_new(image_path.clone())).await {
            Ok(vehicle) => vehicle,
            Err(e) => {
                if let Some(path) = &image_path {
                    self.uploads.remove(path).await;
                }
                return Err(e);
            }
        };

        info!("🚐 Vehicle {} registered ({})", vehicle.id, vehicle.vehicle_number);
        Ok(ApiResponse::success_with_message(vehicle, "Vehicle registered successfully"))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<ApiResponse<Vehicle>> {
        let vehicle = self
            .store
            .find_vehicle(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        Ok(ApiResponse::success_with_message(vehicle, "Vehicle fetched successfully"))
    }

    pub async fn list(&self, filter: VehicleFilter) -> AppResult<ApiResponse<Vec<Vehicle>>> {
        let vehicles = self.store.list_vehicles(filter).await?;
        let message = format!("{} vehicle(s) found", vehicles.len());
        Ok(ApiResponse::success_with_message(vehicles, message))
    }

    /// `type` is a case-insensitive substring of the wire name, so `van`
    /// also matches `mini-van`.
    pub async fn list_by_type(&self, raw_type: &str) -> AppResult<ApiResponse<Vec<Vehicle>>> {
        let needle = raw_type.trim();
        if needle.is_empty() {
            return Err(validation_error("type", "filter value must not be empty"));
        }

        self.list(VehicleFilter::Type(needle.to_string())).await
    }

    pub async fn update(&self, id: Uuid, request: UpdateVehicleRequest) -> AppResult<ApiResponse<Vehicle>> {
        request.validate()?;

        let vehicle = self
            .store
            .update_vehicle(id, request.into())
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        info!("✏️ Vehicle {} updated", vehicle.id);
        Ok(ApiResponse::success_with_message(vehicle, "Vehicle updated successfully"))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<Vehicle>> {
        let vehicle = self
            .store
            .delete_vehicle(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        if let Some(image) = &vehicle.vehicle_image {
            self.uploads.remove(image).await;
        }

        info!("🗑️ Vehicle {} deleted", vehicle.id);
        Ok(ApiResponse::success_with_message(vehicle, "Vehicle deleted successfully"))
    }
}

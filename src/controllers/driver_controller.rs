use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::driver_dto::{CreateDriverRequest, UpdateDriverRequest};
use crate::dto::ApiResponse;
use crate::models::{Driver, DriverFilter};
use crate::repositories::FleetStore;
use crate::services::{MultipartForm, UploadStore};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, validation_error, AppResult};

const UPLOAD_CATEGORY: &str = "drivers";

pub struct DriverController {
    store: Arc<dyn FleetStore>,
    uploads: UploadStore,
}

impl DriverController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            uploads: state.uploads.clone(),
        }
    }

    /// Register a driver from the multipart form. Stored files are removed
    /// again if the record cannot be created.
    pub async fn create(&self, mut form: MultipartForm) -> AppResult<ApiResponse<Driver>> {
        let request: CreateDriverRequest = form.payload()?;
        request.validate()?;

        let picture = form.require_file("driverPicture")?;
        let license = form.require_file("licenseCopy")?;

        let picture_path = self.uploads.save(UPLOAD_CATEGORY, &picture).await?;
        let license_path = match self.uploads.save(UPLOAD_CATEGORY, &license).await {
            Ok(path) => path,
            Err(e) => {
                self.uploads.remove(&picture_path).await;
                return Err(e);
            }
        };

        let new = request.into_new(picture_path.clone(), license_path.clone());
        let driver = match self.store.create_driver(new).await {
            Ok(driver) => driver,
            Err(e) => {
                self.uploads.remove_all([picture_path.as_str(), license_path.as_str()]).await;
                return Err(e);
            }
        };

        info!("👤 Driver {} registered ({})", driver.id, driver.email);
        Ok(ApiResponse::success_with_message(driver, "Driver registered successfully"))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<ApiResponse<Driver>> {
        let driver = self
            .store
            .find_driver(id)
            .await?
            .ok_or_else(|| not_found_error("Driver", &id.to_string()))?;

        Ok(ApiResponse::success_with_message(driver, "Driver fetched successfully"))
    }

    pub async fn list(&self, filter: DriverFilter) -> AppResult<ApiResponse<Vec<Driver>>> {
        if let DriverFilter::LicenseCategory(value) | DriverFilter::Language(value) = &filter {
            if value.trim().is_empty() {
                return Err(validation_error("filter", "filter value must not be empty"));
            }
        }

        let drivers = self.store.list_drivers(filter).await?;
        let message = format!("{} driver(s) found", drivers.len());
        Ok(ApiResponse::success_with_message(drivers, message))
    }

    pub async fn update(&self, id: Uuid, request: UpdateDriverRequest) -> AppResult<ApiResponse<Driver>> {
        request.validate()?;

        let driver = self
            .store
            .update_driver(id, request.into())
            .await?
            .ok_or_else(|| not_found_error("Driver", &id.to_string()))?;

        info!("✏️ Driver {} updated", driver.id);
        Ok(ApiResponse::success_with_message(driver, "Driver updated successfully"))
    }

    /// Delete the record, then its picture and license copy.
    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<Driver>> {
        let driver = self
            .store
            .delete_driver(id)
            .await?
            .ok_or_else(|| not_found_error("Driver", &id.to_string()))?;

        self.uploads.remove_all(driver.file_paths()).await;

        info!("🗑️ Driver {} deleted", driver.id);
        Ok(ApiResponse::success_with_message(driver, "Driver deleted successfully"))
    }
}

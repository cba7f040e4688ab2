use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::default_package_dto::{CreateDefaultPackageRequest, UpdateDefaultPackageRequest};
use crate::dto::ApiResponse;
use crate::models::DefaultPackage;
use crate::repositories::FleetStore;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};

pub struct DefaultPackageController {
    store: Arc<dyn FleetStore>,
}

impl DefaultPackageController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    pub async fn create(&self, request: CreateDefaultPackageRequest) -> AppResult<ApiResponse<DefaultPackage>> {
        request.validate()?;

        let package = self.store.create_package(request.into()).await?;

        info!("🧳 Package request {} received from {}", package.id, package.email);
        Ok(ApiResponse::success_with_message(package, "Package request submitted successfully"))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<ApiResponse<DefaultPackage>> {
        let package = self
            .store
            .find_package(id)
            .await?
            .ok_or_else(|| not_found_error("Package", &id.to_string()))?;

        Ok(ApiResponse::success_with_message(package, "Package fetched successfully"))
    }

    pub async fn list(&self) -> AppResult<ApiResponse<Vec<DefaultPackage>>> {
        let packages = self.store.list_packages().await?;
        let message = format!("{} package request(s) found", packages.len());
        Ok(ApiResponse::success_with_message(packages, message))
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateDefaultPackageRequest,
    ) -> AppResult<ApiResponse<DefaultPackage>> {
        request.validate()?;

        let package = self
            .store
            .update_package(id, request.into())
            .await?
            .ok_or_else(|| not_found_error("Package", &id.to_string()))?;

        info!("✏️ Package request {} updated", package.id);
        Ok(ApiResponse::success_with_message(package, "Package updated successfully"))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<DefaultPackage>> {
        let package = self
            .store
            .delete_package(id)
            .await?
            .ok_or_else(|| not_found_error("Package", &id.to_string()))?;

        info!("🗑️ Package request {} deleted", package.id);
        Ok(ApiResponse::success_with_message(package, "Package deleted successfully"))
    }
}

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::dto::booking_dto::{CreateBookingRequest, UpdateBookingRequest};
use crate::dto::ApiResponse;
use crate::models::Booking;
use crate::repositories::FleetStore;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};

pub struct BookingController {
    store: Arc<dyn FleetStore>,
}

impl BookingController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    /// Referenced drivers and vehicles must exist; nothing else is checked.
    async fn ensure_references(&self, driver_id: Option<Uuid>, vehicle_id: Option<Uuid>) -> AppResult<()> {
        if let Some(id) = driver_id {
            if self.store.find_driver(id).await?.is_none() {
                return Err(not_found_error("Driver", &id.to_string()));
            }
        }
        if let Some(id) = vehicle_id {
            if self.store.find_vehicle(id).await?.is_none() {
                return Err(not_found_error("Vehicle", &id.to_string()));
            }
        }
        Ok(())
    }

    pub async fn create(&self, request: CreateBookingRequest) -> AppResult<ApiResponse<Booking>> {
        let new = request.into_new()?;
        self.ensure_references(new.driver_id, new.vehicle_id).await?;

        let booking = self.store.create_booking(new).await?;

        info!("📅 Booking {} created for {}", booking.id, booking.date.format("%Y-%m-%d"));
        Ok(ApiResponse::success_with_message(booking, "Booking added successfully"))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<ApiResponse<Booking>> {
        let booking = self
            .store
            .find_booking(id)
            .await?
            .ok_or_else(|| not_found_error("Booking", &id.to_string()))?;

        Ok(ApiResponse::success_with_message(booking, "Booking fetched successfully"))
    }

    pub async fn list(&self) -> AppResult<ApiResponse<Vec<Booking>>> {
        let bookings = self.store.list_bookings().await?;
        let message = format!("{} booking(s) found", bookings.len());
        Ok(ApiResponse::success_with_message(bookings, message))
    }

    pub async fn update(&self, id: Uuid, request: UpdateBookingRequest) -> AppResult<ApiResponse<Booking>> {
        let changes = request.into_changes()?;
        self.ensure_references(changes.driver_id, changes.vehicle_id).await?;

        let booking = self
            .store
            .update_booking(id, changes)
            .await?
            .ok_or_else(|| not_found_error("Booking", &id.to_string()))?;

        info!("✏️ Booking {} updated ({:?})", booking.id, booking.status);
        Ok(ApiResponse::success_with_message(booking, "Booking updated successfully"))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<Booking>> {
        let booking = self
            .store
            .delete_booking(id)
            .await?
            .ok_or_else(|| not_found_error("Booking", &id.to_string()))?;

        info!("🗑️ Booking {} deleted", booking.id);
        Ok(ApiResponse::success_with_message(booking, "Booking deleted successfully"))
    }
}

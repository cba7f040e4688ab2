use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{BookingChanges, BookingStatus, NewBooking};
use crate::utils::errors::AppResult;
use crate::utils::serde_helpers;
use crate::utils::validation::parse_id;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub user_id: Option<String>,
    pub package_id: Option<String>,
    #[serde(deserialize_with = "serde_helpers::datetime")]
    pub date: DateTime<Utc>,
    pub vehicle_id: Option<String>,
    pub driver_id: Option<String>,
    pub status: Option<BookingStatus>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    pub user_id: Option<String>,
    pub package_id: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::optional_datetime")]
    pub date: Option<DateTime<Utc>>,
    pub vehicle_id: Option<String>,
    pub driver_id: Option<String>,
    pub status: Option<BookingStatus>,
}

/// Blank strings count as absent.
fn optional_id(field: &'static str, value: Option<String>) -> AppResult<Option<Uuid>> {
    match value {
        Some(raw) if !raw.trim().is_empty() => parse_id(field, &raw).map(Some),
        _ => Ok(None),
    }
}

impl CreateBookingRequest {
    pub fn into_new(self) -> AppResult<NewBooking> {
        Ok(NewBooking {
            user_id: optional_id("userId", self.user_id)?,
            package_id: optional_id("packageId", self.package_id)?,
            date: self.date,
            vehicle_id: optional_id("vehicleId", self.vehicle_id)?,
            driver_id: optional_id("driverId", self.driver_id)?,
            status: self.status.unwrap_or_default(),
        })
    }
}

impl UpdateBookingRequest {
    pub fn into_changes(self) -> AppResult<BookingChanges> {
        Ok(BookingChanges {
            user_id: optional_id("userId", self.user_id)?,
            package_id: optional_id("packageId", self.package_id)?,
            date: self.date,
            vehicle_id: optional_id("vehicleId", self.vehicle_id)?,
            driver_id: optional_id("driverId", self.driver_id)?,
            status: self.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::AppError;
    use serde_json::json;

    #[test]
    fn status_defaults_to_pending() {
        let request: CreateBookingRequest = serde_json::from_value(json!({ "date": "2025-02-01" })).unwrap();
        let new = request.into_new().unwrap();
        assert_eq!(new.status, BookingStatus::Pending);
        assert!(new.driver_id.is_none());
    }

    #[test]
    fn blank_ids_are_absent_and_malformed_ids_are_invalid() {
        let request: CreateBookingRequest = serde_json::from_value(json!({
            "date": "2025-02-01",
            "userId": "",
            "driverId": "not-a-uuid"
        }))
        .unwrap();
        assert!(matches!(request.into_new(), Err(AppError::Validation(_))));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result = serde_json::from_value::<CreateBookingRequest>(json!({ "date": "2025-02-01", "status": "Lost" }));
        assert!(result.is_err());
    }
}

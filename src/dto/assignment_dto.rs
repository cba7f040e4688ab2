use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::utils::serde_helpers;

// Body of POST /api/assignments
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    #[serde(alias = "driverId")]
    pub driver: String,

    #[serde(alias = "vehicleId")]
    pub vehicle: String,

    #[serde(default, deserialize_with = "serde_helpers::optional_datetime")]
    pub start_date: Option<DateTime<Utc>>,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn start_date_and_notes_are_optional() {
        let request: CreateAssignmentRequest =
            serde_json::from_value(json!({ "driver": "d", "vehicle": "v" })).unwrap();
        assert!(request.start_date.is_none());
        assert!(request.notes.is_none());
    }

    #[test]
    fn accepts_id_suffixed_names() {
        let request: CreateAssignmentRequest = serde_json::from_value(json!({
            "driverId": "d",
            "vehicleId": "v",
            "startDate": "2025-01-10T08:00:00Z"
        }))
        .unwrap();
        assert_eq!(request.driver, "d");
        assert_eq!(request.start_date.unwrap().to_rfc3339(), "2025-01-10T08:00:00+00:00");
    }
}

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::models::{DefaultPackageChanges, NewDefaultPackage};
use crate::utils::serde_helpers;
use crate::utils::validation::{validate_not_empty, validate_phone};

// Tour booking request submitted from the public site
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_trip_dates", skip_on_field_errors = false))]
pub struct CreateDefaultPackageRequest {
    #[validate(length(min = 2, max = 100))]
    pub full_name: String,

    #[validate(email)]
    pub email: String,

    #[serde(deserialize_with = "serde_helpers::text")]
    #[validate(custom = "validate_phone")]
    pub contact_number: String,

    #[validate(custom = "validate_not_empty")]
    pub package_name: String,

    #[serde(deserialize_with = "serde_helpers::text")]
    #[validate(custom = "validate_not_empty")]
    pub number_of_travelers: String,

    #[serde(deserialize_with = "serde_helpers::datetime")]
    pub departure_date: DateTime<Utc>,

    #[serde(deserialize_with = "serde_helpers::datetime")]
    pub return_date: DateTime<Utc>,

    #[validate(custom = "validate_not_empty")]
    pub preferred_time: String,

    #[validate(custom = "validate_not_empty")]
    pub vehicle: String,

    #[validate(custom = "validate_not_empty")]
    pub vehicle_type: String,

    #[validate(custom = "validate_not_empty")]
    pub pickup_location: String,

    pub drop_off_location: Option<String>,

    pub luggage_details: Option<String>,

    #[serde(default, deserialize_with = "serde_helpers::optional_text")]
    pub child_seat: Option<String>,

    #[validate(custom = "validate_not_empty")]
    pub driver_language: String,

    #[validate(length(max = 2000))]
    pub special_request: Option<String>,
}

fn validate_trip_dates(request: &CreateDefaultPackageRequest) -> Result<(), ValidationError> {
    if request.return_date < request.departure_date {
        let mut error = ValidationError::new("return_before_departure");
        error.message = Some("returnDate must not be before departureDate".into());
        return Err(error);
    }
    Ok(())
}

/// Trimmed, with blanks dropped
fn optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl From<CreateDefaultPackageRequest> for NewDefaultPackage {
    fn from(request: CreateDefaultPackageRequest) -> Self {
        NewDefaultPackage {
            full_name: request.full_name.trim().to_string(),
            email: request.email.trim().to_lowercase(),
            contact_number: request.contact_number.trim().to_string(),
            package_name: request.package_name.trim().to_string(),
            number_of_travelers: request.number_of_travelers.trim().to_string(),
            departure_date: request.departure_date,
            return_date: request.return_date,
            preferred_time: request.preferred_time.trim().to_string(),
            vehicle: request.vehicle.trim().to_string(),
            vehicle_type: request.vehicle_type.trim().to_string(),
            pickup_location: request.pickup_location.trim().to_string(),
            drop_off_location: optional(request.drop_off_location),
            luggage_details: optional(request.luggage_details),
            child_seat: optional(request.child_seat),
            driver_language: request.driver_language.trim().to_string(),
            special_request: optional(request.special_request),
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDefaultPackageRequest {
    #[validate(length(min = 2, max = 100))]
    pub full_name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "serde_helpers::optional_text")]
    #[validate(custom = "validate_phone")]
    pub contact_number: Option<String>,

    #[validate(custom = "validate_not_empty")]
    pub package_name: Option<String>,

    #[serde(default, deserialize_with = "serde_helpers::optional_text")]
    #[validate(custom = "validate_not_empty")]
    pub number_of_travelers: Option<String>,

    #[serde(default, deserialize_with = "serde_helpers::optional_datetime")]
    pub departure_date: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "serde_helpers::optional_datetime")]
    pub return_date: Option<DateTime<Utc>>,

    #[validate(custom = "validate_not_empty")]
    pub preferred_time: Option<String>,

    #[validate(custom = "validate_not_empty")]
    pub vehicle: Option<String>,

    #[validate(custom = "validate_not_empty")]
    pub vehicle_type: Option<String>,

    #[validate(custom = "validate_not_empty")]
    pub pickup_location: Option<String>,

    pub drop_off_location: Option<String>,

    pub luggage_details: Option<String>,

    #[serde(default, deserialize_with = "serde_helpers::optional_text")]
    pub child_seat: Option<String>,

    #[validate(custom = "validate_not_empty")]
    pub driver_language: Option<String>,

    #[validate(length(max = 2000))]
    pub special_request: Option<String>,
}

impl From<UpdateDefaultPackageRequest> for DefaultPackageChanges {
    fn from(request: UpdateDefaultPackageRequest) -> Self {
        let trim = |value: Option<String>| value.map(|v| v.trim().to_string());
        DefaultPackageChanges {
            full_name: trim(request.full_name),
            email: request.email.map(|e| e.trim().to_lowercase()),
            contact_number: trim(request.contact_number),
            package_name: trim(request.package_name),
            number_of_travelers: trim(request.number_of_travelers),
            departure_date: request.departure_date,
            return_date: request.return_date,
            preferred_time: trim(request.preferred_time),
            vehicle: trim(request.vehicle),
            vehicle_type: trim(request.vehicle_type),
            pickup_location: trim(request.pickup_location),
            drop_off_location: trim(request.drop_off_location),
            luggage_details: trim(request.luggage_details),
            child_seat: trim(request.child_seat),
            driver_language: trim(request.driver_language),
            special_request: trim(request.special_request),
        }
    }
}

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::models::{FuelType, NewVehicle, VehicleChanges, VehicleType};
use crate::utils::serde_helpers;
use crate::utils::validation::{validate_not_empty, validate_phone, validate_plate_number};

// Text fields of the vehicle registration form
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    #[validate(custom = "validate_plate_number")]
    pub vehicle_number: String,

    pub vehicle_type: VehicleType,

    #[validate(custom = "validate_not_empty")]
    pub vehicle_model: String,

    #[validate(length(min = 2, max = 100))]
    pub owner_name: String,

    #[serde(deserialize_with = "serde_helpers::text")]
    #[validate(custom = "validate_phone")]
    pub owner_contact_number: String,

    #[serde(deserialize_with = "serde_helpers::int")]
    #[validate(range(min = 1950, max = 2100))]
    pub year_of_manufacture: i32,

    pub fuel_type: FuelType,

    #[serde(deserialize_with = "serde_helpers::datetime")]
    pub license_expiry_date: DateTime<Utc>,

    #[validate(custom = "validate_not_empty")]
    pub color: String,

    #[serde(deserialize_with = "serde_helpers::int")]
    #[validate(range(min = 1, max = 100))]
    pub seating_capacity: i32,

    #[serde(default, deserialize_with = "serde_helpers::string_list")]
    pub vehicle_features: Vec<String>,
}

impl CreateVehicleRequest {
    pub fn into_new(self, vehicle_image: Option<String>) -> NewVehicle {
        NewVehicle {
            vehicle_number: self.vehicle_number.trim().to_uppercase(),
            vehicle_type: self.vehicle_type,
            vehicle_model: self.vehicle_model.trim().to_string(),
            owner_name: self.owner_name.trim().to_string(),
            owner_contact_number: self.owner_contact_number.trim().to_string(),
            year_of_manufacture: self.year_of_manufacture,
            fuel_type: self.fuel_type,
            license_expiry_date: self.license_expiry_date,
            color: self.color.trim().to_string(),
            seating_capacity: self.seating_capacity,
            vehicle_features: self.vehicle_features,
            vehicle_image,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleRequest {
    #[validate(custom = "validate_plate_number")]
    pub vehicle_number: Option<String>,

    pub vehicle_type: Option<VehicleType>,

    #[validate(custom = "validate_not_empty")]
    pub vehicle_model: Option<String>,

    #[validate(length(min = 2, max = 100))]
    pub owner_name: Option<String>,

    #[serde(default, deserialize_with = "serde_helpers::optional_text")]
    #[validate(custom = "validate_phone")]
    pub owner_contact_number: Option<String>,

    #[serde(default, deserialize_with = "serde_helpers::optional_int")]
    #[validate(range(min = 1950, max = 2100))]
    pub year_of_manufacture: Option<i32>,

    pub fuel_type: Option<FuelType>,

    #[serde(default, deserialize_with = "serde_helpers::optional_datetime")]
    pub license_expiry_date: Option<DateTime<Utc>>,

    #[validate(custom = "validate_not_empty")]
    pub color: Option<String>,

    #[serde(default, deserialize_with = "serde_helpers::optional_int")]
    #[validate(range(min = 1, max = 100))]
    pub seating_capacity: Option<i32>,

    #[serde(default, deserialize_with = "serde_helpers::optional_string_list")]
    pub vehicle_features: Option<Vec<String>>,
}

impl From<UpdateVehicleRequest> for VehicleChanges {
    fn from(request: UpdateVehicleRequest) -> Self {
        let trim = |value: Option<String>| value.map(|v| v.trim().to_string());
        VehicleChanges {
            vehicle_number: request.vehicle_number.map(|n| n.trim().to_uppercase()),
            vehicle_type: request.vehicle_type,
            vehicle_model: trim(request.vehicle_model),
            owner_name: trim(request.owner_name),
            owner_contact_number: trim(request.owner_contact_number),
            year_of_manufacture: request.year_of_manufacture,
            fuel_type: request.fuel_type,
            license_expiry_date: request.license_expiry_date,
            color: trim(request.color),
            seating_capacity: request.seating_capacity,
            vehicle_features: request.vehicle_features,
        }
    }
}

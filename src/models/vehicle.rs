//! Vehicle model
//!
//! Vehicles are identified by their plate number. Availability is owned by
//! the assignment lifecycle, like drivers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use uuid::Uuid;

use crate::utils::validation::contains_ignore_case;

/// Vehicle class - maps to the `vehicle_type` ENUM
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_type", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum VehicleType {
    Car,
    MiniVan,
    Van,
    MiniBus,
    KingLongBus,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Car => "car",
            VehicleType::MiniVan => "mini-van",
            VehicleType::Van => "van",
            VehicleType::MiniBus => "mini-bus",
            VehicleType::KingLongBus => "king-long-bus",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fuel type - maps to the `fuel_type` ENUM
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "fuel_type")]
pub enum FuelType {
    Diesel,
    Petrol,
    Electric,
    Hybrid,
}

/// Vehicle - maps to the `vehicles` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub vehicle_number: String,
    pub vehicle_type: VehicleType,
    pub vehicle_model: String,
    pub owner_name: String,
    pub owner_contact_number: String,
    pub year_of_manufacture: i32,
    pub fuel_type: FuelType,
    pub license_expiry_date: DateTime<Utc>,
    pub color: String,
    pub seating_capacity: i32,
    pub vehicle_features: Vec<String>,
    pub vehicle_image: Option<String>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn from_new(new: NewVehicle, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            vehicle_number: new.vehicle_number,
            vehicle_type: new.vehicle_type,
            vehicle_model: new.vehicle_model,
            owner_name: new.owner_name,
            owner_contact_number: new.owner_contact_number,
            year_of_manufacture: new.year_of_manufacture,
            fuel_type: new.fuel_type,
            license_expiry_date: new.license_expiry_date,
            color: new.color,
            seating_capacity: new.seating_capacity,
            vehicle_features: new.vehicle_features,
            vehicle_image: new.vehicle_image,
            is_available: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn matches(&self, filter: &VehicleFilter) -> bool {
        match filter {
            VehicleFilter::All => true,
            VehicleFilter::Available => self.is_available,
            VehicleFilter::Type(needle) => contains_ignore_case(self.vehicle_type.as_str(), needle),
        }
    }
}

/// Validated payload for inserting a vehicle
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub vehicle_number: String,
    pub vehicle_type: VehicleType,
    pub vehicle_model: String,
    pub owner_name: String,
    pub owner_contact_number: String,
    pub year_of_manufacture: i32,
    pub fuel_type: FuelType,
    pub license_expiry_date: DateTime<Utc>,
    pub color: String,
    pub seating_capacity: i32,
    pub vehicle_features: Vec<String>,
    pub vehicle_image: Option<String>,
}

/// Partial update; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct VehicleChanges {
    pub vehicle_number: Option<String>,
    pub vehicle_type: Option<VehicleType>,
    pub vehicle_model: Option<String>,
    pub owner_name: Option<String>,
    pub owner_contact_number: Option<String>,
    pub year_of_manufacture: Option<i32>,
    pub fuel_type: Option<FuelType>,
    pub license_expiry_date: Option<DateTime<Utc>>,
    pub color: Option<String>,
    pub seating_capacity: Option<i32>,
    pub vehicle_features: Option<Vec<String>>,
}

impl VehicleChanges {
    pub fn apply(self, vehicle: &mut Vehicle, now: DateTime<Utc>) {
        if let Some(v) = self.vehicle_number { vehicle.vehicle_number = v; }
        if let Some(v) = self.vehicle_type { vehicle.vehicle_type = v; }
        if let Some(v) = self.vehicle_model { vehicle.vehicle_model = v; }
        if let Some(v) = self.owner_name { vehicle.owner_name = v; }
        if let Some(v) = self.owner_contact_number { vehicle.owner_contact_number = v; }
        if let Some(v) = self.year_of_manufacture { vehicle.year_of_manufacture = v; }
        if let Some(v) = self.fuel_type { vehicle.fuel_type = v; }
        if let Some(v) = self.license_expiry_date { vehicle.license_expiry_date = v; }
        if let Some(v) = self.color { vehicle.color = v; }
        if let Some(v) = self.seating_capacity { vehicle.seating_capacity = v; }
        if let Some(v) = self.vehicle_features { vehicle.vehicle_features = v; }
        vehicle.updated_at = now;
    }
}

/// Registry queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VehicleFilter {
    All,
    Available,
    /// Case-insensitive substring of the type's wire name
    Type(String),
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vehicle_type_wire_names() {
        assert_eq!(serde_json::to_value(VehicleType::KingLongBus).unwrap(), "king-long-bus");
        assert_eq!(VehicleType::MiniBus.to_string(), "mini-bus");
        assert!(serde_json::from_value::<VehicleType>(serde_json::json!("truck")).is_err());
    }

    #[test]
    fn type_filter_matches_part_of_wire_name() {
        let vehicle = Vehicle::from_new(fixtures::new_vehicle("CAB-1234"), Uuid::new_v4(), Utc::now());
        assert!(vehicle.matches(&VehicleFilter::Type("mini-van".to_string())));
        assert!(vehicle.matches(&VehicleFilter::Type("VAN".to_string())));
        assert!(vehicle.matches(&VehicleFilter::Type("Mini".to_string())));
        assert!(!vehicle.matches(&VehicleFilter::Type("bus".to_string())));
    }

    #[test]
    fn changes_keep_availability() {
        let mut vehicle = Vehicle::from_new(fixtures::new_vehicle("CAB-1234"), Uuid::new_v4(), Utc::now());
        VehicleChanges {
            color: Some("Silver".to_string()),
            ..Default::default()
        }
        .apply(&mut vehicle, Utc::now());
        assert_eq!(vehicle.color, "Silver");
        assert!(vehicle.is_available);
    }
}

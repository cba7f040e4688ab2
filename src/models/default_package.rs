//! Default package model
//!
//! A tour booking request submitted from the guest pages: who is travelling,
//! when, with which vehicle class and which driver language.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::errors::{validation_error, AppResult};

/// Default package - maps to the `default_packages` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DefaultPackage {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub contact_number: String,
    pub package_name: String,
    pub number_of_travelers: String,
    pub departure_date: DateTime<Utc>,
    pub return_date: DateTime<Utc>,
    pub preferred_time: String,
    pub vehicle: String,
    pub vehicle_type: String,
    pub pickup_location: String,
    pub drop_off_location: Option<String>,
    pub luggage_details: Option<String>,
    pub child_seat: Option<String>,
    pub driver_language: String,
    pub special_request: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DefaultPackage {
    pub fn from_new(new: NewDefaultPackage, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            full_name: new.full_name,
            email: new.email,
            contact_number: new.contact_number,
            package_name: new.package_name,
            number_of_travelers: new.number_of_travelers,
            departure_date: new.departure_date,
            return_date: new.return_date,
            preferred_time: new.preferred_time,
            vehicle: new.vehicle,
            vehicle_type: new.vehicle_type,
            pickup_location: new.pickup_location,
            drop_off_location: new.drop_off_location,
            luggage_details: new.luggage_details,
            child_seat: new.child_seat,
            driver_language: new.driver_language,
            special_request: new.special_request,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewDefaultPackage {
    pub full_name: String,
    pub email: String,
    pub contact_number: String,
    pub package_name: String,
    pub number_of_travelers: String,
    pub departure_date: DateTime<Utc>,
    pub return_date: DateTime<Utc>,
    pub preferred_time: String,
    pub vehicle: String,
    pub vehicle_type: String,
    pub pickup_location: String,
    pub drop_off_location: Option<String>,
    pub luggage_details: Option<String>,
    pub child_seat: Option<String>,
    pub driver_language: String,
    pub special_request: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DefaultPackageChanges {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub contact_number: Option<String>,
    pub package_name: Option<String>,
    pub number_of_travelers: Option<String>,
    pub departure_date: Option<DateTime<Utc>>,
    pub return_date: Option<DateTime<Utc>>,
    pub preferred_time: Option<String>,
    pub vehicle: Option<String>,
    pub vehicle_type: Option<String>,
    pub pickup_location: Option<String>,
    pub drop_off_location: Option<String>,
    pub luggage_details: Option<String>,
    pub child_seat: Option<String>,
    pub driver_language: Option<String>,
    pub special_request: Option<String>,
}

impl DefaultPackageChanges {
    /// Merge into `package`. Fails without touching it when the merged
    /// return date would fall before the merged departure date.
    pub fn apply(self, package: &mut DefaultPackage, now: DateTime<Utc>) -> AppResult<()> {
        let departure = self.departure_date.unwrap_or(package.departure_date);
        let return_date = self.return_date.unwrap_or(package.return_date);
        if return_date < departure {
            return Err(validation_error("returnDate", "returnDate must not be before departureDate"));
        }

        if let Some(v) = self.full_name { package.full_name = v; }
        if let Some(v) = self.email { package.email = v; }
        if let Some(v) = self.contact_number { package.contact_number = v; }
        if let Some(v) = self.package_name { package.package_name = v; }
        if let Some(v) = self.number_of_travelers { package.number_of_travelers = v; }
        if let Some(v) = self.departure_date { package.departure_date = v; }
        if let Some(v) = self.return_date { package.return_date = v; }
        if let Some(v) = self.preferred_time { package.preferred_time = v; }
        if let Some(v) = self.vehicle { package.vehicle = v; }
        if let Some(v) = self.vehicle_type { package.vehicle_type = v; }
        if let Some(v) = self.pickup_location { package.pickup_location = v; }
        if let Some(v) = self.drop_off_location { package.drop_off_location = Some(v); }
        if let Some(v) = self.luggage_details { package.luggage_details = Some(v); }
        if let Some(v) = self.child_seat { package.child_seat = Some(v); }
        if let Some(v) = self.driver_language { package.driver_language = v; }
        if let Some(v) = self.special_request { package.special_request = Some(v); }
        package.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::AppError;
    use chrono::TimeZone;

    fn package() -> DefaultPackage {
        let new = NewDefaultPackage {
            full_name: "Ayesha Fernando".to_string(),
            email: "ayesha@example.com".to_string(),
            contact_number: "0771234567".to_string(),
            package_name: "Cultural Triangle".to_string(),
            number_of_travelers: "4".to_string(),
            departure_date: Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap(),
            return_date: Utc.with_ymd_and_hms(2025, 7, 5, 0, 0, 0).unwrap(),
            preferred_time: "08:00".to_string(),
            vehicle: "Van".to_string(),
            vehicle_type: "van".to_string(),
            pickup_location: "Colombo".to_string(),
            drop_off_location: None,
            luggage_details: None,
            child_seat: None,
            driver_language: "English".to_string(),
            special_request: None,
        };
        DefaultPackage::from_new(new, Uuid::new_v4(), Utc::now())
    }

    #[test]
    fn departure_moved_past_return_is_rejected_untouched() {
        let mut current = package();
        let before = current.clone();

        let result = DefaultPackageChanges {
            departure_date: Some(Utc.with_ymd_and_hms(2025, 7, 10, 0, 0, 0).unwrap()),
            special_request: Some("Vegetarian meals".to_string()),
            ..Default::default()
        }
        .apply(&mut current, Utc::now());

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(current, before);
    }

    #[test]
    fn dates_moved_together_are_accepted() {
        let mut current = package();
        DefaultPackageChanges {
            departure_date: Some(Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap()),
            return_date: Some(Utc.with_ymd_and_hms(2025, 8, 3, 0, 0, 0).unwrap()),
            ..Default::default()
        }
        .apply(&mut current, Utc::now())
        .unwrap();

        assert_eq!(current.return_date, Utc.with_ymd_and_hms(2025, 8, 3, 0, 0, 0).unwrap());
    }
}

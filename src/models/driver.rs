//! Driver model
//!
//! Drivers are registered with a picture and a copy of their license. The
//! `is_available` flag belongs to the assignment lifecycle: registry updates
//! never touch it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::utils::validation::contains_ignore_case;

/// Driver gender - maps to the `driver_gender` ENUM
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "driver_gender")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Driver - maps to the `drivers` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub nic: String,
    pub email: String,
    pub gender: Gender,
    pub date_of_birth: DateTime<Utc>,
    pub languages: String,
    pub drivers_license_number: String,
    pub license_expiry_date: DateTime<Utc>,
    pub license_category: String,
    pub is_available: bool,
    pub driver_picture: String,
    pub license_copy: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Driver {
    pub fn from_new(new: NewDriver, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            phone: new.phone,
            nic: new.nic,
            email: new.email,
            gender: new.gender,
            date_of_birth: new.date_of_birth,
            languages: new.languages,
            drivers_license_number: new.drivers_license_number,
            license_expiry_date: new.license_expiry_date,
            license_category: new.license_category,
            is_available: true,
            driver_picture: new.driver_picture,
            license_copy: new.license_copy,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn matches(&self, filter: &DriverFilter) -> bool {
        match filter {
            DriverFilter::All => true,
            DriverFilter::Available => self.is_available,
            DriverFilter::LicenseCategory(category) => contains_ignore_case(&self.license_category, category),
            DriverFilter::Language(language) => contains_ignore_case(&self.languages, language),
        }
    }

    /// Stored files owned by this record
    pub fn file_paths(&self) -> Vec<&str> {
        vec![self.driver_picture.as_str(), self.license_copy.as_str()]
    }
}

/// Validated payload for inserting a driver
#[derive(Debug, Clone)]
pub struct NewDriver {
    pub name: String,
    pub phone: String,
    pub nic: String,
    pub email: String,
    pub gender: Gender,
    pub date_of_birth: DateTime<Utc>,
    pub languages: String,
    pub drivers_license_number: String,
    pub license_expiry_date: DateTime<Utc>,
    pub license_category: String,
    pub driver_picture: String,
    pub license_copy: String,
}

/// Partial update; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct DriverChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub nic: Option<String>,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<DateTime<Utc>>,
    pub languages: Option<String>,
    pub drivers_license_number: Option<String>,
    pub license_expiry_date: Option<DateTime<Utc>>,
    pub license_category: Option<String>,
}

impl DriverChanges {
    pub fn apply(self, driver: &mut Driver, now: DateTime<Utc>) {
        if let Some(v) = self.name { driver.name = v; }
        if let Some(v) = self.phone { driver.phone = v; }
        if let Some(v) = self.nic { driver.nic = v; }
        if let Some(v) = self.email { driver.email = v; }
        if let Some(v) = self.gender { driver.gender = v; }
        if let Some(v) = self.date_of_birth { driver.date_of_birth = v; }
        if let Some(v) = self.languages { driver.languages = v; }
        if let Some(v) = self.drivers_license_number { driver.drivers_license_number = v; }
        if let Some(v) = self.license_expiry_date { driver.license_expiry_date = v; }
        if let Some(v) = self.license_category { driver.license_category = v; }
        driver.updated_at = now;
    }
}

/// Registry queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverFilter {
    All,
    Available,
    LicenseCategory(String),
    Language(String),
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    pub fn new_driver(email: &str) -> NewDriver {
        NewDriver {
            name: "Kamal Perera".to_string(),
            phone: "0771234567".to_string(),
            nic: "199012345678".to_string(),
            email: email.to_string(),
            gender: Gender::Male,
            date_of_birth: Utc.with_ymd_and_hms(1990, 5, 17, 0, 0, 0).unwrap(),
            languages: "English, Sinhala".to_string(),
            drivers_license_number: "B1234567".to_string(),
            license_expiry_date: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
            license_category: "B1, C1".to_string(),
            driver_picture: "/uploads/drivers/picture.png".to_string(),
            license_copy: "/uploads/drivers/license.png".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::new_driver;
    use super::*;

    #[test]
    fn new_drivers_start_available() {
        let driver = Driver::from_new(new_driver("kamal@example.com"), Uuid::new_v4(), Utc::now());
        assert!(driver.is_available);
        assert_eq!(driver.created_at, driver.updated_at);
    }

    #[test]
    fn filters_match_case_insensitive_substrings() {
        let driver = Driver::from_new(new_driver("kamal@example.com"), Uuid::new_v4(), Utc::now());
        assert!(driver.matches(&DriverFilter::Language("sinhala".to_string())));
        assert!(!driver.matches(&DriverFilter::Language("Tamil".to_string())));
        assert!(driver.matches(&DriverFilter::LicenseCategory("c1".to_string())));
        assert!(driver.matches(&DriverFilter::Available));
    }

    #[test]
    fn changes_only_touch_provided_fields() {
        let mut driver = Driver::from_new(new_driver("kamal@example.com"), Uuid::new_v4(), Utc::now());
        let changes = DriverChanges {
            phone: Some("0719876543".to_string()),
            ..Default::default()
        };
        changes.apply(&mut driver, Utc::now());
        assert_eq!(driver.phone, "0719876543");
        assert_eq!(driver.name, "Kamal Perera");
        assert!(driver.is_available);
    }

    #[test]
    fn serializes_with_frontend_field_names() {
        let driver = Driver::from_new(new_driver("kamal@example.com"), Uuid::new_v4(), Utc::now());
        let json = serde_json::to_value(&driver).unwrap();
        assert!(json.get("_id").is_some());
        assert_eq!(json["isAvailable"], true);
        assert_eq!(json["driversLicenseNumber"], "B1234567");
        assert_eq!(json["gender"], "Male");
    }
}

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::models::{DriverChanges, Gender, NewDriver};
use crate::utils::serde_helpers;
use crate::utils::validation::{validate_not_empty, validate_phone};

// Text fields of the driver registration form
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDriverRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[serde(deserialize_with = "serde_helpers::text")]
    #[validate(custom = "validate_phone")]
    pub phone: String,

    #[serde(deserialize_with = "serde_helpers::text")]
    #[validate(length(min = 5, max = 20))]
    pub nic: String,

    #[validate(email)]
    pub email: String,

    pub gender: Gender,

    #[serde(deserialize_with = "serde_helpers::datetime")]
    pub date_of_birth: DateTime<Utc>,

    #[validate(custom = "validate_not_empty")]
    pub languages: String,

    #[serde(deserialize_with = "serde_helpers::text")]
    #[validate(custom = "validate_not_empty")]
    pub drivers_license_number: String,

    #[serde(deserialize_with = "serde_helpers::datetime")]
    pub license_expiry_date: DateTime<Utc>,

    #[validate(custom = "validate_not_empty")]
    pub license_category: String,
}

impl CreateDriverRequest {
    pub fn into_new(self, driver_picture: String, license_copy: String) -> NewDriver {
        NewDriver {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            nic: self.nic.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            gender: self.gender,
            date_of_birth: self.date_of_birth,
            languages: self.languages.trim().to_string(),
            drivers_license_number: self.drivers_license_number.trim().to_string(),
            license_expiry_date: self.license_expiry_date,
            license_category: self.license_category.trim().to_string(),
            driver_picture,
            license_copy,
        }
    }
}

// Partial update; availability is owned by assignments and not accepted here
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDriverRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "serde_helpers::optional_text")]
    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "serde_helpers::optional_text")]
    #[validate(length(min = 5, max = 20))]
    pub nic: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    pub gender: Option<Gender>,

    #[serde(default, deserialize_with = "serde_helpers::optional_datetime")]
    pub date_of_birth: Option<DateTime<Utc>>,

    #[validate(custom = "validate_not_empty")]
    pub languages: Option<String>,

    #[serde(default, deserialize_with = "serde_helpers::optional_text")]
    #[validate(custom = "validate_not_empty")]
    pub drivers_license_number: Option<String>,

    #[serde(default, deserialize_with = "serde_helpers::optional_datetime")]
    pub license_expiry_date: Option<DateTime<Utc>>,

    #[validate(custom = "validate_not_empty")]
    pub license_category: Option<String>,
}

impl From<UpdateDriverRequest> for DriverChanges {
    fn from(request: UpdateDriverRequest) -> Self {
        let trim = |value: Option<String>| value.map(|v| v.trim().to_string());
        DriverChanges {
            name: trim(request.name),
            phone: trim(request.phone),
            nic: trim(request.nic),
            email: request.email.map(|e| e.trim().to_lowercase()),
            gender: request.gender,
            date_of_birth: request.date_of_birth,
            languages: trim(request.languages),
            drivers_license_number: trim(request.drivers_license_number),
            license_expiry_date: request.license_expiry_date,
            license_category: trim(request.license_category),
        }
    }
}

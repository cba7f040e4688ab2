//! Validation helpers
//!
//! Field validators used by the `validator` derives on request payloads, plus
//! the parsing helpers shared by path extraction and multipart forms.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;
use validator::ValidationError;

use crate::utils::errors::{validation_error, AppResult};

/// Validate and convert a string into a UUID
pub fn validate_uuid(value: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        let mut error = ValidationError::new("uuid");
        error.add_param("value".into(), &value.to_string());
        error
    })
}

/// Parse an identifier coming from a path segment or a payload field.
/// A malformed id is a validation failure, not a missing record.
pub fn parse_id(field: &'static str, value: &str) -> AppResult<Uuid> {
    validate_uuid(value).map_err(|_| validation_error(field, &format!("'{}' is not a valid id", value)))
}

/// Validate and convert a string into a date
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Parse a timestamp the way the admin frontend sends them: RFC 3339,
/// `YYYY-MM-DDTHH:MM[:SS]` without offset (UTC), or a bare date (UTC midnight).
pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }

    let date = validate_date(value).map_err(|_| {
        let mut error = ValidationError::new("datetime");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"RFC3339 or YYYY-MM-DD".to_string());
        error
    })?;

    date.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ValidationError::new("datetime"))
}

/// Validate that a string is not blank
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_empty"));
    }
    Ok(())
}

/// Validate a phone number (10 to 15 digits once separators are removed)
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let clean_phone = value.chars().filter(|c| c.is_ascii_digit()).collect::<String>();
    if clean_phone.len() < 10 || clean_phone.len() > 15 {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validate a vehicle plate number
pub fn validate_plate_number(value: &str) -> Result<(), ValidationError> {
    let clean_plate = value.replace([' ', '-', '_'], "");
    if clean_plate.len() < 4 || clean_plate.len() > 10 || !clean_plate.chars().all(|c| c.is_ascii_alphanumeric()) {
        let mut error = ValidationError::new("plate_number");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Split a comma separated list, dropping blanks
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Case-insensitive substring match used by the registry filters
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.trim().to_lowercase())
}

/// Build an `ILIKE` pattern that matches `needle` literally as a substring
pub fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_validate_uuid() {
        let valid_uuid = "550e8400-e29b-41d4-a716-446655440000";
        assert!(validate_uuid(valid_uuid).is_ok());

        let invalid_uuid = "invalid-uuid";
        assert!(validate_uuid(invalid_uuid).is_err());
    }

    #[test]
    fn test_parse_id_reports_field() {
        assert!(parse_id("id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(parse_id("id", "64f1c2e8a1b2c3d4e5f60718").is_err());
    }

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2024-01-15").is_ok());
        assert!(validate_date("2024/01/15").is_err());
    }

    #[test]
    fn test_parse_datetime_formats() {
        let rfc = parse_datetime("2025-03-01T10:30:00Z").unwrap();
        assert_eq!(rfc.hour(), 10);

        let offset = parse_datetime("2025-03-01T10:30:00+05:30").unwrap();
        assert_eq!(offset.hour(), 5);

        let local = parse_datetime("2025-03-01T08:15").unwrap();
        assert_eq!(local.minute(), 15);

        let bare = parse_datetime("2025-03-01").unwrap();
        assert_eq!((bare.year(), bare.month(), bare.day(), bare.hour()), (2025, 3, 1, 0));

        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("Kamal").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("0771234567").is_ok());
        assert!(validate_phone("+94 77 123 4567").is_ok());
        assert!(validate_phone("123").is_err());
        assert!(validate_phone("1234567890123456").is_err());
    }

    #[test]
    fn test_validate_plate_number() {
        assert!(validate_plate_number("CAB-1234").is_ok());
        assert!(validate_plate_number("WP KA 4521").is_ok());
        assert!(validate_plate_number("A1").is_err());
        assert!(validate_plate_number("CAB#1234").is_err());
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" English, Sinhala ,,Tamil "), vec!["English", "Sinhala", "Tamil"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("English, Sinhala", "sinhala"));
        assert!(contains_ignore_case("B1, C1", " c1 "));
        assert!(!contains_ignore_case("English", "Tamil"));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("B1"), "%B1%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}

//! Lenient deserializers for form-shaped payloads.
//!
//! Multipart forms deliver every value as a string, while the JSON endpoints
//! receive numbers, arrays and dates in several shapes. These helpers accept
//! both so one request struct serves both transports.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer};

use super::validation::{parse_datetime, split_list};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Str(String),
    Int(i64),
    Float(f64),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    List(Vec<String>),
    Str(String),
}

pub fn datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_datetime(&raw).map_err(|_| de::Error::custom(format!("invalid date '{}'", raw)))
}

pub fn optional_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => parse_datetime(&raw)
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid date '{}'", raw))),
        _ => Ok(None),
    }
}

pub fn int<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::Int(n) => i32::try_from(n).map_err(de::Error::custom),
        StringOrNumber::Float(f) if f.fract() == 0.0 => Ok(f as i32),
        StringOrNumber::Float(f) => Err(de::Error::custom(format!("expected an integer, got {}", f))),
        StringOrNumber::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("expected an integer, got '{}'", s))),
    }
}

pub fn optional_int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<StringOrNumber>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StringOrNumber::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(StringOrNumber::Int(n)) => i32::try_from(n).map(Some).map_err(de::Error::custom),
        Some(StringOrNumber::Float(f)) if f.fract() == 0.0 => Ok(Some(f as i32)),
        Some(StringOrNumber::Float(f)) => Err(de::Error::custom(format!("expected an integer, got {}", f))),
        Some(StringOrNumber::Str(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected an integer, got '{}'", s))),
    }
}

/// Accepts `"0771234567"` as well as `771234567`.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::Str(s) => s,
        StringOrNumber::Int(n) => n.to_string(),
        StringOrNumber::Float(f) => f.to_string(),
    })
}

pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(|value| match value {
        StringOrNumber::Str(s) => s,
        StringOrNumber::Int(n) => n.to_string(),
        StringOrNumber::Float(f) => f.to_string(),
    }))
}

/// Accepts a JSON array, a JSON array encoded as a string, or a comma list.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrList::deserialize(deserializer)? {
        StringOrList::List(items) => items,
        StringOrList::Str(raw) => parse_list(&raw),
    })
}

pub fn optional_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrList>::deserialize(deserializer)?.map(|value| match value {
        StringOrList::List(items) => items,
        StringOrList::Str(raw) => parse_list(&raw),
    }))
}

fn parse_list(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        if let Ok(items) = serde_json::from_str::<Vec<String>>(trimmed) {
            return items
                .into_iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect();
        }
    }
    split_list(trimmed)
}

//! Booking model
//!
//! Bookings are an independent ledger: they reference a user, a package, a
//! vehicle and a driver by id but never touch availability.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Booking status - maps to the `booking_status` ENUM
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "booking_status")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

/// Booking - maps to the `bookings` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub package_id: Option<Uuid>,
    pub date: DateTime<Utc>,
    pub vehicle_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn from_new(new: NewBooking, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: new.user_id,
            package_id: new.package_id,
            date: new.date,
            vehicle_id: new.vehicle_id,
            driver_id: new.driver_id,
            status: new.status,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: Option<Uuid>,
    pub package_id: Option<Uuid>,
    pub date: DateTime<Utc>,
    pub vehicle_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Default)]
pub struct BookingChanges {
    pub user_id: Option<Uuid>,
    pub package_id: Option<Uuid>,
    pub date: Option<DateTime<Utc>>,
    pub vehicle_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub status: Option<BookingStatus>,
}

impl BookingChanges {
    pub fn apply(self, booking: &mut Booking, now: DateTime<Utc>) {
        if let Some(v) = self.user_id { booking.user_id = Some(v); }
        if let Some(v) = self.package_id { booking.package_id = Some(v); }
        if let Some(v) = self.date { booking.date = v; }
        if let Some(v) = self.vehicle_id { booking.vehicle_id = Some(v); }
        if let Some(v) = self.driver_id { booking.driver_id = Some(v); }
        if let Some(v) = self.status { booking.status = v; }
        booking.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_pending() {
        assert_eq!(BookingStatus::default(), BookingStatus::Pending);
        let parsed: BookingStatus = serde_json::from_str("\"Cancelled\"").unwrap();
        assert_eq!(parsed, BookingStatus::Cancelled);
        assert!(serde_json::from_str::<BookingStatus>("\"Lost\"").is_err());
    }

    #[test]
    fn changes_update_status_only() {
        let now = Utc::now();
        let mut booking = Booking::from_new(
            NewBooking {
                user_id: None,
                package_id: None,
                date: now,
                vehicle_id: None,
                driver_id: None,
                status: BookingStatus::Pending,
            },
            Uuid::new_v4(),
            now,
        );
        BookingChanges {
            status: Some(BookingStatus::Confirmed),
            ..Default::default()
        }
        .apply(&mut booking, now);
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.date, now);
    }
}

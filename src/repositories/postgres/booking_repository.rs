use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::PgStore;
use crate::models::{Booking, BookingChanges, NewBooking};
use crate::repositories::BookingRepository;
use crate::utils::errors::AppResult;

#[async_trait]
impl BookingRepository for PgStore {
    async fn create_booking(&self, new: NewBooking) -> AppResult<Booking> {
        let now = Utc::now();

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (id, user_id, package_id, date, vehicle_id, driver_id, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(new.package_id)
        .bind(new.date)
        .bind(new.vehicle_id)
        .bind(new.driver_id)
        .bind(new.status)
        .bind(now)
        .fetch_one(self.pool())
        .await?;

        Ok(booking)
    }

    async fn find_booking(&self, id: Uuid) -> AppResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(booking)
    }

    async fn list_bookings(&self) -> AppResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY created_at, id")
            .fetch_all(self.pool())
            .await?;

        Ok(bookings)
    }

    async fn update_booking(&self, id: Uuid, changes: BookingChanges) -> AppResult<Option<Booking>> {
        let mut tx = self.pool().begin().await?;

        let Some(mut booking) = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        changes.apply(&mut booking, Utc::now());

        let updated = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET user_id = $2, package_id = $3, date = $4, vehicle_id = $5, driver_id = $6,
                status = $7, updated_at = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(booking.user_id)
        .bind(booking.package_id)
        .bind(booking.date)
        .bind(booking.vehicle_id)
        .bind(booking.driver_id)
        .bind(booking.status)
        .bind(booking.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn delete_booking(&self, id: Uuid) -> AppResult<Option<Booking>> {
        let deleted = sqlx::query_as::<_, Booking>("DELETE FROM bookings WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(deleted)
    }
}

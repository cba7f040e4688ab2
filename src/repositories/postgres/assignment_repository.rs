use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::{unique_violation_as_conflict, PgStore};
use crate::models::assignment::check_can_start;
use crate::models::{Assignment, AssignmentFilter, AvailabilityPolicy, Driver, NewAssignment, Vehicle};
use crate::repositories::AssignmentRepository;
use crate::utils::errors::{not_found_error, AppError, AppResult};

async fn set_availability(
    tx: &mut Transaction<'_, Postgres>,
    driver_id: Uuid,
    vehicle_id: Uuid,
    available: bool,
    now: DateTime<Utc>,
) -> AppResult<()> {
    sqlx::query("UPDATE drivers SET is_available = $2, updated_at = $3 WHERE id = $1")
        .bind(driver_id)
        .bind(available)
        .bind(now)
        .execute(&mut **tx)
        .await?;

    sqlx::query("UPDATE vehicles SET is_available = $2, updated_at = $3 WHERE id = $1")
        .bind(vehicle_id)
        .bind(available)
        .bind(now)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

#[async_trait]
impl AssignmentRepository for PgStore {
    async fn start_assignment(&self, new: NewAssignment, policy: AvailabilityPolicy) -> AppResult<Assignment> {
        let mut tx = self.pool().begin().await?;

        let driver = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1 FOR UPDATE")
            .bind(new.driver_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| not_found_error("Driver", &new.driver_id.to_string()))?;

        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1 FOR UPDATE")
            .bind(new.vehicle_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &new.vehicle_id.to_string()))?;

        let (driver_has_active, vehicle_has_active): (bool, bool) = sqlx::query_as(
            r#"
            SELECT
                EXISTS(SELECT 1 FROM assignments WHERE driver_id = $1 AND is_active),
                EXISTS(SELECT 1 FROM assignments WHERE vehicle_id = $2 AND is_active)
            "#,
        )
        .bind(new.driver_id)
        .bind(new.vehicle_id)
        .fetch_one(&mut *tx)
        .await?;

        check_can_start(&driver, &vehicle, driver_has_active, vehicle_has_active)?;

        let now = Utc::now();
        let assignment = sqlx::query_as::<_, Assignment>(
            r#"
            INSERT INTO assignments (id, driver_id, vehicle_id, start_date, end_date, is_active, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NULL, TRUE, $5, $6, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.driver_id)
        .bind(new.vehicle_id)
        .bind(new.start_date)
        .bind(new.notes)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| unique_violation_as_conflict(e, || "Driver or vehicle already has an active assignment".to_string()))?;

        set_availability(
            &mut tx,
            assignment.driver_id,
            assignment.vehicle_id,
            policy.availability_while_assigned(),
            now,
        )
        .await?;

        tx.commit().await?;
        Ok(assignment)
    }

    async fn end_assignment(&self, id: Uuid, ended_at: DateTime<Utc>) -> AppResult<Assignment> {
        let mut tx = self.pool().begin().await?;

        let mut assignment = sqlx::query_as::<_, Assignment>("SELECT * FROM assignments WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?;

        assignment.end(ended_at)?;

        let ended = sqlx::query_as::<_, Assignment>(
            r#"
            UPDATE assignments
            SET is_active = FALSE, end_date = $2, updated_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(assignment.end_date)
        .bind(assignment.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        set_availability(&mut tx, ended.driver_id, ended.vehicle_id, true, ended_at).await?;

        tx.commit().await?;
        Ok(ended)
    }

    async fn find_assignment(&self, id: Uuid) -> AppResult<Option<Assignment>> {
        let assignment = sqlx::query_as::<_, Assignment>("SELECT * FROM assignments WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(assignment)
    }

    async fn list_assignments(&self, filter: AssignmentFilter) -> AppResult<Vec<Assignment>> {
        const ORDER: &str = "ORDER BY start_date DESC, created_at DESC";

        let assignments = match filter {
            AssignmentFilter::All => {
                sqlx::query_as::<_, Assignment>(&format!("SELECT * FROM assignments {}", ORDER))
                    .fetch_all(self.pool())
                    .await?
            }
            AssignmentFilter::Active => {
                sqlx::query_as::<_, Assignment>(&format!("SELECT * FROM assignments WHERE is_active {}", ORDER))
                    .fetch_all(self.pool())
                    .await?
            }
            AssignmentFilter::Driver(driver_id) => {
                sqlx::query_as::<_, Assignment>(&format!("SELECT * FROM assignments WHERE driver_id = $1 {}", ORDER))
                    .bind(driver_id)
                    .fetch_all(self.pool())
                    .await?
            }
            AssignmentFilter::Vehicle(vehicle_id) => {
                sqlx::query_as::<_, Assignment>(&format!("SELECT * FROM assignments WHERE vehicle_id = $1 {}", ORDER))
                    .bind(vehicle_id)
                    .fetch_all(self.pool())
                    .await?
            }
        };

        Ok(assignments)
    }
}

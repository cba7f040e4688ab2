use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{unique_violation_as_conflict, PgStore};
use crate::models::{Driver, DriverChanges, DriverFilter, NewDriver};
use crate::repositories::DriverRepository;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::like_pattern;

#[async_trait]
impl DriverRepository for PgStore {
    async fn create_driver(&self, new: NewDriver) -> AppResult<Driver> {
        let email = new.email.clone();
        let now = Utc::now();

        sqlx::query_as::<_, Driver>(
            r#"
            INSERT INTO drivers (id, name, phone, nic, email, gender, date_of_birth, languages,
                                 drivers_license_number, license_expiry_date, license_category,
                                 is_available, driver_picture, license_copy, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, TRUE, $12, $13, $14, $14)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.name)
        .bind(new.phone)
        .bind(new.nic)
        .bind(new.email)
        .bind(new.gender)
        .bind(new.date_of_birth)
        .bind(new.languages)
        .bind(new.drivers_license_number)
        .bind(new.license_expiry_date)
        .bind(new.license_category)
        .bind(new.driver_picture)
        .bind(new.license_copy)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(|e| unique_violation_as_conflict(e, || format!("Driver with email '{}' already exists", email)))
    }

    async fn find_driver(&self, id: Uuid) -> AppResult<Option<Driver>> {
        let driver = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(driver)
    }

    async fn find_drivers_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Driver>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let drivers = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = ANY($1)")
            .bind(ids.to_vec())
            .fetch_all(self.pool())
            .await?;

        Ok(drivers)
    }

    async fn list_drivers(&self, filter: DriverFilter) -> AppResult<Vec<Driver>> {
        let query = match &filter {
            DriverFilter::All => sqlx::query_as::<_, Driver>("SELECT * FROM drivers ORDER BY created_at, id"),
            DriverFilter::Available => sqlx::query_as::<_, Driver>(
                "SELECT * FROM drivers WHERE is_available ORDER BY created_at, id",
            ),
            DriverFilter::LicenseCategory(category) => sqlx::query_as::<_, Driver>(
                "SELECT * FROM drivers WHERE license_category ILIKE $1 ORDER BY created_at, id",
            )
            .bind(like_pattern(category)),
            DriverFilter::Language(language) => sqlx::query_as::<_, Driver>(
                "SELECT * FROM drivers WHERE languages ILIKE $1 ORDER BY created_at, id",
            )
            .bind(like_pattern(language)),
        };

        let drivers = query.fetch_all(self.pool()).await?;
        Ok(drivers)
    }

    async fn update_driver(&self, id: Uuid, changes: DriverChanges) -> AppResult<Option<Driver>> {
        let mut tx = self.pool().begin().await?;

        let Some(mut driver) = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        changes.apply(&mut driver, Utc::now());
        let email = driver.email.clone();

        let updated = sqlx::query_as::<_, Driver>(
            r#"
            UPDATE drivers
            SET name = $2, phone = $3, nic = $4, email = $5, gender = $6, date_of_birth = $7,
                languages = $8, drivers_license_number = $9, license_expiry_date = $10,
                license_category = $11, updated_at = $12
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(driver.name)
        .bind(driver.phone)
        .bind(driver.nic)
        .bind(driver.email)
        .bind(driver.gender)
        .bind(driver.date_of_birth)
        .bind(driver.languages)
        .bind(driver.drivers_license_number)
        .bind(driver.license_expiry_date)
        .bind(driver.license_category)
        .bind(driver.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| unique_violation_as_conflict(e, || format!("Driver with email '{}' already exists", email)))?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn delete_driver(&self, id: Uuid) -> AppResult<Option<Driver>> {
        let mut tx = self.pool().begin().await?;

        let locked: Option<Uuid> = sqlx::query_scalar("SELECT id FROM drivers WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let busy: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM assignments WHERE driver_id = $1 AND is_active)",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if busy {
            return Err(AppError::Conflict(
                "Driver has an active assignment; end it before deleting the driver".to_string(),
            ));
        }

        let deleted = sqlx::query_as::<_, Driver>("DELETE FROM drivers WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(deleted)
    }
}

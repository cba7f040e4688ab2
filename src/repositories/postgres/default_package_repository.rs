use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::PgStore;
use crate::models::{DefaultPackage, DefaultPackageChanges, NewDefaultPackage};
use crate::repositories::DefaultPackageRepository;
use crate::utils::errors::AppResult;

#[async_trait]
impl DefaultPackageRepository for PgStore {
    async fn create_package(&self, new: NewDefaultPackage) -> AppResult<DefaultPackage> {
        let now = Utc::now();

        let package = sqlx::query_as::<_, DefaultPackage>(
            r#"
            INSERT INTO default_packages (id, full_name, email, contact_number, package_name,
                                          number_of_travelers, departure_date, return_date,
                                          preferred_time, vehicle, vehicle_type, pickup_location,
                                          drop_off_location, luggage_details, child_seat,
                                          driver_language, special_request, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $18)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.full_name)
        .bind(new.email)
        .bind(new.contact_number)
        .bind(new.package_name)
        .bind(new.number_of_travelers)
        .bind(new.departure_date)
        .bind(new.return_date)
        .bind(new.preferred_time)
        .bind(new.vehicle)
        .bind(new.vehicle_type)
        .bind(new.pickup_location)
        .bind(new.drop_off_location)
        .bind(new.luggage_details)
        .bind(new.child_seat)
        .bind(new.driver_language)
        .bind(new.special_request)
        .bind(now)
        .fetch_one(self.pool())
        .await?;

        Ok(package)
    }

    async fn find_package(&self, id: Uuid) -> AppResult<Option<DefaultPackage>> {
        let package = sqlx::query_as::<_, DefaultPackage>("SELECT * FROM default_packages WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(package)
    }

    async fn list_packages(&self) -> AppResult<Vec<DefaultPackage>> {
        let packages = sqlx::query_as::<_, DefaultPackage>("SELECT * FROM default_packages ORDER BY created_at, id")
            .fetch_all(self.pool())
            .await?;

        Ok(packages)
    }

    async fn update_package(&self, id: Uuid, changes: DefaultPackageChanges) -> AppResult<Option<DefaultPackage>> {
        let mut tx = self.pool().begin().await?;

        let Some(mut package) =
            sqlx::query_as::<_, DefaultPackage>("SELECT * FROM default_packages WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
        else {
            return Ok(None);
        };

        changes.apply(&mut package, Utc::now())?;

        let updated = sqlx::query_as::<_, DefaultPackage>(
            r#"
            UPDATE default_packages
            SET full_name = $2, email = $3, contact_number = $4, package_name = $5,
                number_of_travelers = $6, departure_date = $7, return_date = $8,
                preferred_time = $9, vehicle = $10, vehicle_type = $11, pickup_location = $12,
                drop_off_location = $13, luggage_details = $14, child_seat = $15,
                driver_language = $16, special_request = $17, updated_at = $18
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(package.full_name)
        .bind(package.email)
        .bind(package.contact_number)
        .bind(package.package_name)
        .bind(package.number_of_travelers)
        .bind(package.departure_date)
        .bind(package.return_date)
        .bind(package.preferred_time)
        .bind(package.vehicle)
        .bind(package.vehicle_type)
        .bind(package.pickup_location)
        .bind(package.drop_off_location)
        .bind(package.luggage_details)
        .bind(package.child_seat)
        .bind(package.driver_language)
        .bind(package.special_request)
        .bind(package.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn delete_package(&self, id: Uuid) -> AppResult<Option<DefaultPackage>> {
        let deleted = sqlx::query_as::<_, DefaultPackage>("DELETE FROM default_packages WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(deleted)
    }
}

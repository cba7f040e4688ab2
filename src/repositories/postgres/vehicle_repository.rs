use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{unique_violation_as_conflict, PgStore};
use crate::models::{NewVehicle, Vehicle, VehicleChanges, VehicleFilter};
use crate::repositories::VehicleRepository;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::like_pattern;

#[async_trait]
impl VehicleRepository for PgStore {
    async fn create_vehicle(&self, new: NewVehicle) -> AppResult<Vehicle> {
        let plate = new.vehicle_number.clone();
        let now = Utc::now();

        sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, vehicle_number, vehicle_type, vehicle_model, owner_name,
                                  owner_contact_number, year_of_manufacture, fuel_type,
                                  license_expiry_date, color, seating_capacity, vehicle_features,
                                  vehicle_image, is_available, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, TRUE, $14, $14)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.vehicle_number)
        .bind(new.vehicle_type)
        .bind(new.vehicle_model)
        .bind(new.owner_name)
        .bind(new.owner_contact_number)
        .bind(new.year_of_manufacture)
        .bind(new.fuel_type)
        .bind(new.license_expiry_date)
        .bind(new.color)
        .bind(new.seating_capacity)
        .bind(new.vehicle_features)
        .bind(new.vehicle_image)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(|e| unique_violation_as_conflict(e, || format!("Vehicle with vehicleNumber '{}' already exists", plate)))
    }

    async fn find_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(vehicle)
    }

    async fn find_vehicles_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Vehicle>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let vehicles = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = ANY($1)")
            .bind(ids.to_vec())
            .fetch_all(self.pool())
            .await?;

        Ok(vehicles)
    }

    async fn list_vehicles(&self, filter: VehicleFilter) -> AppResult<Vec<Vehicle>> {
        let query = match filter {
            VehicleFilter::All => sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY created_at, id"),
            VehicleFilter::Available => sqlx::query_as::<_, Vehicle>(
                "SELECT * FROM vehicles WHERE is_available ORDER BY created_at, id",
            ),
            VehicleFilter::Type(needle) => sqlx::query_as::<_, Vehicle>(
                "SELECT * FROM vehicles WHERE vehicle_type::text ILIKE $1 ORDER BY created_at, id",
            )
            .bind(like_pattern(&needle)),
        };

        let vehicles = query.fetch_all(self.pool()).await?;
        Ok(vehicles)
    }

    async fn update_vehicle(&self, id: Uuid, changes: VehicleChanges) -> AppResult<Option<Vehicle>> {
        let mut tx = self.pool().begin().await?;

        let Some(mut vehicle) = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        changes.apply(&mut vehicle, Utc::now());
        let plate = vehicle.vehicle_number.clone();

        let updated = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET vehicle_number = $2, vehicle_type = $3, vehicle_model = $4, owner_name = $5,
                owner_contact_number = $6, year_of_manufacture = $7, fuel_type = $8,
                license_expiry_date = $9, color = $10, seating_capacity = $11,
                vehicle_features = $12, updated_at = $13
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(vehicle.vehicle_number)
        .bind(vehicle.vehicle_type)
        .bind(vehicle.vehicle_model)
        .bind(vehicle.owner_name)
        .bind(vehicle.owner_contact_number)
        .bind(vehicle.year_of_manufacture)
        .bind(vehicle.fuel_type)
        .bind(vehicle.license_expiry_date)
        .bind(vehicle.color)
        .bind(vehicle.seating_capacity)
        .bind(vehicle.vehicle_features)
        .bind(vehicle.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| unique_violation_as_conflict(e, || format!("Vehicle with vehicleNumber '{}' already exists", plate)))?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn delete_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let mut tx = self.pool().begin().await?;

        let locked: Option<Uuid> = sqlx::query_scalar("SELECT id FROM vehicles WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let busy: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM assignments WHERE vehicle_id = $1 AND is_active)",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if busy {
            return Err(AppError::Conflict(
                "Vehicle has an active assignment; end it before deleting the vehicle".to_string(),
            ));
        }

        let deleted = sqlx::query_as::<_, Vehicle>("DELETE FROM vehicles WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(deleted)
    }
}

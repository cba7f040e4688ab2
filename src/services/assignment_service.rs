//! Assignment lifecycle
//!
//! Starts and ends driver/vehicle pairings and builds the populated views the
//! API returns. The check-then-write sequence itself lives in the store so it
//! runs atomically; this service resolves defaults and references around it.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{Assignment, AssignmentFilter, AvailabilityPolicy, NewAssignment, PopulatedAssignment};
use crate::repositories::FleetStore;
use crate::utils::errors::{not_found_error, AppResult};

#[derive(Clone)]
pub struct AssignmentService {
    store: Arc<dyn FleetStore>,
    policy: AvailabilityPolicy,
}

impl AssignmentService {
    pub fn new(store: Arc<dyn FleetStore>, policy: AvailabilityPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> AvailabilityPolicy {
        self.policy
    }

    /// Start an assignment. `start_date` defaults to the call time.
    pub async fn create(
        &self,
        driver_id: Uuid,
        vehicle_id: Uuid,
        start_date: Option<DateTime<Utc>>,
        notes: Option<String>,
    ) -> AppResult<PopulatedAssignment> {
        let new = NewAssignment {
            driver_id,
            vehicle_id,
            start_date: start_date.unwrap_or_else(Utc::now),
            notes: notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
        };

        let assignment = match self.store.start_assignment(new, self.policy).await {
            Ok(assignment) => assignment,
            Err(e) => {
                warn!("🚫 Assignment refused for driver {} / vehicle {}: {}", driver_id, vehicle_id, e);
                return Err(e);
            }
        };

        info!(
            "🔗 Assignment {} started: driver {} -> vehicle {} (policy: {})",
            assignment.id, assignment.driver_id, assignment.vehicle_id, self.policy
        );

        self.populate_one(assignment).await
    }

    /// End an active assignment and release its driver and vehicle.
    pub async fn end(&self, id: Uuid) -> AppResult<PopulatedAssignment> {
        let assignment = self.store.end_assignment(id, Utc::now()).await?;

        info!(
            "🏁 Assignment {} ended: driver {} and vehicle {} released",
            assignment.id, assignment.driver_id, assignment.vehicle_id
        );

        self.populate_one(assignment).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<PopulatedAssignment> {
        let assignment = self
            .store
            .find_assignment(id)
            .await?
            .ok_or_else(|| not_found_error("Assignment", &id.to_string()))?;

        self.populate_one(assignment).await
    }

    /// Most recent first, every entry populated.
    pub async fn list(&self, filter: AssignmentFilter) -> AppResult<Vec<PopulatedAssignment>> {
        let assignments = self.store.list_assignments(filter).await?;
        self.populate(assignments).await
    }

    pub async fn list_by_driver(&self, driver_id: Uuid) -> AppResult<Vec<PopulatedAssignment>> {
        self.list(AssignmentFilter::Driver(driver_id)).await
    }

    pub async fn list_by_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<PopulatedAssignment>> {
        self.list(AssignmentFilter::Vehicle(vehicle_id)).await
    }

    async fn populate_one(&self, assignment: Assignment) -> AppResult<PopulatedAssignment> {
        let driver = self.store.find_driver(assignment.driver_id).await?;
        let vehicle = self.store.find_vehicle(assignment.vehicle_id).await?;
        Ok(PopulatedAssignment::new(assignment, driver, vehicle))
    }

    /// Resolve references with one lookup per collection, keeping order.
    async fn populate(&self, assignments: Vec<Assignment>) -> AppResult<Vec<PopulatedAssignment>> {
        if assignments.is_empty() {
            return Ok(Vec::new());
        }

        let mut driver_ids: Vec<Uuid> = assignments.iter().map(|a| a.driver_id).collect();
        driver_ids.sort_unstable();
        driver_ids.dedup();
        let mut vehicle_ids: Vec<Uuid> = assignments.iter().map(|a| a.vehicle_id).collect();
        vehicle_ids.sort_unstable();
        vehicle_ids.dedup();

        let drivers: HashMap<Uuid, _> = self
            .store
            .find_drivers_by_ids(&driver_ids)
            .await?
            .into_iter()
            .map(|d| (d.id, d))
            .collect();
        let vehicles: HashMap<Uuid, _> = self
            .store
            .find_vehicles_by_ids(&vehicle_ids)
            .await?
            .into_iter()
            .map(|v| (v.id, v))
            .collect();

        Ok(assignments
            .into_iter()
            .map(|a| {
                let driver = drivers.get(&a.driver_id).cloned();
                let vehicle = vehicles.get(&a.vehicle_id).cloned();
                PopulatedAssignment::new(a, driver, vehicle)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignment::AssignmentState;
    use crate::models::driver::fixtures::new_driver;
    use crate::models::vehicle::fixtures::new_vehicle;
    use crate::models::{Driver, Vehicle};
    use crate::repositories::{DriverRepository, MemoryStore, VehicleRepository};
    use crate::utils::errors::AppError;
    use chrono::Duration;

    async fn setup(policy: AvailabilityPolicy) -> (AssignmentService, MemoryStore, Driver, Vehicle) {
        let store = MemoryStore::new();
        let driver = store.create_driver(new_driver("nimal@example.com")).await.unwrap();
        let vehicle = store.create_vehicle(new_vehicle("WP-CAB-4321")).await.unwrap();
        let service = AssignmentService::new(Arc::new(store.clone()), policy);
        (service, store, driver, vehicle)
    }

    #[tokio::test]
    async fn create_defaults_start_date_and_populates() {
        let (service, _, driver, vehicle) = setup(AvailabilityPolicy::Reserve).await;
        let before = Utc::now();

        let created = service.create(driver.id, vehicle.id, None, Some("  airport run ".to_string())).await.unwrap();

        assert_eq!(created.state, AssignmentState::Active);
        assert!(created.start_date >= before && created.start_date <= Utc::now());
        assert_eq!(created.notes.as_deref(), Some("airport run"));
        assert_eq!(created.driver.as_ref().map(|d| d.id), Some(driver.id));
        assert_eq!(created.vehicle.as_ref().map(|v| v.id), Some(vehicle.id));
        assert!(!created.driver.unwrap().is_available);
    }

    #[tokio::test]
    async fn unavailable_vehicle_creates_nothing() {
        let (service, store, driver, vehicle) = setup(AvailabilityPolicy::Reserve).await;
        let other_driver = store.create_driver(new_driver("sunil@example.com")).await.unwrap();
        service.create(other_driver.id, vehicle.id, None, None).await.unwrap();

        let err = service.create(driver.id, vehicle.id, None, None).await.unwrap_err();
        match err {
            AppError::Unavailable { driver_available, vehicle_available, .. } => {
                assert!(driver_available);
                assert!(!vehicle_available);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert_eq!(service.list_by_driver(driver.id).await.unwrap().len(), 0);
        assert!(store.find_driver(driver.id).await.unwrap().unwrap().is_available);
    }

    #[tokio::test]
    async fn missing_references_are_not_found() {
        let (service, _, driver, _) = setup(AvailabilityPolicy::Reserve).await;
        let err = service.create(driver.id, Uuid::new_v4(), None, None).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = service.end(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn end_releases_both_sides_once() {
        let (service, store, driver, vehicle) = setup(AvailabilityPolicy::Reserve).await;
        let created = service.create(driver.id, vehicle.id, None, None).await.unwrap();

        let ended = service.end(created.id).await.unwrap();
        assert_eq!(ended.state, AssignmentState::Ended);
        assert!(!ended.is_active);
        let end_date = ended.end_date.unwrap();
        assert!(store.find_driver(driver.id).await.unwrap().unwrap().is_available);
        assert!(store.find_vehicle(vehicle.id).await.unwrap().unwrap().is_available);

        let again = service.end(created.id).await.unwrap_err();
        assert!(matches!(again, AppError::AlreadyEnded(_)));
        assert_eq!(service.get(created.id).await.unwrap().end_date, Some(end_date));
    }

    #[tokio::test]
    async fn listings_are_scoped_and_most_recent_first() {
        let (service, store, driver, vehicle) = setup(AvailabilityPolicy::Reserve).await;
        let spare = store.create_vehicle(new_vehicle("NC-7788")).await.unwrap();

        let first = service
            .create(driver.id, vehicle.id, Some(Utc::now() - Duration::days(2)), None)
            .await
            .unwrap();
        service.end(first.id).await.unwrap();
        let second = service.create(driver.id, spare.id, None, None).await.unwrap();

        let by_driver = service.list_by_driver(driver.id).await.unwrap();
        assert_eq!(by_driver.iter().map(|a| a.id).collect::<Vec<_>>(), vec![second.id, first.id]);

        let by_vehicle = service.list_by_vehicle(vehicle.id).await.unwrap();
        assert_eq!(by_vehicle.len(), 1);
        assert_eq!(by_vehicle[0].id, first.id);

        let active = service.list(AssignmentFilter::Active).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, second.id);

        assert!(service.list_by_driver(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_creates_for_one_driver_admit_one() {
        let (service, store, driver, vehicle) = setup(AvailabilityPolicy::Reserve).await;
        let spare = store.create_vehicle(new_vehicle("NC-7788")).await.unwrap();
        let (driver_id, vehicle_id, spare_id) = (driver.id, vehicle.id, spare.id);

        let first = tokio::spawn({
            let service = service.clone();
            async move { service.create(driver_id, vehicle_id, None, None).await }
        });
        let second = tokio::spawn({
            let service = service.clone();
            async move { service.create(driver_id, spare_id, None, None).await }
        });
        let results = [first.await.unwrap(), second.await.unwrap()];

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(service.list(AssignmentFilter::Active).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn legacy_policy_leaves_flags_set() {
        let (service, store, driver, vehicle) = setup(AvailabilityPolicy::Legacy).await;
        service.create(driver.id, vehicle.id, None, None).await.unwrap();

        assert!(store.find_driver(driver.id).await.unwrap().unwrap().is_available);
        assert!(store.find_vehicle(vehicle.id).await.unwrap().unwrap().is_available);

        let spare = store.create_vehicle(new_vehicle("NC-7788")).await.unwrap();
        let err = service.create(driver.id, spare.id, None, None).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}

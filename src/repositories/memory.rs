//! In-memory store
//!
//! All collections live behind one `RwLock`, so every multi-record operation
//! runs its check and its writes under the same write guard.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    AssignmentRepository, BookingRepository, DefaultPackageRepository, DriverRepository, FleetStore,
    VehicleRepository,
};
use crate::models::assignment::{check_can_start, sort_by_start_desc};
use crate::models::{
    Assignment, AssignmentFilter, AvailabilityPolicy, Booking, BookingChanges, DefaultPackage,
    DefaultPackageChanges, Driver, DriverChanges, DriverFilter, NewAssignment, NewBooking,
    NewDefaultPackage, NewDriver, NewVehicle, Vehicle, VehicleChanges, VehicleFilter,
};
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};

#[derive(Default)]
struct Collections {
    drivers: HashMap<Uuid, Driver>,
    vehicles: HashMap<Uuid, Vehicle>,
    assignments: HashMap<Uuid, Assignment>,
    bookings: HashMap<Uuid, Booking>,
    packages: HashMap<Uuid, DefaultPackage>,
}

impl Collections {
    fn driver_has_active(&self, driver_id: Uuid) -> bool {
        self.assignments.values().any(|a| a.is_active && a.driver_id == driver_id)
    }

    fn vehicle_has_active(&self, vehicle_id: Uuid) -> bool {
        self.assignments.values().any(|a| a.is_active && a.vehicle_id == vehicle_id)
    }

    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.drivers
            .values()
            .any(|d| Some(d.id) != except && d.email.eq_ignore_ascii_case(email))
    }

    fn plate_taken(&self, plate: &str, except: Option<Uuid>) -> bool {
        self.vehicles
            .values()
            .any(|v| Some(v.id) != except && v.vehicle_number.eq_ignore_ascii_case(plate))
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by_creation<T, F>(mut items: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> (DateTime<Utc>, Uuid),
{
    items.sort_by_key(|item| key(item));
    items
}

#[async_trait]
impl DriverRepository for MemoryStore {
    async fn create_driver(&self, new: NewDriver) -> AppResult<Driver> {
        let mut store = self.inner.write().await;
        if store.email_taken(&new.email, None) {
            return Err(conflict_error("Driver", "email", &new.email));
        }
        let driver = Driver::from_new(new, Uuid::new_v4(), Utc::now());
        store.drivers.insert(driver.id, driver.clone());
        Ok(driver)
    }

    async fn find_driver(&self, id: Uuid) -> AppResult<Option<Driver>> {
        Ok(self.inner.read().await.drivers.get(&id).cloned())
    }

    async fn find_drivers_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Driver>> {
        let store = self.inner.read().await;
        Ok(ids.iter().filter_map(|id| store.drivers.get(id).cloned()).collect())
    }

    async fn list_drivers(&self, filter: DriverFilter) -> AppResult<Vec<Driver>> {
        let store = self.inner.read().await;
        let drivers = store.drivers.values().filter(|d| d.matches(&filter)).cloned().collect();
        Ok(sorted_by_creation(drivers, |d: &Driver| (d.created_at, d.id)))
    }

    async fn update_driver(&self, id: Uuid, changes: DriverChanges) -> AppResult<Option<Driver>> {
        let mut store = self.inner.write().await;
        if let Some(email) = changes.email.as_deref() {
            if store.email_taken(email, Some(id)) {
                return Err(conflict_error("Driver", "email", email));
            }
        }
        let Some(driver) = store.drivers.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply(driver, Utc::now());
        Ok(Some(driver.clone()))
    }

    async fn delete_driver(&self, id: Uuid) -> AppResult<Option<Driver>> {
        let mut store = self.inner.write().await;
        if store.driver_has_active(id) {
            return Err(AppError::Conflict(
                "Driver has an active assignment; end it before deleting the driver".to_string(),
            ));
        }
        Ok(store.drivers.remove(&id))
    }
}

#[async_trait]
impl VehicleRepository for MemoryStore {
    async fn create_vehicle(&self, new: NewVehicle) -> AppResult<Vehicle> {
        let mut store = self.inner.write().await;
        if store.plate_taken(&new.vehicle_number, None) {
            return Err(conflict_error("Vehicle", "vehicleNumber", &new.vehicle_number));
        }
        let vehicle = Vehicle::from_new(new, Uuid::new_v4(), Utc::now());
        store.vehicles.insert(vehicle.id, vehicle.clone());
        Ok(vehicle)
    }

    async fn find_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        Ok(self.inner.read().await.vehicles.get(&id).cloned())
    }

    async fn find_vehicles_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Vehicle>> {
        let store = self.inner.read().await;
        Ok(ids.iter().filter_map(|id| store.vehicles.get(id).cloned()).collect())
    }

    async fn list_vehicles(&self, filter: VehicleFilter) -> AppResult<Vec<Vehicle>> {
        let store = self.inner.read().await;
        let vehicles = store.vehicles.values().filter(|v| v.matches(&filter)).cloned().collect();
        Ok(sorted_by_creation(vehicles, |v: &Vehicle| (v.created_at, v.id)))
    }

    async fn update_vehicle(&self, id: Uuid, changes: VehicleChanges) -> AppResult<Option<Vehicle>> {
        let mut store = self.inner.write().await;
        if let Some(plate) = changes.vehicle_number.as_deref() {
            if store.plate_taken(plate, Some(id)) {
                return Err(conflict_error("Vehicle", "vehicleNumber", plate));
            }
        }
        let Some(vehicle) = store.vehicles.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply(vehicle, Utc::now());
        Ok(Some(vehicle.clone()))
    }

    async fn delete_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let mut store = self.inner.write().await;
        if store.vehicle_has_active(id) {
            return Err(AppError::Conflict(
                "Vehicle has an active assignment; end it before deleting the vehicle".to_string(),
            ));
        }
        Ok(store.vehicles.remove(&id))
    }
}

#[async_trait]
impl AssignmentRepository for MemoryStore {
    async fn start_assignment(&self, new: NewAssignment, policy: AvailabilityPolicy) -> AppResult<Assignment> {
        let mut store = self.inner.write().await;

        let driver = store
            .drivers
            .get(&new.driver_id)
            .ok_or_else(|| not_found_error("Driver", &new.driver_id.to_string()))?;
        let vehicle = store
            .vehicles
            .get(&new.vehicle_id)
            .ok_or_else(|| not_found_error("Vehicle", &new.vehicle_id.to_string()))?;

        check_can_start(
            driver,
            vehicle,
            store.driver_has_active(new.driver_id),
            store.vehicle_has_active(new.vehicle_id),
        )?;

        let now = Utc::now();
        let assignment = Assignment::from_new(new, Uuid::new_v4(), now);
        store.assignments.insert(assignment.id, assignment.clone());

        let flag = policy.availability_while_assigned();
        if let Some(driver) = store.drivers.get_mut(&assignment.driver_id) {
            driver.is_available = flag;
            driver.updated_at = now;
        }
        if let Some(vehicle) = store.vehicles.get_mut(&assignment.vehicle_id) {
            vehicle.is_available = flag;
            vehicle.updated_at = now;
        }

        Ok(assignment)
    }

    async fn end_assignment(&self, id: Uuid, ended_at: DateTime<Utc>) -> AppResult<Assignment> {
        let mut store = self.inner.write().await;

        let assignment = store
            .assignments
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?;
        assignment.end(ended_at)?;
        let ended = assignment.clone();

        if let Some(driver) = store.drivers.get_mut(&ended.driver_id) {
            driver.is_available = true;
            driver.updated_at = ended_at;
        }
        if let Some(vehicle) = store.vehicles.get_mut(&ended.vehicle_id) {
            vehicle.is_available = true;
            vehicle.updated_at = ended_at;
        }

        Ok(ended)
    }

    async fn find_assignment(&self, id: Uuid) -> AppResult<Option<Assignment>> {
        Ok(self.inner.read().await.assignments.get(&id).cloned())
    }

    async fn list_assignments(&self, filter: AssignmentFilter) -> AppResult<Vec<Assignment>> {
        let store = self.inner.read().await;
        let mut assignments: Vec<Assignment> =
            store.assignments.values().filter(|a| a.matches(&filter)).cloned().collect();
        sort_by_start_desc(&mut assignments);
        Ok(assignments)
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn create_booking(&self, new: NewBooking) -> AppResult<Booking> {
        let booking = Booking::from_new(new, Uuid::new_v4(), Utc::now());
        self.inner.write().await.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn find_booking(&self, id: Uuid) -> AppResult<Option<Booking>> {
        Ok(self.inner.read().await.bookings.get(&id).cloned())
    }

    async fn list_bookings(&self) -> AppResult<Vec<Booking>> {
        let store = self.inner.read().await;
        let bookings = store.bookings.values().cloned().collect();
        Ok(sorted_by_creation(bookings, |b: &Booking| (b.created_at, b.id)))
    }

    async fn update_booking(&self, id: Uuid, changes: BookingChanges) -> AppResult<Option<Booking>> {
        let mut store = self.inner.write().await;
        let Some(booking) = store.bookings.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply(booking, Utc::now());
        Ok(Some(booking.clone()))
    }

    async fn delete_booking(&self, id: Uuid) -> AppResult<Option<Booking>> {
        Ok(self.inner.write().await.bookings.remove(&id))
    }
}

#[async_trait]
impl DefaultPackageRepository for MemoryStore {
    async fn create_package(&self, new: NewDefaultPackage) -> AppResult<DefaultPackage> {
        let package = DefaultPackage::from_new(new, Uuid::new_v4(), Utc::now());
        self.inner.write().await.packages.insert(package.id, package.clone());
        Ok(package)
    }

    async fn find_package(&self, id: Uuid) -> AppResult<Option<DefaultPackage>> {
        Ok(self.inner.read().await.packages.get(&id).cloned())
    }

    async fn list_packages(&self) -> AppResult<Vec<DefaultPackage>> {
        let store = self.inner.read().await;
        let packages = store.packages.values().cloned().collect();
        Ok(sorted_by_creation(packages, |p: &DefaultPackage| (p.created_at, p.id)))
    }

    async fn update_package(&self, id: Uuid, changes: DefaultPackageChanges) -> AppResult<Option<DefaultPackage>> {
        let mut store = self.inner.write().await;
        let Some(package) = store.packages.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply(package, Utc::now())?;
        Ok(Some(package.clone()))
    }

    async fn delete_package(&self, id: Uuid) -> AppResult<Option<DefaultPackage>> {
        Ok(self.inner.write().await.packages.remove(&id))
    }
}

impl FleetStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::driver::fixtures::new_driver;
    use crate::models::vehicle::fixtures::new_vehicle;

    async fn seeded() -> (MemoryStore, Driver, Vehicle) {
        let store = MemoryStore::new();
        let driver = store.create_driver(new_driver("kamal@example.com")).await.unwrap();
        let vehicle = store.create_vehicle(new_vehicle("CAB-1234")).await.unwrap();
        (store, driver, vehicle)
    }

    fn pairing(driver: &Driver, vehicle: &Vehicle) -> NewAssignment {
        NewAssignment {
            driver_id: driver.id,
            vehicle_id: vehicle.id,
            start_date: Utc::now(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn driver_round_trip() {
        let store = MemoryStore::new();
        let created = store.create_driver(new_driver("kamal@example.com")).await.unwrap();
        let found = store.find_driver(created.id).await.unwrap().unwrap();
        assert_eq!(created, found);
    }

    #[tokio::test]
    async fn vehicle_round_trip() {
        let store = MemoryStore::new();
        let created = store
            .create_vehicle(NewVehicle {
                vehicle_image: Some("/uploads/vehicles/front.png".to_string()),
                ..new_vehicle("CAB-1234")
            })
            .await
            .unwrap();
        let found = store.find_vehicle(created.id).await.unwrap().unwrap();
        assert_eq!(created, found);
    }

    #[tokio::test]
    async fn booking_round_trip() {
        let (store, driver, vehicle) = seeded().await;
        let created = store
            .create_booking(NewBooking {
                user_id: Some(Uuid::new_v4()),
                package_id: None,
                date: Utc::now(),
                vehicle_id: Some(vehicle.id),
                driver_id: Some(driver.id),
                status: crate::models::BookingStatus::Confirmed,
            })
            .await
            .unwrap();
        let found = store.find_booking(created.id).await.unwrap().unwrap();
        assert_eq!(created, found);
    }

    #[tokio::test]
    async fn package_update_checks_dates_against_stored_record() {
        let store = MemoryStore::new();
        let departure = Utc::now();
        let created = store
            .create_package(NewDefaultPackage {
                full_name: "Ayesha Fernando".to_string(),
                email: "ayesha@example.com".to_string(),
                contact_number: "0771234567".to_string(),
                package_name: "Cultural Triangle".to_string(),
                number_of_travelers: "4".to_string(),
                departure_date: departure,
                return_date: departure + chrono::Duration::days(4),
                preferred_time: "08:00".to_string(),
                vehicle: "Van".to_string(),
                vehicle_type: "van".to_string(),
                pickup_location: "Colombo".to_string(),
                drop_off_location: None,
                luggage_details: None,
                child_seat: None,
                driver_language: "English".to_string(),
                special_request: None,
            })
            .await
            .unwrap();

        let moved = store
            .update_package(
                created.id,
                DefaultPackageChanges {
                    departure_date: Some(departure + chrono::Duration::days(10)),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(moved, Err(AppError::Validation(_))));
        assert_eq!(store.find_package(created.id).await.unwrap().unwrap(), created);
    }

    #[tokio::test]
    async fn type_filter_is_a_substring_match() {
        let (store, _, mini_van) = seeded().await;

        let vans = store.list_vehicles(VehicleFilter::Type("VAN".to_string())).await.unwrap();
        assert_eq!(vans.iter().map(|v| v.id).collect::<Vec<_>>(), vec![mini_van.id]);
        assert!(store.list_vehicles(VehicleFilter::Type("bus".to_string())).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_and_plate_conflict() {
        let (store, _, _) = seeded().await;
        let dup_driver = store.create_driver(new_driver("KAMAL@example.com")).await;
        assert!(matches!(dup_driver, Err(AppError::Conflict(_))));
        let dup_vehicle = store.create_vehicle(new_vehicle("cab-1234")).await;
        assert!(matches!(dup_vehicle, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn start_reserves_both_sides_under_reserve_policy() {
        let (store, driver, vehicle) = seeded().await;
        let assignment = store
            .start_assignment(pairing(&driver, &vehicle), AvailabilityPolicy::Reserve)
            .await
            .unwrap();
        assert!(assignment.is_active);
        assert!(!store.find_driver(driver.id).await.unwrap().unwrap().is_available);
        assert!(!store.find_vehicle(vehicle.id).await.unwrap().unwrap().is_available);
    }

    #[tokio::test]
    async fn legacy_policy_keeps_flags_but_still_blocks_double_assignment() {
        let (store, driver, vehicle) = seeded().await;
        let other_vehicle = store.create_vehicle(new_vehicle("CAD-9876")).await.unwrap();

        store
            .start_assignment(pairing(&driver, &vehicle), AvailabilityPolicy::Legacy)
            .await
            .unwrap();
        assert!(store.find_driver(driver.id).await.unwrap().unwrap().is_available);

        let second = store
            .start_assignment(pairing(&driver, &other_vehicle), AvailabilityPolicy::Legacy)
            .await;
        assert!(matches!(second, Err(AppError::Conflict(_))));
        assert_eq!(store.list_assignments(AssignmentFilter::All).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_references_are_not_found() {
        let (store, driver, _) = seeded().await;
        let result = store
            .start_assignment(
                NewAssignment {
                    driver_id: driver.id,
                    vehicle_id: Uuid::new_v4(),
                    start_date: Utc::now(),
                    notes: None,
                },
                AvailabilityPolicy::Reserve,
            )
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(store.list_assignments(AssignmentFilter::All).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn end_releases_both_sides() {
        let (store, driver, vehicle) = seeded().await;
        let assignment = store
            .start_assignment(pairing(&driver, &vehicle), AvailabilityPolicy::Reserve)
            .await
            .unwrap();

        let ended = store.end_assignment(assignment.id, Utc::now()).await.unwrap();
        assert!(!ended.is_active);
        assert!(ended.end_date.is_some());
        assert!(store.find_driver(driver.id).await.unwrap().unwrap().is_available);
        assert!(store.find_vehicle(vehicle.id).await.unwrap().unwrap().is_available);

        let again = store.end_assignment(assignment.id, Utc::now()).await;
        assert!(matches!(again, Err(AppError::AlreadyEnded(_))));
        let stored = store.find_assignment(assignment.id).await.unwrap().unwrap();
        assert_eq!(stored.end_date, ended.end_date);
    }

    #[tokio::test]
    async fn history_survives_driver_deletion() {
        let (store, driver, vehicle) = seeded().await;
        let assignment = store
            .start_assignment(pairing(&driver, &vehicle), AvailabilityPolicy::Legacy)
            .await
            .unwrap();
        store.end_assignment(assignment.id, Utc::now()).await.unwrap();
        store.delete_driver(driver.id).await.unwrap();
        assert_eq!(store.list_assignments(AssignmentFilter::Driver(driver.id)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_is_blocked_while_assigned() {
        let (store, driver, vehicle) = seeded().await;
        let assignment = store
            .start_assignment(pairing(&driver, &vehicle), AvailabilityPolicy::Reserve)
            .await
            .unwrap();

        assert!(matches!(store.delete_driver(driver.id).await, Err(AppError::Conflict(_))));
        assert!(matches!(store.delete_vehicle(vehicle.id).await, Err(AppError::Conflict(_))));

        store.end_assignment(assignment.id, Utc::now()).await.unwrap();
        assert!(store.delete_driver(driver.id).await.unwrap().is_some());
        assert!(store.delete_vehicle(vehicle.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn concurrent_starts_for_one_driver_admit_exactly_one() {
        let (store, driver, vehicle) = seeded().await;
        let other_vehicle = store.create_vehicle(new_vehicle("CAD-9876")).await.unwrap();

        for policy in [AvailabilityPolicy::Reserve, AvailabilityPolicy::Legacy] {
            let store = store.clone();
            let attempts = (0..8).map(|i| {
                let store = store.clone();
                let vehicle_id = if i % 2 == 0 { vehicle.id } else { other_vehicle.id };
                let new = NewAssignment {
                    driver_id: driver.id,
                    vehicle_id,
                    start_date: Utc::now(),
                    notes: None,
                };
                tokio::spawn(async move { store.start_assignment(new, policy).await })
            });

            let results: Vec<_> = futures::future::join_all(attempts)
                .await
                .into_iter()
                .map(|joined| joined.unwrap())
                .collect();

            let winners = results.iter().filter(|r| r.is_ok()).count();
            assert_eq!(winners, 1, "policy {policy}");
            assert!(results
                .iter()
                .filter_map(|r| r.as_ref().err())
                .all(|e| matches!(e, AppError::Unavailable { .. } | AppError::Conflict(_))));

            let active = store.list_assignments(AssignmentFilter::Active).await.unwrap();
            assert_eq!(active.len(), 1);
            store.end_assignment(active[0].id, Utc::now()).await.unwrap();
        }
    }

    #[tokio::test]
    async fn filters_and_ordering() {
        let (store, driver, vehicle) = seeded().await;
        let first = store
            .start_assignment(
                NewAssignment {
                    start_date: Utc::now() - chrono::Duration::days(2),
                    ..pairing(&driver, &vehicle)
                },
                AvailabilityPolicy::Reserve,
            )
            .await
            .unwrap();
        store.end_assignment(first.id, Utc::now()).await.unwrap();
        let second = store
            .start_assignment(pairing(&driver, &vehicle), AvailabilityPolicy::Reserve)
            .await
            .unwrap();

        let by_driver = store.list_assignments(AssignmentFilter::Driver(driver.id)).await.unwrap();
        assert_eq!(by_driver.iter().map(|a| a.id).collect::<Vec<_>>(), vec![second.id, first.id]);

        let active = store.list_assignments(AssignmentFilter::Active).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, second.id);

        let elsewhere = store.list_assignments(AssignmentFilter::Vehicle(Uuid::new_v4())).await.unwrap();
        assert!(elsewhere.is_empty());
    }
}

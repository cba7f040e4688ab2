//! Assignment model and lifecycle rules
//!
//! An assignment pairs one driver with one vehicle. It starts `Active` and
//! ends exactly once; `Ended` is terminal. The rules here are shared by every
//! store backend so the check-then-write sequence stays identical whether it
//! runs inside a PostgreSQL transaction or under the in-memory lock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::driver::Driver;
use super::vehicle::Vehicle;
use crate::utils::errors::{AppError, AppResult};

/// Assignment - maps to the `assignments` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "driver")]
    pub driver_id: Uuid,
    #[serde(rename = "vehicle")]
    pub vehicle_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssignmentState {
    Active,
    Ended,
}

impl Assignment {
    pub fn from_new(new: NewAssignment, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            driver_id: new.driver_id,
            vehicle_id: new.vehicle_id,
            start_date: new.start_date,
            end_date: None,
            is_active: true,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn state(&self) -> AssignmentState {
        if self.is_active {
            AssignmentState::Active
        } else {
            AssignmentState::Ended
        }
    }

    /// Transition `Active -> Ended`, stamping `end_date`.
    pub fn end(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        if self.state() == AssignmentState::Ended {
            return Err(AppError::AlreadyEnded("Assignment is already ended".to_string()));
        }
        self.is_active = false;
        self.end_date = Some(now);
        self.updated_at = now;
        Ok(())
    }

    pub fn matches(&self, filter: &AssignmentFilter) -> bool {
        match filter {
            AssignmentFilter::All => true,
            AssignmentFilter::Active => self.is_active,
            AssignmentFilter::Driver(id) => self.driver_id == *id,
            AssignmentFilter::Vehicle(id) => self.vehicle_id == *id,
        }
    }
}

/// Payload for starting an assignment
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub driver_id: Uuid,
    pub vehicle_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentFilter {
    All,
    Active,
    Driver(Uuid),
    Vehicle(Uuid),
}

/// What the driver and vehicle `is_available` flags become when an
/// assignment starts. Ending an assignment always sets them back to `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AvailabilityPolicy {
    /// Both are marked unavailable while assigned.
    #[default]
    Reserve,
    /// Both stay available while assigned, matching the legacy back office.
    /// Double assignment is still rejected through the active-assignment check.
    Legacy,
}

impl AvailabilityPolicy {
    pub fn availability_while_assigned(self) -> bool {
        match self {
            AvailabilityPolicy::Reserve => false,
            AvailabilityPolicy::Legacy => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityPolicy::Reserve => "reserve",
            AvailabilityPolicy::Legacy => "legacy",
        }
    }
}

impl fmt::Display for AvailabilityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AvailabilityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reserve" => Ok(AvailabilityPolicy::Reserve),
            "legacy" => Ok(AvailabilityPolicy::Legacy),
            other => Err(format!("unknown availability policy '{}' (expected reserve or legacy)", other)),
        }
    }
}

/// Preconditions for starting an assignment, checked after both records
/// were loaded (and locked) by the store.
pub fn check_can_start(
    driver: &Driver,
    vehicle: &Vehicle,
    driver_has_active: bool,
    vehicle_has_active: bool,
) -> AppResult<()> {
    if !driver.is_available || !vehicle.is_available {
        return Err(AppError::Unavailable {
            message: "Driver or Vehicle not available".to_string(),
            driver_available: driver.is_available,
            vehicle_available: vehicle.is_available,
        });
    }

    if driver_has_active {
        return Err(AppError::Conflict(format!(
            "Driver '{}' already has an active assignment",
            driver.id
        )));
    }

    if vehicle_has_active {
        return Err(AppError::Conflict(format!(
            "Vehicle '{}' already has an active assignment",
            vehicle.vehicle_number
        )));
    }

    Ok(())
}

/// Assignment with its driver and vehicle resolved. A side is `None` when
/// the referenced record has been deleted since.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedAssignment {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub driver: Option<Driver>,
    pub vehicle: Option<Vehicle>,
    pub driver_id: Uuid,
    pub vehicle_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub state: AssignmentState,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PopulatedAssignment {
    pub fn new(assignment: Assignment, driver: Option<Driver>, vehicle: Option<Vehicle>) -> Self {
        let state = assignment.state();
        Self {
            id: assignment.id,
            driver,
            vehicle,
            driver_id: assignment.driver_id,
            vehicle_id: assignment.vehicle_id,
            start_date: assignment.start_date,
            end_date: assignment.end_date,
            is_active: assignment.is_active,
            state,
            notes: assignment.notes,
            created_at: assignment.created_at,
            updated_at: assignment.updated_at,
        }
    }
}

/// Most recent first
pub fn sort_by_start_desc(assignments: &mut [Assignment]) {
    assignments.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(b.created_at.cmp(&a.created_at)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::driver::fixtures::new_driver;
    use crate::models::vehicle::fixtures::new_vehicle;
    use chrono::Duration;

    fn active_assignment() -> Assignment {
        Assignment::from_new(
            NewAssignment {
                driver_id: Uuid::new_v4(),
                vehicle_id: Uuid::new_v4(),
                start_date: Utc::now(),
                notes: None,
            },
            Uuid::new_v4(),
            Utc::now(),
        )
    }

    #[test]
    fn end_transitions_once() {
        let mut assignment = active_assignment();
        assert_eq!(assignment.state(), AssignmentState::Active);

        let ended_at = Utc::now();
        assignment.end(ended_at).unwrap();
        assert_eq!(assignment.state(), AssignmentState::Ended);
        assert_eq!(assignment.end_date, Some(ended_at));

        let again = assignment.end(ended_at + Duration::minutes(5));
        assert!(matches!(again, Err(AppError::AlreadyEnded(_))));
        assert_eq!(assignment.end_date, Some(ended_at));
    }

    #[test]
    fn unavailable_is_reported_before_conflicts() {
        let driver = Driver::from_new(new_driver("a@example.com"), Uuid::new_v4(), Utc::now());
        let mut vehicle = Vehicle::from_new(new_vehicle("CAB-1234"), Uuid::new_v4(), Utc::now());
        vehicle.is_available = false;

        match check_can_start(&driver, &vehicle, true, true) {
            Err(AppError::Unavailable { driver_available, vehicle_available, .. }) => {
                assert!(driver_available);
                assert!(!vehicle_available);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn active_assignment_is_a_conflict() {
        let driver = Driver::from_new(new_driver("a@example.com"), Uuid::new_v4(), Utc::now());
        let vehicle = Vehicle::from_new(new_vehicle("CAB-1234"), Uuid::new_v4(), Utc::now());

        assert!(check_can_start(&driver, &vehicle, false, false).is_ok());
        assert!(matches!(check_can_start(&driver, &vehicle, true, false), Err(AppError::Conflict(_))));
        assert!(matches!(check_can_start(&driver, &vehicle, false, true), Err(AppError::Conflict(_))));
    }

    #[test]
    fn policy_parsing() {
        assert_eq!("reserve".parse::<AvailabilityPolicy>().unwrap(), AvailabilityPolicy::Reserve);
        assert_eq!(" Legacy ".parse::<AvailabilityPolicy>().unwrap(), AvailabilityPolicy::Legacy);
        assert!("sometimes".parse::<AvailabilityPolicy>().is_err());
        assert!(!AvailabilityPolicy::default().availability_while_assigned());
        assert!(AvailabilityPolicy::Legacy.availability_while_assigned());
    }

    #[test]
    fn sorts_most_recent_first() {
        let mut older = active_assignment();
        older.start_date = Utc::now() - Duration::days(3);
        let newer = active_assignment();
        let mut list = vec![older.clone(), newer.clone()];
        sort_by_start_desc(&mut list);
        assert_eq!(list[0].id, newer.id);
        assert_eq!(list[1].id, older.id);
    }

    #[test]
    fn populated_view_uses_reference_names() {
        let assignment = active_assignment();
        let view = PopulatedAssignment::new(assignment.clone(), None, None);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["_id"], assignment.id.to_string());
        assert!(json["driver"].is_null());
        assert_eq!(json["driverId"], assignment.driver_id.to_string());
        assert_eq!(json["state"], "ACTIVE");
        assert_eq!(json["isActive"], true);
    }
}

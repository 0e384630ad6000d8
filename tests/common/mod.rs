//! Utilidades compartidas por los tests de integración
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use uuid::Uuid;

use trip_planner::dto::directions_dto::{BaseRoute, DirectionsRequest, RouteBounds, RouteLeg};
use trip_planner::models::eld_log::{EldLogSheet, LogSheetDraft, NewDutyEntry};
use trip_planner::models::planned_stop::{Coordinates, NewPlannedStop, PlannedStop};
use trip_planner::models::trip::{Trip, TripStatus};
use trip_planner::repositories::TripStore;
use trip_planner::services::clock::FixedClock;
use trip_planner::services::directions_service::{DirectionsError, RoutingProvider};
use trip_planner::services::hos_rules::CycleRule;
use trip_planner::utils::errors::{AppError, AppResult};

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
}

pub fn fixed_clock() -> FixedClock {
    FixedClock(now())
}

pub fn sample_trip(cycle_hours: Decimal) -> Trip {
    Trip {
        id: Uuid::new_v4(),
        trip_id: "TRP-0A1B2C3D".to_string(),
        driver_id: Uuid::new_v4(),
        current_location: "Atlanta, GA".to_string(),
        pickup_location: "Birmingham, AL".to_string(),
        dropoff_location: "Nashville, TN".to_string(),
        current_cycle_hours: cycle_hours,
        status: TripStatus::Planned,
        created_at: now(),
        updated_at: now(),
    }
}

/// Ruta de dos tramos con la geometría de la ruta mock
pub fn route(legs: &[(f64, f64)]) -> BaseRoute {
    BaseRoute {
        coordinates: vec![[-84.3880, 33.7490], [-86.8025, 33.5186], [-86.7816, 36.1627]],
        total_distance: legs.iter().map(|l| l.0).sum(),
        total_duration: legs.iter().map(|l| l.1).sum(),
        bounds: RouteBounds {
            ne: Coordinates::new(36.1627, -84.3880),
            sw: Coordinates::new(33.5186, -86.8025),
        },
        legs: legs
            .iter()
            .map(|&(distance, duration)| RouteLeg { distance, duration })
            .collect(),
    }
}

/// Proveedor que devuelve siempre la misma respuesta
pub struct StaticProvider(pub Option<BaseRoute>);

#[async_trait]
impl RoutingProvider for StaticProvider {
    async fn directions(&self, _request: &DirectionsRequest) -> Result<Option<BaseRoute>, DirectionsError> {
        Ok(self.0.clone())
    }
}

/// Proveedor que siempre falla
pub struct FailingProvider;

#[async_trait]
impl RoutingProvider for FailingProvider {
    async fn directions(&self, _request: &DirectionsRequest) -> Result<Option<BaseRoute>, DirectionsError> {
        Err(DirectionsError::Provider {
            status: "OVER_QUERY_LIMIT".to_string(),
            message: "quota exceeded".to_string(),
        })
    }
}

pub struct StoredSheet {
    pub sheet: EldLogSheet,
    pub entries: Vec<NewDutyEntry>,
}

#[derive(Default)]
struct Inner {
    trips: HashMap<String, Trip>,
    stops: HashMap<Uuid, Vec<PlannedStop>>,
    sheets: HashMap<Uuid, Vec<StoredSheet>>,
    status_history: Vec<TripStatus>,
}

/// `TripStore` en memoria con inyección de fallos
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
    cycle: Mutex<CycleRule>,
    pub fail_log_sheets: AtomicBool,
}

impl InMemoryStore {
    pub fn with_trip(trip: Trip) -> Self {
        let store = Self::default();
        store.inner.lock().unwrap().trips.insert(trip.trip_id.clone(), trip);
        store
    }

    pub fn set_cycle(&self, cycle: CycleRule) {
        *self.cycle.lock().unwrap() = cycle;
    }

    pub fn fail_next_log_write(&self) {
        self.fail_log_sheets.store(true, Ordering::SeqCst);
    }

    pub fn trip(&self, trip_id: &str) -> Trip {
        self.inner.lock().unwrap().trips[trip_id].clone()
    }

    pub fn stops(&self, id: Uuid) -> Vec<PlannedStop> {
        self.inner.lock().unwrap().stops.get(&id).cloned().unwrap_or_default()
    }

    pub fn sheet_count(&self, id: Uuid) -> usize {
        self.inner.lock().unwrap().sheets.get(&id).map(|s| s.len()).unwrap_or(0)
    }

    pub fn with_sheets<R>(&self, id: Uuid, f: impl FnOnce(&[StoredSheet]) -> R) -> R {
        let inner = self.inner.lock().unwrap();
        f(inner.sheets.get(&id).map(|s| s.as_slice()).unwrap_or(&[]))
    }

    pub fn status_history(&self) -> Vec<TripStatus> {
        self.inner.lock().unwrap().status_history.clone()
    }
}

#[async_trait]
impl TripStore for InMemoryStore {
    async fn find_trip(&self, trip_id: &str) -> AppResult<Option<Trip>> {
        Ok(self.inner.lock().unwrap().trips.get(trip_id).cloned())
    }

    async fn cycle_rule_for_driver(&self, _driver_id: Uuid) -> AppResult<CycleRule> {
        Ok(*self.cycle.lock().unwrap())
    }

    async fn update_trip_status(&self, id: Uuid, status: TripStatus) -> AppResult<()> {
        let mut inner = self.inner.lock().unwrap();
        for trip in inner.trips.values_mut().filter(|t| t.id == id) {
            trip.status = status;
        }
        inner.status_history.push(status);
        Ok(())
    }

    async fn replace_planned_stops(&self, trip_id: Uuid, stops: &[NewPlannedStop]) -> AppResult<Vec<PlannedStop>> {
        let saved: Vec<PlannedStop> = stops
            .iter()
            .map(|s| PlannedStop {
                id: Uuid::new_v4(),
                trip_id,
                stop_order: s.stop_order,
                stop_type: s.stop_type,
                location: s.location.clone(),
                coordinates: Json(s.coordinates),
                estimated_arrival: s.estimated_arrival,
                estimated_departure: s.estimated_departure,
                duration_minutes: s.duration_minutes,
                reason: s.reason.clone(),
            })
            .collect();

        self.inner.lock().unwrap().stops.insert(trip_id, saved.clone());
        Ok(saved)
    }

    async fn replace_log_sheets(&self, trip: &Trip, sheets: &[LogSheetDraft]) -> AppResult<Vec<EldLogSheet>> {
        if self.fail_log_sheets.swap(false, Ordering::SeqCst) {
            return Err(AppError::Internal("connection reset while writing log sheets".to_string()));
        }

        let stored: Vec<StoredSheet> = sheets
            .iter()
            .map(|draft| StoredSheet {
                sheet: EldLogSheet {
                    id: Uuid::new_v4(),
                    trip_id: trip.id,
                    driver_id: trip.driver_id,
                    log_date: draft.log_date,
                    sheet_number: draft.sheet_number,
                    total_miles: draft.total_miles,
                    vehicle_numbers: draft.vehicle_numbers.clone(),
                    shipping_docs: draft.shipping_docs.clone(),
                    off_duty_hours: draft.totals.off_duty_hours,
                    sleeper_berth_hours: draft.totals.sleeper_berth_hours,
                    driving_hours: draft.totals.driving_hours,
                    on_duty_hours: draft.totals.on_duty_hours,
                    created_at: now(),
                },
                entries: draft.entries.clone(),
            })
            .collect();

        let result = stored.iter().map(|s| s.sheet.clone()).collect();
        self.inner.lock().unwrap().sheets.insert(trip.id, stored);
        Ok(result)
    }
}

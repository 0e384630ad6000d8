//! DTOs de trips
//!
//! Request de creación validado con `validator` y las respuestas de detalle
//! (driver, paradas y hojas ELD con sus entradas).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::dto::driver_dto::DriverResponse;
use crate::models::eld_log::{DutyStatus, DutyStatusEntry, EldLogSheet};
use crate::models::planned_stop::{Coordinates, PlannedStop, StopType};
use crate::models::trip::{Trip, TripStatus};
use crate::utils::validation::{validate_cycle_hours, validate_distinct_locations};

/// Request para crear un trip
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_trip_locations"))]
pub struct CreateTripRequest {
    /// id interno (uuid) del driver
    pub driver: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub current_location: String,
    #[validate(length(min = 1, max = 255))]
    pub pickup_location: String,
    #[validate(length(min = 1, max = 255))]
    pub dropoff_location: String,
    #[validate(custom = "validate_cycle_hours")]
    pub current_cycle_hours: Decimal,
}

fn validate_trip_locations(request: &CreateTripRequest) -> Result<(), ValidationError> {
    validate_distinct_locations(&[
        &request.current_location,
        &request.pickup_location,
        &request.dropoff_location,
    ])
}

/// Trip en listados
#[derive(Debug, Serialize)]
pub struct TripResponse {
    pub id: Uuid,
    pub trip_id: String,
    pub driver: Uuid,
    pub current_location: String,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub current_cycle_hours: Decimal,
    pub status: TripStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Trip> for TripResponse {
    fn from(trip: Trip) -> Self {
        Self {
            id: trip.id,
            trip_id: trip.trip_id,
            driver: trip.driver_id,
            current_location: trip.current_location,
            pickup_location: trip.pickup_location,
            dropoff_location: trip.dropoff_location,
            current_cycle_hours: trip.current_cycle_hours,
            status: trip.status,
            created_at: trip.created_at,
            updated_at: trip.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlannedStopResponse {
    pub id: Uuid,
    pub stop_order: i32,
    pub stop_type: StopType,
    pub stop_type_display: &'static str,
    pub location: String,
    pub coordinates: Coordinates,
    pub estimated_arrival: DateTime<Utc>,
    pub estimated_departure: DateTime<Utc>,
    pub duration_minutes: i32,
    pub reason: String,
}

impl From<PlannedStop> for PlannedStopResponse {
    fn from(stop: PlannedStop) -> Self {
        Self {
            id: stop.id,
            stop_order: stop.stop_order,
            stop_type_display: stop.stop_type.display_name(),
            stop_type: stop.stop_type,
            location: stop.location,
            coordinates: stop.coordinates.0,
            estimated_arrival: stop.estimated_arrival,
            estimated_departure: stop.estimated_departure,
            duration_minutes: stop.duration_minutes,
            reason: stop.reason,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DutyEntryResponse {
    pub id: Uuid,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duty_status: DutyStatus,
    pub duty_status_display: &'static str,
    pub location: String,
    pub remarks: String,
    pub entry_order: i32,
}

impl From<DutyStatusEntry> for DutyEntryResponse {
    fn from(entry: DutyStatusEntry) -> Self {
        Self {
            id: entry.id,
            start_time: entry.start_time,
            end_time: entry.end_time,
            duty_status_display: entry.duty_status.display_name(),
            duty_status: entry.duty_status,
            location: entry.location,
            remarks: entry.remarks,
            entry_order: entry.entry_order,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LogSheetResponse {
    pub id: Uuid,
    pub log_date: NaiveDate,
    pub sheet_number: i32,
    pub total_miles: Decimal,
    pub vehicle_numbers: String,
    pub shipping_docs: String,
    pub off_duty_hours: Decimal,
    pub sleeper_berth_hours: Decimal,
    pub driving_hours: Decimal,
    pub on_duty_hours: Decimal,
    pub duty_entries: Vec<DutyEntryResponse>,
    pub driver_name: String,
    pub created_at: DateTime<Utc>,
}

impl LogSheetResponse {
    pub fn new(sheet: EldLogSheet, entries: Vec<DutyStatusEntry>, driver_name: &str) -> Self {
        Self {
            id: sheet.id,
            log_date: sheet.log_date,
            sheet_number: sheet.sheet_number,
            total_miles: sheet.total_miles,
            vehicle_numbers: sheet.vehicle_numbers,
            shipping_docs: sheet.shipping_docs,
            off_duty_hours: sheet.off_duty_hours,
            sleeper_berth_hours: sheet.sleeper_berth_hours,
            driving_hours: sheet.driving_hours,
            on_duty_hours: sheet.on_duty_hours,
            duty_entries: entries.into_iter().map(DutyEntryResponse::from).collect(),
            driver_name: driver_name.to_string(),
            created_at: sheet.created_at,
        }
    }
}

/// Detalle completo de un trip
#[derive(Debug, Serialize)]
pub struct TripDetailResponse {
    pub id: Uuid,
    pub trip_id: String,
    pub driver: DriverResponse,
    pub current_location: String,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub current_cycle_hours: Decimal,
    pub status: TripStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub planned_stops: Vec<PlannedStopResponse>,
    pub log_sheets: Vec<LogSheetResponse>,
}

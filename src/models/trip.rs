//! Modelo de Trip
//!
//! Un viaje planificado: ubicaciones, horas de ciclo usadas y estado.
//! Mapea exactamente a la tabla trips con el ENUM trip_status.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use rust_decimal::Decimal;

/// Estado del trip - mapea al ENUM trip_status
///
/// `InProgress` y `Completed` están declarados pero ningún flujo actual
/// los alcanza.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "trip_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Planned,
    Calculating,
    Calculated,
    InProgress,
    Completed,
    Error,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Planned => "planned",
            TripStatus::Calculating => "calculating",
            TripStatus::Calculated => "calculated",
            TripStatus::InProgress => "in_progress",
            TripStatus::Completed => "completed",
            TripStatus::Error => "error",
        }
    }
}

/// Trip principal - mapea exactamente a la tabla trips
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: Uuid,
    pub trip_id: String,
    pub driver_id: Uuid,
    pub current_location: String,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub current_cycle_hours: Decimal,
    pub status: TripStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Trip {
    /// El pickup cuenta como parada propia solo si difiere de la ubicación actual
    pub fn has_distinct_pickup(&self) -> bool {
        self.pickup_location != self.current_location
    }
}

/// Genera un identificador legible `TRP-XXXXXXXX`
pub fn generate_trip_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("TRP-{}", hex[..8].to_uppercase())
}

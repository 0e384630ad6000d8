//! Modelo de PlannedStop
//!
//! Paradas planificadas a lo largo de la ruta (combustible, descanso,
//! pickup, entrega, sleeper). El conjunto de paradas de un trip se reemplaza
//! completo en cada cálculo de ruta.

use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, Type};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::utils::errors::{AppError, AppResult};

/// Tipo de parada - mapea al ENUM stop_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "stop_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StopType {
    Fuel,
    Rest,
    Pickup,
    Delivery,
    Sleeper,
}

impl StopType {
    pub fn display_name(&self) -> &'static str {
        match self {
            StopType::Fuel => "Fuel Stop",
            StopType::Rest => "Mandatory Rest Break",
            StopType::Pickup => "Pickup Location",
            StopType::Delivery => "Delivery Location",
            StopType::Sleeper => "Sleeper Berth Period",
        }
    }
}

/// Par lat/lng tal como se guarda en la columna JSONB `coordinates`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// PlannedStop principal - mapea exactamente a la tabla planned_stops
#[derive(Debug, Clone, FromRow)]
pub struct PlannedStop {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub stop_order: i32,
    pub stop_type: StopType,
    pub location: String,
    pub coordinates: Json<Coordinates>,
    pub estimated_arrival: DateTime<Utc>,
    pub estimated_departure: DateTime<Utc>,
    pub duration_minutes: i32,
    pub reason: String,
}

/// Parada calculada, todavía sin persistir
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPlannedStop {
    pub stop_order: i32,
    pub stop_type: StopType,
    pub location: String,
    pub coordinates: Coordinates,
    pub estimated_arrival: DateTime<Utc>,
    pub estimated_departure: DateTime<Utc>,
    pub duration_minutes: i32,
    pub reason: String,
}

/// `stop_order` debe ser 1, 2, 3... sin huecos ni repetidos
pub fn ensure_dense_stop_order(stops: &[NewPlannedStop]) -> AppResult<()> {
    for (index, stop) in stops.iter().enumerate() {
        let expected = index as i32 + 1;
        if stop.stop_order != expected {
            return Err(AppError::Internal(format!(
                "Planned stop order is not dense: expected {} but found {} ({:?})",
                expected, stop.stop_order, stop.stop_type
            )));
        }
    }
    Ok(())
}

//! Reglas HOS (Hours of Service) de la FMCSA
//!
//! Constantes de límites de conducción y la regla de ciclo del carrier.

use serde::{Deserialize, Serialize};

/// Máximo de conducción por turno
pub const MAX_DRIVING_MINUTES_PER_SHIFT: i64 = 11 * 60;
/// Ventana de servicio desde el inicio del turno
pub const ON_DUTY_WINDOW_MINUTES: i64 = 14 * 60;
/// Conducción acumulada que obliga a una pausa de 30 minutos
pub const DRIVING_BEFORE_BREAK_MINUTES: i64 = 8 * 60;
pub const BREAK_MINUTES: i64 = 30;
/// Descanso que reinicia el turno
pub const SHIFT_RESET_MINUTES: i64 = 10 * 60;
/// Descanso que reinicia el ciclo
pub const CYCLE_RESTART_MINUTES: i64 = 34 * 60;
/// Horas on-duty no conducidas que se asumen en la verificación simple
pub const ASSUMED_ON_DUTY_HOURS: f64 = 3.0;

pub const FUEL_INTERVAL_MILES: f64 = 1000.0;
pub const FUEL_STOP_MINUTES: i64 = 30;
pub const PICKUP_MINUTES: i64 = 60;
pub const DELIVERY_MINUTES: i64 = 60;
pub const PRE_TRIP_INSPECTION_MINUTES: i64 = 60;

/// Regla de ciclo: 70h en 8 días o 60h en 7 días
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CycleRule {
    #[default]
    SeventyEightDay,
    SixtySevenDay,
}

impl CycleRule {
    pub fn from_operates_every_day(operates_every_day: bool) -> Self {
        if operates_every_day {
            CycleRule::SeventyEightDay
        } else {
            CycleRule::SixtySevenDay
        }
    }

    pub fn limit_hours(&self) -> f64 {
        match self {
            CycleRule::SeventyEightDay => 70.0,
            CycleRule::SixtySevenDay => 60.0,
        }
    }

    pub fn limit_minutes(&self) -> i64 {
        (self.limit_hours() * 60.0) as i64
    }

    pub fn label(&self) -> &'static str {
        match self {
            CycleRule::SeventyEightDay => "70-hour/8-day",
            CycleRule::SixtySevenDay => "60-hour/7-day",
        }
    }
}

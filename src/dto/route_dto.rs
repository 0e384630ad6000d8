//! DTOs del cálculo de ruta
//!
//! Resumen de ruta (`RouteSummary`) que devuelve `calculate_route`,
//! veredicto de cumplimiento HOS y línea de tiempo de servicio simulada.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dto::directions_dto::RouteBounds;
use crate::models::eld_log::DutyStatus;
use crate::models::planned_stop::NewPlannedStop;

/// Veredicto de cumplimiento HOS
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ComplianceStatus {
    pub is_compliant: bool,
    pub violations: Vec<String>,
    pub warnings: Vec<String>,
}

impl ComplianceStatus {
    pub fn compliant() -> Self {
        Self {
            is_compliant: true,
            violations: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_violation(&mut self, message: impl Into<String>) {
        self.is_compliant = false;
        self.violations.push(message.into());
    }
}

/// Intervalo continuo de un mismo estado de servicio, en tiempo absoluto
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DutySegment {
    pub duty_status: DutyStatus,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: String,
    pub remarks: String,
    /// millas recorridas dentro del segmento (solo conducción)
    pub miles: f64,
}

/// Resumen de la ruta calculada
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSummary {
    pub trip_id: String,
    pub route_coordinates: Vec<[f64; 2]>,
    pub planned_stops: Vec<NewPlannedStop>,
    pub total_distance: f64,
    /// minutos de conducción
    pub driving_time: f64,
    /// conducción + duración de todas las paradas, en minutos
    pub total_trip_time: f64,
    pub bounds: RouteBounds,
    pub compliance_status: ComplianceStatus,
    /// Solo en modo simulado
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duty_timeline: Option<Vec<DutySegment>>,
}

/// Respuesta de POST /api/trips/:trip_id/calculate_route
#[derive(Debug, Serialize)]
pub struct CalculateRouteResponse {
    pub success: bool,
    pub message: String,
    pub route_data: RouteSummary,
    pub log_sheets_generated: usize,
}

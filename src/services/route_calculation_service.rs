//! Servicio de cálculo de ruta
//!
//! Obtiene la ruta base (proveedor de mapas o ruta mock), deriva las paradas
//! obligatorias y emite el veredicto de cumplimiento HOS.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::dto::directions_dto::{BaseRoute, DirectionsRequest, RouteBounds, RouteLeg};
use crate::dto::route_dto::{ComplianceStatus, DutySegment, RouteSummary};
use crate::models::planned_stop::{Coordinates, NewPlannedStop, StopType};
use crate::models::trip::Trip;
use crate::services::clock::Clock;
use crate::services::directions_service::RoutingProvider;
use crate::services::hos_rules::*;
use crate::services::hos_simulator::HosSimulator;
use crate::utils::errors::{AppError, AppResult};

/// Modo de planificación de paradas y hojas de registro
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanningMode {
    /// Reglas fijas: una hoja de un día con cinco entradas
    #[default]
    Fixed,
    /// Simulación HOS hacia adelante, hojas de varios días
    Simulated,
}

impl FromStr for PlanningMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "fixed" => Ok(PlanningMode::Fixed),
            "simulated" => Ok(PlanningMode::Simulated),
            other => Err(format!("unknown route planning mode '{}'", other)),
        }
    }
}

pub struct RouteCalculationService<'a> {
    provider: &'a dyn RoutingProvider,
    clock: &'a dyn Clock,
    cycle: CycleRule,
    mode: PlanningMode,
}

impl<'a> RouteCalculationService<'a> {
    pub fn new(provider: &'a dyn RoutingProvider, clock: &'a dyn Clock) -> Self {
        Self {
            provider,
            clock,
            cycle: CycleRule::default(),
            mode: PlanningMode::default(),
        }
    }

    pub fn with_cycle(mut self, cycle: CycleRule) -> Self {
        self.cycle = cycle;
        self
    }

    pub fn with_mode(mut self, mode: PlanningMode) -> Self {
        self.mode = mode;
        self
    }

    /// Calcula la ruta optimizada con paradas obligatorias y cumplimiento
    pub async fn calculate_optimized_route(&self, trip: &Trip) -> AppResult<RouteSummary> {
        log::info!("🧭 Calculando ruta para trip {} (modo {:?})", trip.trip_id, self.mode);

        let now = self.clock.now();
        let base_route = self.get_base_route(trip, now).await;

        let summary = match self.mode {
            PlanningMode::Fixed => {
                let planned_stops = self.calculate_required_stops(trip, &base_route, now);
                let compliance_status = self.check_compliance(trip, &base_route)?;
                build_summary(trip, base_route, planned_stops, compliance_status, None)
            }
            PlanningMode::Simulated => {
                let outcome = HosSimulator::new(self.cycle, &trip.current_cycle_hours)?.simulate(trip, &base_route, now)?;
                let mut compliance_status = ComplianceStatus::compliant();
                compliance_status.warnings = outcome.warnings;
                build_summary(trip, base_route, outcome.stops, compliance_status, Some(outcome.timeline))
            }
        };

        log::info!(
            "✅ Ruta calculada para trip {}: {} millas, {} paradas, cumple: {}",
            trip.trip_id,
            summary.total_distance,
            summary.planned_stops.len(),
            summary.compliance_status.is_compliant
        );
        Ok(summary)
    }

    /// Ruta del proveedor de mapas; cualquier fallo cae a la ruta mock
    pub async fn get_base_route(&self, trip: &Trip, now: DateTime<Utc>) -> BaseRoute {
        let mut waypoints = Vec::new();
        if trip.has_distinct_pickup() {
            waypoints.push(trip.pickup_location.clone());
        }

        let request = DirectionsRequest {
            origin: trip.current_location.clone(),
            destination: trip.dropoff_location.clone(),
            waypoints,
            avoid_tolls: true,
            optimize_waypoints: true,
            departure_time: now,
        };

        match self.provider.directions(&request).await {
            Ok(Some(route)) => route,
            Ok(None) => {
                log::warn!("⚠️ Sin ruta del proveedor para trip {}, usando ruta mock", trip.trip_id);
                mock_route_data(trip)
            }
            Err(e) => {
                log::warn!("⚠️ Proveedor de mapas no disponible para trip {} ({}), usando ruta mock", trip.trip_id, e);
                mock_route_data(trip)
            }
        }
    }

    /// Paradas de las reglas fijas, en orden pickup, fuel, rest, delivery
    pub fn calculate_required_stops(&self, trip: &Trip, route: &BaseRoute, now: DateTime<Utc>) -> Vec<NewPlannedStop> {
        let mut stops = Vec::new();
        let at = |minutes: i64| now + Duration::minutes(minutes);

        if trip.has_distinct_pickup() {
            stops.push(NewPlannedStop {
                stop_order: stops.len() as i32 + 1,
                stop_type: StopType::Pickup,
                location: trip.pickup_location.clone(),
                coordinates: Coordinates::new(33.5186, -86.8025),
                estimated_arrival: at(120),
                estimated_departure: at(180),
                duration_minutes: PICKUP_MINUTES as i32,
                reason: "1 hour for pickup activities".to_string(),
            });
        }

        if route.total_distance > FUEL_INTERVAL_MILES {
            stops.push(NewPlannedStop {
                stop_order: stops.len() as i32 + 1,
                stop_type: StopType::Fuel,
                location: "Fuel Station - Mile 500".to_string(),
                coordinates: Coordinates::new(34.0, -85.5),
                estimated_arrival: at(240),
                estimated_departure: at(270),
                duration_minutes: FUEL_STOP_MINUTES as i32,
                reason: "Fuel stop required - 1000 mile limit".to_string(),
            });
        }

        if route.total_duration >= DRIVING_BEFORE_BREAK_MINUTES as f64 {
            stops.push(NewPlannedStop {
                stop_order: stops.len() as i32 + 1,
                stop_type: StopType::Rest,
                location: "Rest Area - Highway Rest Stop".to_string(),
                coordinates: Coordinates::new(35.0, -86.0),
                estimated_arrival: at(360),
                estimated_departure: at(390),
                duration_minutes: BREAK_MINUTES as i32,
                reason: "30-minute break required after 8 hours driving".to_string(),
            });
        }

        stops.push(NewPlannedStop {
            stop_order: stops.len() as i32 + 1,
            stop_type: StopType::Delivery,
            location: trip.dropoff_location.clone(),
            coordinates: Coordinates::new(36.1627, -86.7816),
            estimated_arrival: at(480),
            estimated_departure: at(540),
            duration_minutes: DELIVERY_MINUTES as i32,
            reason: "1 hour for delivery activities".to_string(),
        });

        stops
    }

    /// Límite de 11 horas de conducción y proyección del ciclo del carrier
    pub fn check_compliance(&self, trip: &Trip, route: &BaseRoute) -> AppResult<ComplianceStatus> {
        let mut status = ComplianceStatus::compliant();
        let driving_hours = route.total_duration / 60.0;

        if driving_hours > MAX_DRIVING_MINUTES_PER_SHIFT as f64 / 60.0 {
            status.add_violation("Driving time exceeds 11-hour limit");
        }

        let cycle_hours = trip.current_cycle_hours.to_f64().ok_or_else(|| {
            AppError::Internal(format!("cycle hours {} not representable", trip.current_cycle_hours))
        })?;
        if cycle_hours + driving_hours + ASSUMED_ON_DUTY_HOURS > self.cycle.limit_hours() {
            status.add_violation(format!("Trip would exceed {} cycle limit", self.cycle.label()));
        }

        Ok(status)
    }
}

fn build_summary(
    trip: &Trip,
    route: BaseRoute,
    planned_stops: Vec<NewPlannedStop>,
    compliance_status: ComplianceStatus,
    duty_timeline: Option<Vec<DutySegment>>,
) -> RouteSummary {
    let stop_minutes: f64 = planned_stops.iter().map(|s| s.duration_minutes as f64).sum();

    RouteSummary {
        trip_id: trip.trip_id.clone(),
        total_trip_time: route.total_duration + stop_minutes,
        driving_time: route.total_duration,
        total_distance: route.total_distance,
        route_coordinates: route.coordinates,
        bounds: route.bounds,
        planned_stops,
        compliance_status,
        duty_timeline,
    }
}

/// Ruta fija Atlanta → Birmingham → Nashville usada cuando no hay proveedor
pub fn mock_route_data(trip: &Trip) -> BaseRoute {
    let legs = if trip.has_distinct_pickup() {
        vec![
            RouteLeg { distance: 146.5, duration: 150.0 },
            RouteLeg { distance: 339.0, duration: 330.0 },
        ]
    } else {
        vec![RouteLeg { distance: 485.5, duration: 480.0 }]
    };

    BaseRoute {
        coordinates: vec![[-84.3880, 33.7490], [-86.8025, 33.5186], [-86.7816, 36.1627]],
        total_distance: 485.5,
        total_duration: 480.0,
        bounds: RouteBounds {
            ne: Coordinates::new(36.1627, -84.3880),
            sw: Coordinates::new(33.5186, -86.8025),
        },
        legs,
    }
}

//! Orquestación de calculate_route
//!
//! `planned → calculating → calculated`; cualquier fallo deja el trip en
//! `error` y se devuelve como `AppError::CalculationFailed`.

use crate::dto::route_dto::CalculateRouteResponse;
use crate::models::planned_stop::ensure_dense_stop_order;
use crate::models::trip::{Trip, TripStatus};
use crate::repositories::trip_repository::TripStore;
use crate::services::clock::Clock;
use crate::services::directions_service::RoutingProvider;
use crate::services::eld_log_service::{EldLogGenerationService, LogSheetDefaults};
use crate::services::route_calculation_service::{PlanningMode, RouteCalculationService};
use crate::utils::errors::{not_found_error, AppError, AppResult};

/// Ajustes de planificación que vienen de la configuración
#[derive(Debug, Clone, Default)]
pub struct PlanningSettings {
    pub mode: PlanningMode,
    pub log_defaults: LogSheetDefaults,
}

pub struct TripPlanningService<'a> {
    store: &'a dyn TripStore,
    provider: &'a dyn RoutingProvider,
    clock: &'a dyn Clock,
    settings: &'a PlanningSettings,
}

impl<'a> TripPlanningService<'a> {
    pub fn new(
        store: &'a dyn TripStore,
        provider: &'a dyn RoutingProvider,
        clock: &'a dyn Clock,
        settings: &'a PlanningSettings,
    ) -> Self {
        Self {
            store,
            provider,
            clock,
            settings,
        }
    }

    /// Ejecuta el cálculo completo para un trip por su `trip_id` legible
    pub async fn calculate_route(&self, trip_id: &str) -> AppResult<CalculateRouteResponse> {
        let trip = self
            .store
            .find_trip(trip_id)
            .await?
            .ok_or_else(|| not_found_error("Trip", trip_id))?;

        match self.run(&trip).await {
            Ok(response) => Ok(response),
            Err(e) => {
                log::error!("❌ Error calculando ruta para trip {}: {}", trip.trip_id, e);
                if let Err(status_error) = self.store.update_trip_status(trip.id, TripStatus::Error).await {
                    log::error!(
                        "❌ No se pudo marcar el trip {} como error: {}",
                        trip.trip_id,
                        status_error
                    );
                }
                Err(AppError::CalculationFailed(e.to_string()))
            }
        }
    }

    async fn run(&self, trip: &Trip) -> AppResult<CalculateRouteResponse> {
        self.store.update_trip_status(trip.id, TripStatus::Calculating).await?;

        let cycle = self.store.cycle_rule_for_driver(trip.driver_id).await?;
        let summary = RouteCalculationService::new(self.provider, self.clock)
            .with_cycle(cycle)
            .with_mode(self.settings.mode)
            .calculate_optimized_route(trip)
            .await?;

        ensure_dense_stop_order(&summary.planned_stops)?;
        let stops = self.store.replace_planned_stops(trip.id, &summary.planned_stops).await?;
        log::info!("📍 {} paradas guardadas para trip {}", stops.len(), trip.trip_id);

        let sheets = EldLogGenerationService::new(self.store, self.clock, &self.settings.log_defaults)
            .generate_log_sheets(trip, &summary)
            .await?;

        self.store.update_trip_status(trip.id, TripStatus::Calculated).await?;

        Ok(CalculateRouteResponse {
            success: true,
            message: "Route calculated successfully".to_string(),
            route_data: summary,
            log_sheets_generated: sheets.len(),
        })
    }
}

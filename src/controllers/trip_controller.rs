use std::collections::HashMap;

use crate::dto::driver_dto::DriverResponse;
use crate::dto::route_dto::CalculateRouteResponse;
use crate::dto::trip_dto::{
    CreateTripRequest, LogSheetResponse, PlannedStopResponse, TripDetailResponse, TripResponse,
};
use crate::models::eld_log::DutyStatusEntry;
use crate::models::trip::Trip;
use crate::repositories::driver_repository::DriverRepository;
use crate::repositories::trip_repository::TripRepository;
use crate::services::clock::Clock;
use crate::services::directions_service::RoutingProvider;
use crate::services::trip_planning_service::{PlanningSettings, TripPlanningService};
use crate::utils::errors::{not_found_error, validation_error, AppResult};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct TripController {
    repository: TripRepository,
    drivers: DriverRepository,
}

impl TripController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: TripRepository::new(pool.clone()),
            drivers: DriverRepository::new(pool),
        }
    }

    pub async fn create(&self, request: CreateTripRequest) -> AppResult<TripDetailResponse> {
        // Nada se persiste si la validación falla
        request.validate()?;

        if self.drivers.find_by_id(request.driver).await?.is_none() {
            return Err(validation_error("driver", "Driver does not exist"));
        }

        log::info!(
            "🆕 Creando trip para driver {} desde {}",
            request.driver,
            request.current_location
        );
        let trip = self
            .repository
            .create(
                request.driver,
                request.current_location.trim(),
                request.pickup_location.trim(),
                request.dropoff_location.trim(),
                request.current_cycle_hours,
            )
            .await?;

        log::info!("✅ Trip creado: {}", trip.trip_id);
        self.detail_for(trip).await
    }

    pub async fn list(&self) -> AppResult<Vec<TripResponse>> {
        let trips = self.repository.list().await?;
        Ok(trips.into_iter().map(TripResponse::from).collect())
    }

    pub async fn get_detail(&self, trip_id: &str) -> AppResult<TripDetailResponse> {
        let trip = self
            .repository
            .find_by_trip_id(trip_id)
            .await?
            .ok_or_else(|| not_found_error("Trip", trip_id))?;

        self.detail_for(trip).await
    }

    pub async fn delete(&self, trip_id: &str) -> AppResult<()> {
        if !self.repository.delete(trip_id).await? {
            return Err(not_found_error("Trip", trip_id));
        }

        log::info!("🗑️ Trip eliminado: {}", trip_id);
        Ok(())
    }

    pub async fn calculate_route(
        &self,
        trip_id: &str,
        provider: &dyn RoutingProvider,
        clock: &dyn Clock,
        settings: &PlanningSettings,
    ) -> AppResult<CalculateRouteResponse> {
        TripPlanningService::new(&self.repository, provider, clock, settings)
            .calculate_route(trip_id)
            .await
    }

    async fn detail_for(&self, trip: Trip) -> AppResult<TripDetailResponse> {
        let driver = self
            .drivers
            .find_by_id(trip.driver_id)
            .await?
            .ok_or_else(|| not_found_error("Driver", &trip.driver_id.to_string()))?;

        let stops = self.repository.planned_stops(trip.id).await?;
        let sheets = self.repository.log_sheets(trip.id).await?;

        let sheet_ids: Vec<Uuid> = sheets.iter().map(|s| s.id).collect();
        let mut entries_by_sheet: HashMap<Uuid, Vec<DutyStatusEntry>> = HashMap::new();
        for entry in self.repository.duty_entries(&sheet_ids).await? {
            entries_by_sheet.entry(entry.log_sheet_id).or_default().push(entry);
        }

        let log_sheets = sheets
            .into_iter()
            .map(|sheet| {
                let entries = entries_by_sheet.remove(&sheet.id).unwrap_or_default();
                LogSheetResponse::new(sheet, entries, &driver.name)
            })
            .collect();

        Ok(TripDetailResponse {
            id: trip.id,
            trip_id: trip.trip_id,
            driver: DriverResponse::from(driver),
            current_location: trip.current_location,
            pickup_location: trip.pickup_location,
            dropoff_location: trip.dropoff_location,
            current_cycle_hours: trip.current_cycle_hours,
            status: trip.status,
            created_at: trip.created_at,
            updated_at: trip.updated_at,
            planned_stops: stops.into_iter().map(PlannedStopResponse::from).collect(),
            log_sheets,
        })
    }
}

//! Repositorio de trips
//!
//! `TripStore` es la interfaz de persistencia que usan los servicios de
//! planificación; `TripRepository` la implementa sobre PostgreSQL y añade el
//! CRUD y las consultas de detalle que usan los controladores.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::eld_log::{DutyStatusEntry, EldLogSheet, LogSheetDraft};
use crate::models::planned_stop::{NewPlannedStop, PlannedStop};
use crate::models::trip::{generate_trip_id, Trip, TripStatus};
use crate::services::hos_rules::CycleRule;
use crate::utils::errors::{not_found_error, AppResult};

/// Persistencia que necesita el flujo calculate_route
#[async_trait]
pub trait TripStore: Send + Sync {
    async fn find_trip(&self, trip_id: &str) -> AppResult<Option<Trip>>;

    /// Regla de ciclo del carrier del driver
    async fn cycle_rule_for_driver(&self, driver_id: Uuid) -> AppResult<CycleRule>;

    async fn update_trip_status(&self, id: Uuid, status: TripStatus) -> AppResult<()>;

    /// Borra las paradas previas e inserta las nuevas en una transacción
    async fn replace_planned_stops(&self, trip_id: Uuid, stops: &[NewPlannedStop]) -> AppResult<Vec<PlannedStop>>;

    /// Borra las hojas previas (y sus entradas) e inserta las nuevas en una transacción
    async fn replace_log_sheets(&self, trip: &Trip, sheets: &[LogSheetDraft]) -> AppResult<Vec<EldLogSheet>>;
}

pub struct TripRepository {
    pool: PgPool,
}

impl TripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        driver_id: Uuid,
        current_location: &str,
        pickup_location: &str,
        dropoff_location: &str,
        current_cycle_hours: Decimal,
    ) -> AppResult<Trip> {
        let now = Utc::now();
        let trip = sqlx::query_as::<_, Trip>(
            r#"
            INSERT INTO trips (id, trip_id, driver_id, current_location, pickup_location, dropoff_location,
                               current_cycle_hours, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(generate_trip_id())
        .bind(driver_id)
        .bind(current_location)
        .bind(pickup_location)
        .bind(dropoff_location)
        .bind(current_cycle_hours)
        .bind(TripStatus::Planned)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(trip)
    }

    pub async fn list(&self) -> AppResult<Vec<Trip>> {
        let trips = sqlx::query_as::<_, Trip>("SELECT * FROM trips ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(trips)
    }

    pub async fn find_by_trip_id(&self, trip_id: &str) -> AppResult<Option<Trip>> {
        let trip = sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE trip_id = $1")
            .bind(trip_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(trip)
    }

    /// Elimina el trip; paradas y hojas caen por ON DELETE CASCADE
    pub async fn delete(&self, trip_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM trips WHERE trip_id = $1")
            .bind(trip_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn planned_stops(&self, trip_id: Uuid) -> AppResult<Vec<PlannedStop>> {
        let stops = sqlx::query_as::<_, PlannedStop>(
            "SELECT * FROM planned_stops WHERE trip_id = $1 ORDER BY stop_order",
        )
        .bind(trip_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(stops)
    }

    pub async fn log_sheets(&self, trip_id: Uuid) -> AppResult<Vec<EldLogSheet>> {
        let sheets = sqlx::query_as::<_, EldLogSheet>(
            "SELECT * FROM eld_log_sheets WHERE trip_id = $1 ORDER BY log_date, sheet_number",
        )
        .bind(trip_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sheets)
    }

    pub async fn duty_entries(&self, log_sheet_ids: &[Uuid]) -> AppResult<Vec<DutyStatusEntry>> {
        let entries = sqlx::query_as::<_, DutyStatusEntry>(
            "SELECT * FROM duty_status_entries WHERE log_sheet_id = ANY($1) ORDER BY log_sheet_id, entry_order",
        )
        .bind(log_sheet_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

/// Bloquea la fila del trip hasta el fin de la transacción; serializa
/// cálculos concurrentes del mismo trip en cada reemplazo
async fn lock_trip(tx: &mut Transaction<'_, Postgres>, trip_id: Uuid) -> AppResult<()> {
    let locked: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM trips WHERE id = $1 FOR UPDATE")
        .bind(trip_id)
        .fetch_optional(&mut **tx)
        .await?;

    match locked {
        Some(_) => Ok(()),
        None => Err(not_found_error("Trip", &trip_id.to_string())),
    }
}

#[async_trait]
impl TripStore for TripRepository {
    async fn find_trip(&self, trip_id: &str) -> AppResult<Option<Trip>> {
        self.find_by_trip_id(trip_id).await
    }

    async fn cycle_rule_for_driver(&self, driver_id: Uuid) -> AppResult<CycleRule> {
        let row: Option<(bool,)> = sqlx::query_as(
            r#"
            SELECT c.operates_every_day
            FROM drivers d
            JOIN carriers c ON c.id = d.carrier_id
            WHERE d.id = $1
            "#,
        )
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await?;

        let (operates_every_day,) = row.ok_or_else(|| not_found_error("Driver", &driver_id.to_string()))?;
        Ok(CycleRule::from_operates_every_day(operates_every_day))
    }

    async fn update_trip_status(&self, id: Uuid, status: TripStatus) -> AppResult<()> {
        sqlx::query("UPDATE trips SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(status)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        log::debug!("Trip {} → {}", id, status.as_str());
        Ok(())
    }

    async fn replace_planned_stops(&self, trip_id: Uuid, stops: &[NewPlannedStop]) -> AppResult<Vec<PlannedStop>> {
        let mut tx = self.pool.begin().await?;
        lock_trip(&mut tx, trip_id).await?;

        sqlx::query("DELETE FROM planned_stops WHERE trip_id = $1")
            .bind(trip_id)
            .execute(&mut *tx)
            .await?;

        let mut saved = Vec::with_capacity(stops.len());
        for stop in stops {
            let row = sqlx::query_as::<_, PlannedStop>(
                r#"
                INSERT INTO planned_stops (id, trip_id, stop_order, stop_type, location, coordinates,
                                           estimated_arrival, estimated_departure, duration_minutes, reason)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(trip_id)
            .bind(stop.stop_order)
            .bind(stop.stop_type)
            .bind(&stop.location)
            .bind(Json(stop.coordinates))
            .bind(stop.estimated_arrival)
            .bind(stop.estimated_departure)
            .bind(stop.duration_minutes)
            .bind(&stop.reason)
            .fetch_one(&mut *tx)
            .await?;
            saved.push(row);
        }

        tx.commit().await?;
        Ok(saved)
    }

    async fn replace_log_sheets(&self, trip: &Trip, sheets: &[LogSheetDraft]) -> AppResult<Vec<EldLogSheet>> {
        let mut tx = self.pool.begin().await?;
        lock_trip(&mut tx, trip.id).await?;

        sqlx::query("DELETE FROM eld_log_sheets WHERE trip_id = $1")
            .bind(trip.id)
            .execute(&mut *tx)
            .await?;

        let mut saved = Vec::with_capacity(sheets.len());
        for draft in sheets {
            let sheet = sqlx::query_as::<_, EldLogSheet>(
                r#"
                INSERT INTO eld_log_sheets (id, trip_id, driver_id, log_date, sheet_number, total_miles,
                                            vehicle_numbers, shipping_docs, off_duty_hours, sleeper_berth_hours,
                                            driving_hours, on_duty_hours, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(trip.id)
            .bind(trip.driver_id)
            .bind(draft.log_date)
            .bind(draft.sheet_number)
            .bind(draft.total_miles)
            .bind(&draft.vehicle_numbers)
            .bind(&draft.shipping_docs)
            .bind(draft.totals.off_duty_hours)
            .bind(draft.totals.sleeper_berth_hours)
            .bind(draft.totals.driving_hours)
            .bind(draft.totals.on_duty_hours)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;

            for entry in &draft.entries {
                sqlx::query(
                    r#"
                    INSERT INTO duty_status_entries (id, log_sheet_id, start_time, end_time, duty_status,
                                                     location, remarks, entry_order)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(sheet.id)
                .bind(entry.start_time)
                .bind(entry.end_time)
                .bind(entry.duty_status)
                .bind(&entry.location)
                .bind(&entry.remarks)
                .bind(entry.entry_order)
                .execute(&mut *tx)
                .await?;
            }

            saved.push(sheet);
        }

        tx.commit().await?;
        Ok(saved)
    }
}

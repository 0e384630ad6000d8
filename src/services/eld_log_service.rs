//! Servicio de generación de hojas ELD
//!
//! Sintetiza la línea de tiempo de estados de servicio de un trip a partir
//! del resumen de ruta y la persiste como hojas diarias con sus entradas.
//! Las hojas anteriores del trip se reemplazan en la misma transacción.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::dto::route_dto::{DutySegment, RouteSummary};
use crate::models::eld_log::*;
use crate::models::trip::Trip;
use crate::repositories::trip_repository::TripStore;
use crate::services::clock::Clock;
use crate::services::hos_simulator::start_of_day;
use crate::services::route_geometry::round_tenth;
use crate::utils::errors::{AppError, AppResult};

/// Valores de cabecera que no salen del cálculo
#[derive(Debug, Clone, PartialEq)]
pub struct LogSheetDefaults {
    pub vehicle_numbers: String,
    pub shipping_docs: String,
}

impl Default for LogSheetDefaults {
    fn default() -> Self {
        Self {
            vehicle_numbers: "TRK-001".to_string(),
            shipping_docs: "Load #12345".to_string(),
        }
    }
}

pub struct EldLogGenerationService<'a> {
    store: &'a dyn TripStore,
    clock: &'a dyn Clock,
    defaults: &'a LogSheetDefaults,
}

impl<'a> EldLogGenerationService<'a> {
    pub fn new(store: &'a dyn TripStore, clock: &'a dyn Clock, defaults: &'a LogSheetDefaults) -> Self {
        Self { store, clock, defaults }
    }

    /// Genera y persiste las hojas del trip.
    ///
    /// Con línea de tiempo simulada se emite una hoja por día; sin ella, la
    /// hoja fija de un día.
    pub async fn generate_log_sheets(&self, trip: &Trip, summary: &RouteSummary) -> AppResult<Vec<EldLogSheet>> {
        log::info!("📝 Generando hojas ELD para trip {}", trip.trip_id);

        let drafts = match &summary.duty_timeline {
            Some(timeline) => self.create_daily_logs(timeline)?,
            None => vec![self.create_single_day_log(trip, summary)?],
        };

        let sheets = self.store.replace_log_sheets(trip, &drafts).await?;
        log::info!("✅ {} hojas ELD generadas para trip {}", sheets.len(), trip.trip_id);
        Ok(sheets)
    }

    /// Hoja de un día: descanso, inspección, conducción, entrega, descanso
    pub fn create_single_day_log(&self, trip: &Trip, summary: &RouteSummary) -> AppResult<LogSheetDraft> {
        let current = &trip.current_location;
        let dropoff = &trip.dropoff_location;

        let entries = vec![
            entry(1, (0, 0), (6, 0), DutyStatus::OffDuty, current.clone(), format!("Off duty, {}", current))?,
            entry(2, (6, 0), (7, 0), DutyStatus::OnDuty, current.clone(), format!("Pre-trip inspection, {}", current))?,
            entry(
                3,
                (7, 0),
                (15, 0),
                DutyStatus::Driving,
                format!("En route to {}", dropoff),
                format!("Driving to {}", dropoff),
            )?,
            entry(4, (15, 0), (16, 0), DutyStatus::OnDuty, dropoff.clone(), format!("Delivery, {}", dropoff))?,
            NewDutyEntry {
                start_time: time_of_day(16, 0)?,
                end_time: closing_time(),
                duty_status: DutyStatus::OffDuty,
                location: dropoff.clone(),
                remarks: format!("Off duty, {}", dropoff),
                entry_order: 5,
            },
        ];

        let declared = DutyTotals {
            off_duty_hours: Decimal::new(1400, 2),
            sleeper_berth_hours: Decimal::new(0, 2),
            driving_hours: Decimal::new(800, 2),
            on_duty_hours: Decimal::new(200, 2),
        };

        LogSheetDraft::new(self.header(self.clock.now().date_naive(), 1, summary.total_distance)?, entries, Some(declared))
    }

    /// Corta la línea de tiempo a medianoche: una hoja por día natural (UTC)
    pub fn create_daily_logs(&self, timeline: &[DutySegment]) -> AppResult<Vec<LogSheetDraft>> {
        let (first, last) = match (timeline.first(), timeline.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(AppError::MalformedLogSheet("empty duty timeline".to_string())),
        };

        let mut drafts = Vec::new();
        let mut day = start_of_day(first.start);
        let mut sheet_number = 1;

        while day < last.end {
            let next_day = day + Duration::days(1);
            let mut entries = Vec::new();
            let mut miles = 0.0;

            for segment in timeline {
                let start = segment.start.max(day);
                let end = segment.end.min(next_day);
                if end <= start {
                    continue;
                }

                let span = (segment.end - segment.start).num_minutes();
                miles += segment.miles * (end - start).num_minutes() as f64 / span as f64;

                entries.push(NewDutyEntry {
                    start_time: start.time(),
                    end_time: end_of_entry(end, next_day),
                    duty_status: segment.duty_status,
                    location: segment.location.clone(),
                    remarks: segment.remarks.clone(),
                    entry_order: entries.len() as i32 + 1,
                });
            }

            let header = self.header(day.date_naive(), sheet_number, miles)?;
            drafts.push(LogSheetDraft::new(header, entries, None)?);

            day = next_day;
            sheet_number += 1;
        }

        Ok(drafts)
    }

    fn header(&self, log_date: NaiveDate, sheet_number: i32, miles: f64) -> AppResult<LogSheetHeader> {
        let total_miles = Decimal::from_f64(round_tenth(miles))
            .map(|d| d.round_dp(1))
            .ok_or_else(|| AppError::Internal(format!("invalid mileage {}", miles)))?;

        Ok(LogSheetHeader {
            log_date,
            sheet_number,
            total_miles,
            vehicle_numbers: self.defaults.vehicle_numbers.clone(),
            shipping_docs: self.defaults.shipping_docs.clone(),
        })
    }
}

fn end_of_entry(end: DateTime<Utc>, next_day: DateTime<Utc>) -> NaiveTime {
    if end == next_day {
        closing_time()
    } else {
        end.time()
    }
}

fn time_of_day(hour: u32, minute: u32) -> AppResult<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| AppError::Internal(format!("invalid time {:02}:{:02}", hour, minute)))
}

fn entry(
    order: i32,
    start: (u32, u32),
    end: (u32, u32),
    duty_status: DutyStatus,
    location: String,
    remarks: String,
) -> AppResult<NewDutyEntry> {
    Ok(NewDutyEntry {
        start_time: time_of_day(start.0, start.1)?,
        end_time: time_of_day(end.0, end.1)?,
        duty_status,
        location,
        remarks,
        entry_order: order,
    })
}

//! Modelos de ELD (Electronic Logging Device)
//!
//! Hoja de registro diaria (`eld_log_sheets`) y sus entradas de estado de
//! servicio (`duty_status_entries`). Las hojas nuevas se construyen con
//! [`LogSheetDraft::new`], que valida las invariantes antes de persistir:
//!
//! - entradas contiguas, sin solapamiento, desde 00:00 hasta el cierre del día
//! - `entry_order` denso desde 1
//! - las cuatro categorías de horas suman exactamente 24.00
//!
//! La columna TIME no admite 24:00, así que la última entrada del día cierra
//! en 23:59 y ese minuto final se cuenta como medianoche.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use uuid::Uuid;
use rust_decimal::Decimal;

use crate::utils::errors::{AppError, AppResult};

pub const MINUTES_PER_DAY: i64 = 24 * 60;
const CLOSING_MINUTE: i64 = MINUTES_PER_DAY - 1;

/// Estado de servicio - mapea al ENUM duty_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "duty_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DutyStatus {
    OffDuty,
    SleeperBerth,
    Driving,
    OnDuty,
}

impl DutyStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            DutyStatus::OffDuty => "Off Duty",
            DutyStatus::SleeperBerth => "Sleeper Berth",
            DutyStatus::Driving => "Driving",
            DutyStatus::OnDuty => "On Duty (Not Driving)",
        }
    }
}

/// Hoja diaria - mapea exactamente a la tabla eld_log_sheets
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EldLogSheet {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub driver_id: Uuid,
    pub log_date: NaiveDate,
    pub sheet_number: i32,
    pub total_miles: Decimal,
    pub vehicle_numbers: String,
    pub shipping_docs: String,
    pub off_duty_hours: Decimal,
    pub sleeper_berth_hours: Decimal,
    pub driving_hours: Decimal,
    pub on_duty_hours: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Entrada de estado - mapea exactamente a la tabla duty_status_entries
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DutyStatusEntry {
    pub id: Uuid,
    pub log_sheet_id: Uuid,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duty_status: DutyStatus,
    pub location: String,
    pub remarks: String,
    pub entry_order: i32,
}

/// Entrada todavía sin persistir
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewDutyEntry {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duty_status: DutyStatus,
    pub location: String,
    pub remarks: String,
    pub entry_order: i32,
}

/// Totales por categoría, en horas con dos decimales
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DutyTotals {
    pub off_duty_hours: Decimal,
    pub sleeper_berth_hours: Decimal,
    pub driving_hours: Decimal,
    pub on_duty_hours: Decimal,
}

impl DutyTotals {
    /// Convierte minutos a centésimas de hora repartiendo el redondeo por
    /// mayor resto, para que 1440 minutos den siempre 24.00 exactas.
    pub fn from_minutes(off_duty: i64, sleeper_berth: i64, driving: i64, on_duty: i64) -> Self {
        let minutes = [off_duty, sleeper_berth, driving, on_duty];
        let total_minutes: i64 = minutes.iter().sum();

        // 1 minuto = 5/3 centésimas de hora
        let mut hundredths: Vec<i64> = minutes.iter().map(|m| m * 5 / 3).collect();
        let target = (total_minutes * 5 + 1) / 3;
        let mut missing = target - hundredths.iter().sum::<i64>();

        let mut by_remainder: Vec<usize> = (0..minutes.len()).collect();
        by_remainder.sort_by_key(|&i| std::cmp::Reverse((minutes[i] * 5) % 3));
        for &i in by_remainder.iter() {
            if missing <= 0 {
                break;
            }
            if (minutes[i] * 5) % 3 > 0 {
                hundredths[i] += 1;
                missing -= 1;
            }
        }

        Self {
            off_duty_hours: Decimal::new(hundredths[0], 2),
            sleeper_berth_hours: Decimal::new(hundredths[1], 2),
            driving_hours: Decimal::new(hundredths[2], 2),
            on_duty_hours: Decimal::new(hundredths[3], 2),
        }
    }

    pub fn total(&self) -> Decimal {
        self.off_duty_hours + self.sleeper_berth_hours + self.driving_hours + self.on_duty_hours
    }
}

/// Cabecera de una hoja a construir
#[derive(Debug, Clone)]
pub struct LogSheetHeader {
    pub log_date: NaiveDate,
    pub sheet_number: i32,
    pub total_miles: Decimal,
    pub vehicle_numbers: String,
    pub shipping_docs: String,
}

/// Hoja validada, lista para persistir junto a sus entradas
#[derive(Debug, Clone)]
pub struct LogSheetDraft {
    pub log_date: NaiveDate,
    pub sheet_number: i32,
    pub total_miles: Decimal,
    pub vehicle_numbers: String,
    pub shipping_docs: String,
    pub totals: DutyTotals,
    pub entries: Vec<NewDutyEntry>,
}

impl LogSheetDraft {
    /// Construye la hoja validando las invariantes del día.
    ///
    /// Si se pasan `declared` totales deben coincidir con los calculados a
    /// partir de las entradas.
    pub fn new(
        header: LogSheetHeader,
        entries: Vec<NewDutyEntry>,
        declared: Option<DutyTotals>,
    ) -> AppResult<Self> {
        let computed = totals_from_entries(&entries)?;

        if let Some(declared) = declared {
            if declared != computed {
                return Err(AppError::MalformedLogSheet(format!(
                    "declared hour totals {:?} do not match duty entries {:?}",
                    declared, computed
                )));
            }
        }

        if computed.total() != Decimal::new(2400, 2) {
            return Err(AppError::MalformedLogSheet(format!(
                "hour totals sum to {} instead of 24.00",
                computed.total()
            )));
        }

        Ok(Self {
            log_date: header.log_date,
            sheet_number: header.sheet_number,
            total_miles: header.total_miles,
            vehicle_numbers: header.vehicle_numbers,
            shipping_docs: header.shipping_docs,
            totals: computed,
            entries,
        })
    }
}

/// Minuto del día en que empieza una entrada
fn start_minute(entry: &NewDutyEntry) -> i64 {
    entry.start_time.num_seconds_from_midnight() as i64 / 60
}

/// Minuto del día en que termina una entrada; 23:59 de la última es medianoche
fn end_minute(entry: &NewDutyEntry, is_last: bool) -> i64 {
    let minute = entry.end_time.num_seconds_from_midnight() as i64 / 60;
    if is_last && minute == CLOSING_MINUTE {
        MINUTES_PER_DAY
    } else {
        minute
    }
}

/// Hora con la que se cierra la última entrada de cada día
pub fn closing_time() -> NaiveTime {
    NaiveTime::default() + Duration::minutes(CLOSING_MINUTE)
}

/// Valida la secuencia de entradas y acumula minutos por categoría
pub fn totals_from_entries(entries: &[NewDutyEntry]) -> AppResult<DutyTotals> {
    if entries.is_empty() {
        return Err(AppError::MalformedLogSheet("log sheet has no duty entries".to_string()));
    }

    let mut minutes = [0i64; 4];
    let mut cursor = 0i64;

    for (index, entry) in entries.iter().enumerate() {
        let is_last = index + 1 == entries.len();
        let expected_order = index as i32 + 1;
        if entry.entry_order != expected_order {
            return Err(AppError::MalformedLogSheet(format!(
                "entry_order {} found where {} was expected",
                entry.entry_order, expected_order
            )));
        }

        let start = start_minute(entry);
        let end = end_minute(entry, is_last);
        if start != cursor {
            return Err(AppError::MalformedLogSheet(format!(
                "entry {} starts at {} but the previous interval ends at minute {}",
                entry.entry_order, entry.start_time, cursor
            )));
        }
        if end <= start {
            return Err(AppError::MalformedLogSheet(format!(
                "entry {} ends at {} before it starts at {}",
                entry.entry_order, entry.end_time, entry.start_time
            )));
        }

        let slot = match entry.duty_status {
            DutyStatus::OffDuty => 0,
            DutyStatus::SleeperBerth => 1,
            DutyStatus::Driving => 2,
            DutyStatus::OnDuty => 3,
        };
        minutes[slot] += end - start;
        cursor = end;
    }

    if cursor != MINUTES_PER_DAY {
        return Err(AppError::MalformedLogSheet(format!(
            "duty entries cover {} minutes instead of a full day",
            cursor
        )));
    }

    Ok(DutyTotals::from_minutes(minutes[0], minutes[1], minutes[2], minutes[3]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn entry(order: i32, start: NaiveTime, end: NaiveTime, status: DutyStatus) -> NewDutyEntry {
        NewDutyEntry {
            start_time: start,
            end_time: end,
            duty_status: status,
            location: "Atlanta, GA".to_string(),
            remarks: String::new(),
            entry_order: order,
        }
    }

    fn header() -> LogSheetHeader {
        LogSheetHeader {
            log_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            sheet_number: 1,
            total_miles: Decimal::new(4855, 1),
            vehicle_numbers: "TRK-001".to_string(),
            shipping_docs: "Load #12345".to_string(),
        }
    }

    fn standard_day() -> Vec<NewDutyEntry> {
        vec![
            entry(1, time(0, 0), time(6, 0), DutyStatus::OffDuty),
            entry(2, time(6, 0), time(7, 0), DutyStatus::OnDuty),
            entry(3, time(7, 0), time(15, 0), DutyStatus::Driving),
            entry(4, time(15, 0), time(16, 0), DutyStatus::OnDuty),
            entry(5, time(16, 0), time(23, 59), DutyStatus::OffDuty),
        ]
    }

    #[test]
    fn test_standard_day_totals() {
        let totals = totals_from_entries(&standard_day()).unwrap();
        assert_eq!(totals.off_duty_hours, Decimal::new(1400, 2));
        assert_eq!(totals.sleeper_berth_hours, Decimal::new(0, 2));
        assert_eq!(totals.driving_hours, Decimal::new(800, 2));
        assert_eq!(totals.on_duty_hours, Decimal::new(200, 2));
        assert_eq!(totals.total(), Decimal::new(2400, 2));
    }

    #[test]
    fn test_rounding_keeps_full_day_at_24() {
        // 20 minutos por categoría producen terceras partes de hora
        let totals = DutyTotals::from_minutes(620, 20, 440, 360);
        assert_eq!(totals.total(), Decimal::new(2400, 2));
        let totals = DutyTotals::from_minutes(1, 1, 1, 1437);
        assert_eq!(totals.total(), Decimal::new(2400, 2));
    }

    #[test]
    fn test_gap_is_rejected() {
        let mut entries = standard_day();
        entries[2].start_time = time(7, 30);
        let err = LogSheetDraft::new(header(), entries, None).unwrap_err();
        assert!(matches!(err, AppError::MalformedLogSheet(_)));
    }

    #[test]
    fn test_overlap_is_rejected() {
        let mut entries = standard_day();
        entries[1].end_time = time(8, 0);
        assert!(LogSheetDraft::new(header(), entries, None).is_err());
    }

    #[test]
    fn test_short_day_is_rejected() {
        let mut entries = standard_day();
        entries[4].end_time = time(22, 0);
        assert!(LogSheetDraft::new(header(), entries, None).is_err());
    }

    #[test]
    fn test_entry_order_must_be_dense() {
        let mut entries = standard_day();
        entries[3].entry_order = 7;
        assert!(LogSheetDraft::new(header(), entries, None).is_err());
    }

    #[test]
    fn test_declared_totals_must_match() {
        let wrong = DutyTotals::from_minutes(600, 0, 720, 120);
        let err = LogSheetDraft::new(header(), standard_day(), Some(wrong)).unwrap_err();
        assert!(matches!(err, AppError::MalformedLogSheet(_)));

        let right = DutyTotals::from_minutes(840, 0, 480, 120);
        let draft = LogSheetDraft::new(header(), standard_day(), Some(right)).unwrap();
        assert_eq!(draft.entries.len(), 5);
        assert_eq!(draft.totals, right);
    }

    #[test]
    fn test_empty_sheet_is_rejected() {
        assert!(LogSheetDraft::new(header(), Vec::new(), None).is_err());
    }
}

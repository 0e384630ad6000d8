//! Simulación HOS hacia adelante
//!
//! Recorre los tramos de la ruta desde "ahora" con un reloj simulado y
//! corta la conducción cuando se alcanza el primer límite:
//!
//! - 8 horas de conducción desde la última pausa de 30 minutos
//! - 11 horas de conducción por turno y ventana de 14 horas
//! - 1000 millas desde el último repostaje
//! - horas restantes del ciclo (70h/8d o 60h/7d)
//!
//! El resultado es la lista de paradas y la línea de tiempo continua de
//! estados de servicio desde las 00:00 del día de salida hasta la medianoche
//! del día de entrega.

use chrono::{DateTime, Duration, Timelike, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::dto::directions_dto::{BaseRoute, RouteLeg};
use crate::dto::route_dto::DutySegment;
use crate::models::eld_log::DutyStatus;
use crate::models::planned_stop::{Coordinates, NewPlannedStop, StopType};
use crate::models::trip::Trip;
use crate::services::hos_rules::*;
use crate::services::route_geometry::RouteGeometry;
use crate::utils::errors::{AppError, AppResult};

/// Paradas, línea de tiempo y avisos de una simulación
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub stops: Vec<NewPlannedStop>,
    pub timeline: Vec<DutySegment>,
    pub warnings: Vec<String>,
}

/// Límite que corta un tramo de conducción
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Limit {
    Cycle,
    Window,
    Shift,
    Fuel,
    Break,
}

pub struct HosSimulator {
    cycle: CycleRule,
    initial_cycle_minutes: i64,
}

impl HosSimulator {
    pub fn new(cycle: CycleRule, current_cycle_hours: &Decimal) -> AppResult<Self> {
        let initial_cycle_minutes = (*current_cycle_hours * Decimal::from(60))
            .round()
            .to_i64()
            .ok_or_else(|| AppError::Internal(format!("invalid cycle hours {}", current_cycle_hours)))?;

        Ok(Self {
            cycle,
            initial_cycle_minutes,
        })
    }

    pub fn simulate(&self, trip: &Trip, route: &BaseRoute, now: DateTime<Utc>) -> AppResult<SimulationOutcome> {
        let departure = truncate_to_minute(now);
        let mut run = Run::new(trip, route, self.cycle, self.initial_cycle_minutes, start_of_day(departure));

        let off_duty_remarks = format!("Off duty, {}", trip.current_location);
        run.push_segment(
            DutyStatus::OffDuty,
            (departure - run.clock).num_minutes(),
            &trip.current_location,
            &off_duty_remarks,
            0.0,
        );
        let inspection_remarks = format!("Pre-trip inspection, {}", trip.current_location);
        run.push_segment(
            DutyStatus::OnDuty,
            PRE_TRIP_INSPECTION_MINUTES,
            &trip.current_location,
            &inspection_remarks,
            0.0,
        );

        let legs = if route.legs.is_empty() {
            vec![RouteLeg {
                distance: route.total_distance,
                duration: route.total_duration,
            }]
        } else {
            route.legs.clone()
        };

        // Con un único tramo el pickup se hace antes de salir
        let pickup_after_leg = if !trip.has_distinct_pickup() {
            None
        } else if legs.len() > 1 {
            Some(0)
        } else {
            run.pickup();
            None
        };

        for (index, leg) in legs.iter().enumerate() {
            run.drive_leg(leg);
            if pickup_after_leg == Some(index) {
                run.pickup();
            }
        }

        run.add_stop(
            StopType::Delivery,
            DutyStatus::OnDuty,
            DELIVERY_MINUTES,
            trip.dropoff_location.clone(),
            "1 hour for delivery activities".to_string(),
            format!("Delivery, {}", trip.dropoff_location),
        );

        let closing = if run.clock == start_of_day(run.clock) {
            0
        } else {
            (start_of_day(run.clock) + Duration::days(1) - run.clock).num_minutes()
        };
        let final_remarks = format!("Off duty, {}", trip.dropoff_location);
        run.push_segment(DutyStatus::OffDuty, closing, &trip.dropoff_location, &final_remarks, 0.0);

        let days = (run.clock - start_of_day(departure)).num_days();
        if days > 1 {
            run.warnings.push(format!("Trip spans {} days", days));
        }

        log::debug!(
            "🕒 Simulación HOS trip {}: {} paradas, {} segmentos, {} días",
            trip.trip_id,
            run.stops.len(),
            run.timeline.len(),
            days
        );

        Ok(SimulationOutcome {
            stops: run.stops,
            timeline: run.timeline,
            warnings: run.warnings,
        })
    }
}

/// Estado mutable de una simulación
struct Run<'a> {
    trip: &'a Trip,
    route: &'a BaseRoute,
    geometry: RouteGeometry,
    cycle: CycleRule,
    clock: DateTime<Utc>,
    timeline: Vec<DutySegment>,
    stops: Vec<NewPlannedStop>,
    warnings: Vec<String>,
    shift_driving: i64,
    shift_start: Option<DateTime<Utc>>,
    since_break: i64,
    cycle_used: i64,
    miles_since_fuel: f64,
    miles_driven: f64,
}

impl<'a> Run<'a> {
    fn new(trip: &'a Trip, route: &'a BaseRoute, cycle: CycleRule, cycle_used: i64, clock: DateTime<Utc>) -> Self {
        Self {
            trip,
            route,
            geometry: RouteGeometry::new(&route.coordinates),
            cycle,
            clock,
            timeline: Vec::new(),
            stops: Vec::new(),
            warnings: Vec::new(),
            shift_driving: 0,
            shift_start: None,
            since_break: 0,
            cycle_used,
            miles_since_fuel: 0.0,
            miles_driven: 0.0,
        }
    }

    fn push_segment(&mut self, status: DutyStatus, minutes: i64, location: &str, remarks: &str, miles: f64) {
        if minutes <= 0 {
            return;
        }

        let start = self.clock;
        let end = start + Duration::minutes(minutes);
        self.timeline.push(DutySegment {
            duty_status: status,
            start,
            end,
            location: location.to_string(),
            remarks: remarks.to_string(),
            miles,
        });
        self.clock = end;

        if matches!(status, DutyStatus::Driving | DutyStatus::OnDuty) {
            self.cycle_used += minutes;
            if self.shift_start.is_none() {
                self.shift_start = Some(start);
            }
        }

        if status == DutyStatus::Driving {
            self.shift_driving += minutes;
            self.since_break += minutes;
            self.miles_since_fuel += miles;
            self.miles_driven += miles;
        } else if minutes >= BREAK_MINUTES {
            // 30 minutos sin conducir cuentan como pausa, también on-duty
            self.since_break = 0;
        }
    }

    fn add_stop(
        &mut self,
        stop_type: StopType,
        status: DutyStatus,
        minutes: i64,
        location: String,
        reason: String,
        remarks: String,
    ) {
        let coordinates = self.position();
        let arrival = self.clock;
        self.push_segment(status, minutes, &location, &remarks, 0.0);

        self.stops.push(NewPlannedStop {
            stop_order: self.stops.len() as i32 + 1,
            stop_type,
            location,
            coordinates,
            estimated_arrival: arrival,
            estimated_departure: self.clock,
            duration_minutes: minutes as i32,
            reason,
        });
    }

    fn pickup(&mut self) {
        let location = self.trip.pickup_location.clone();
        let remarks = format!("Pickup, {}", location);
        self.add_stop(
            StopType::Pickup,
            DutyStatus::OnDuty,
            PICKUP_MINUTES,
            location,
            "1 hour for pickup activities".to_string(),
            remarks,
        );
    }

    /// Posición aproximada según las millas ya recorridas
    fn position(&self) -> Coordinates {
        let fraction = if self.route.total_distance > 0.0 {
            self.miles_driven / self.route.total_distance
        } else {
            0.0
        };
        self.geometry.point_at(fraction).unwrap_or(self.route.bounds.sw)
    }

    fn drive_leg(&mut self, leg: &RouteLeg) {
        let mut remaining_minutes = leg.duration.round() as i64;
        if remaining_minutes <= 0 && leg.distance > 0.0 {
            remaining_minutes = 1;
        }
        if remaining_minutes <= 0 {
            return;
        }

        let speed = leg.distance / remaining_minutes as f64;
        let mut remaining_miles = leg.distance;
        let location = format!("En route to {}", self.trip.dropoff_location);
        let remarks = format!("Driving to {}", self.trip.dropoff_location);

        while remaining_minutes > 0 {
            let (limit, available) = self.tightest_limit(speed);
            if available <= 0 {
                self.rest_for(limit);
                continue;
            }

            let chunk = available.min(remaining_minutes);
            let miles = remaining_miles * chunk as f64 / remaining_minutes as f64;
            self.push_segment(DutyStatus::Driving, chunk, &location, &remarks, miles);
            remaining_minutes -= chunk;
            remaining_miles -= miles;

            if remaining_minutes > 0 {
                self.rest_for(limit);
            }
        }
    }

    /// Minutos de conducción disponibles antes del primer límite.
    /// En empate gana el primero: ciclo, ventana, turno, combustible, pausa.
    fn tightest_limit(&self, speed: f64) -> (Limit, i64) {
        let window_used = self
            .shift_start
            .map(|start| (self.clock - start).num_minutes())
            .unwrap_or(0);

        let fuel_left = if self.miles_since_fuel >= FUEL_INTERVAL_MILES {
            0
        } else if speed > 0.0 {
            (((FUEL_INTERVAL_MILES - self.miles_since_fuel) / speed).floor() as i64).max(1)
        } else {
            i64::MAX
        };

        let candidates = [
            (Limit::Cycle, self.cycle.limit_minutes() - self.cycle_used),
            (Limit::Window, ON_DUTY_WINDOW_MINUTES - window_used),
            (Limit::Shift, MAX_DRIVING_MINUTES_PER_SHIFT - self.shift_driving),
            (Limit::Fuel, fuel_left),
            (Limit::Break, DRIVING_BEFORE_BREAK_MINUTES - self.since_break),
        ];

        candidates
            .into_iter()
            .min_by_key(|(_, available)| *available)
            .unwrap_or((Limit::Break, 0))
    }

    fn rest_for(&mut self, limit: Limit) {
        let mile = self.miles_driven;

        match limit {
            Limit::Fuel => {
                self.add_stop(
                    StopType::Fuel,
                    DutyStatus::OnDuty,
                    FUEL_STOP_MINUTES,
                    format!("Fuel Station - Mile {:.0}", mile),
                    "Fuel stop required - 1000 mile limit".to_string(),
                    "Fueling".to_string(),
                );
                self.miles_since_fuel = 0.0;
            }
            Limit::Break => {
                self.add_stop(
                    StopType::Rest,
                    DutyStatus::OffDuty,
                    BREAK_MINUTES,
                    format!("Rest Area - Mile {:.0}", mile),
                    "30-minute break required after 8 hours driving".to_string(),
                    "30-minute break".to_string(),
                );
            }
            Limit::Shift | Limit::Window => {
                let reason = if limit == Limit::Shift {
                    "10-hour sleeper berth period - 11-hour driving limit reached"
                } else {
                    "10-hour sleeper berth period - 14-hour on-duty window reached"
                };
                self.add_stop(
                    StopType::Sleeper,
                    DutyStatus::SleeperBerth,
                    SHIFT_RESET_MINUTES,
                    format!("Sleeper Berth - Mile {:.0}", mile),
                    reason.to_string(),
                    "Sleeper berth".to_string(),
                );
                self.reset_shift();
                self.warnings.push(format!("10-hour sleeper berth period inserted at mile {:.0}", mile));
            }
            Limit::Cycle => {
                self.add_stop(
                    StopType::Rest,
                    DutyStatus::OffDuty,
                    CYCLE_RESTART_MINUTES,
                    format!("Rest Area - Mile {:.0}", mile),
                    format!("34-hour restart required - {} cycle limit reached", self.cycle.label()),
                    "34-hour restart".to_string(),
                );
                self.cycle_used = 0;
                self.reset_shift();
                self.warnings.push(format!("34-hour cycle restart inserted at mile {:.0}", mile));
            }
        }
    }

    fn reset_shift(&mut self) {
        self.shift_driving = 0;
        self.shift_start = None;
        self.since_break = 0;
    }
}

fn truncate_to_minute(value: DateTime<Utc>) -> DateTime<Utc> {
    value - Duration::seconds(value.second() as i64) - Duration::nanoseconds(value.nanosecond() as i64)
}

/// 00:00 UTC del día de `value`
pub fn start_of_day(value: DateTime<Utc>) -> DateTime<Utc> {
    let value = truncate_to_minute(value);
    value - Duration::minutes(value.num_seconds_from_midnight() as i64 / 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trip::TripStatus;
    use crate::services::route_calculation_service::mock_route_data;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn trip(cycle_hours: Decimal) -> Trip {
        Trip {
            id: Uuid::new_v4(),
            trip_id: "TRP-SIM00001".to_string(),
            driver_id: Uuid::new_v4(),
            current_location: "Atlanta, GA".to_string(),
            pickup_location: "Birmingham, AL".to_string(),
            dropoff_location: "Nashville, TN".to_string(),
            current_cycle_hours: cycle_hours,
            status: TripStatus::Planned,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn long_route() -> BaseRoute {
        let mut route = mock_route_data(&trip(Decimal::ZERO));
        route.total_distance = 1300.0;
        route.total_duration = 1300.0;
        route.legs = vec![
            RouteLeg { distance: 600.0, duration: 600.0 },
            RouteLeg { distance: 700.0, duration: 700.0 },
        ];
        route
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, m, 0).unwrap()
    }

    fn assert_contiguous(timeline: &[DutySegment]) {
        for pair in timeline.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(timeline[0].start, start_of_day(timeline[0].start));
        let last = timeline.last().unwrap();
        assert_eq!(last.end, start_of_day(last.end));
    }

    #[test]
    fn test_mock_route_fits_in_one_day() {
        let t = trip(Decimal::ZERO);
        let outcome = HosSimulator::new(CycleRule::default(), &t.current_cycle_hours)
            .unwrap()
            .simulate(&t, &mock_route_data(&t), at(8, 0))
            .unwrap();

        let types: Vec<StopType> = outcome.stops.iter().map(|s| s.stop_type).collect();
        assert_eq!(types, vec![StopType::Pickup, StopType::Delivery]);
        assert_contiguous(&outcome.timeline);
        assert_eq!(outcome.timeline.last().unwrap().end, at(0, 0) + Duration::days(1));
        assert!(outcome.warnings.is_empty());

        let driven: f64 = outcome.timeline.iter().map(|s| s.miles).sum();
        assert!((driven - 485.5).abs() < 1e-6);
    }

    #[test]
    fn test_long_route_inserts_break_sleeper_and_fuel() {
        let t = trip(Decimal::ZERO);
        let outcome = HosSimulator::new(CycleRule::default(), &t.current_cycle_hours)
            .unwrap()
            .simulate(&t, &long_route(), at(6, 0))
            .unwrap();

        let types: Vec<StopType> = outcome.stops.iter().map(|s| s.stop_type).collect();
        assert_eq!(
            types,
            vec![StopType::Rest, StopType::Pickup, StopType::Sleeper, StopType::Fuel, StopType::Delivery]
        );
        for (index, stop) in outcome.stops.iter().enumerate() {
            assert_eq!(stop.stop_order, index as i32 + 1);
        }
        assert_contiguous(&outcome.timeline);
        assert!(outcome.warnings.iter().any(|w| w.contains("sleeper")));
        assert!(outcome.warnings.iter().any(|w| w == "Trip spans 2 days"));
    }

    #[test]
    fn test_driving_never_exceeds_hos_bounds() {
        let t = trip(Decimal::new(6500, 2));
        let outcome = HosSimulator::new(CycleRule::default(), &t.current_cycle_hours)
            .unwrap()
            .simulate(&t, &long_route(), at(6, 0))
            .unwrap();

        let mut since_break = 0;
        let mut shift = 0;
        for segment in &outcome.timeline {
            let minutes = (segment.end - segment.start).num_minutes();
            match segment.duty_status {
                DutyStatus::Driving => {
                    since_break += minutes;
                    shift += minutes;
                    assert!(since_break <= DRIVING_BEFORE_BREAK_MINUTES);
                    assert!(shift <= MAX_DRIVING_MINUTES_PER_SHIFT);
                }
                _ if minutes >= SHIFT_RESET_MINUTES => {
                    since_break = 0;
                    shift = 0;
                }
                _ if minutes >= BREAK_MINUTES => since_break = 0,
                _ => {}
            }
        }

        // 65 horas usadas: el ciclo se agota antes de terminar
        assert!(outcome
            .stops
            .iter()
            .any(|s| s.duration_minutes as i64 == CYCLE_RESTART_MINUTES));
    }
}

mod common;

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

use common::*;
use trip_planner::dto::route_dto::DutySegment;
use trip_planner::models::eld_log::DutyStatus;
use trip_planner::models::planned_stop::StopType;
use trip_planner::services::hos_rules::CycleRule;
use trip_planner::services::route_calculation_service::PlanningMode;
use trip_planner::services::trip_planning_service::{PlanningSettings, TripPlanningService};

fn simulated() -> PlanningSettings {
    PlanningSettings {
        mode: PlanningMode::Simulated,
        ..Default::default()
    }
}

/// Máximo de conducción acumulada entre segmentos que cumplen `resets`
fn longest_driving_between(timeline: &[DutySegment], resets: impl Fn(&DutySegment, i64) -> bool) -> i64 {
    let mut longest = 0;
    let mut current = 0;
    for segment in timeline {
        let minutes = (segment.end - segment.start).num_minutes();
        if segment.duty_status == DutyStatus::Driving {
            current += minutes;
            longest = longest.max(current);
        } else if resets(segment, minutes) {
            current = 0;
        }
    }
    longest
}

/// 10 horas fuera de servicio o en sleeper reinician el turno
fn shift_reset(segment: &DutySegment, minutes: i64) -> bool {
    minutes >= 600 && segment.duty_status != DutyStatus::OnDuty
}

/// Cualquier interrupción de 30 minutos sin conducir cuenta como pausa,
/// también las paradas on-duty (combustible, pickup)
fn break_reset(_segment: &DutySegment, minutes: i64) -> bool {
    minutes >= 30
}

#[tokio::test]
async fn test_long_trip_produces_one_sheet_per_day() {
    let trip = sample_trip(Decimal::ZERO);
    let store = InMemoryStore::with_trip(trip.clone());
    let provider = StaticProvider(Some(route(&[(600.0, 600.0), (700.0, 700.0)])));
    let clock = fixed_clock();
    let settings = simulated();

    let response = TripPlanningService::new(&store, &provider, &clock, &settings)
        .calculate_route(&trip.trip_id)
        .await
        .unwrap();

    let stop_types: Vec<StopType> = response.route_data.planned_stops.iter().map(|s| s.stop_type).collect();
    assert_eq!(
        stop_types,
        vec![
            StopType::Rest,
            StopType::Pickup,
            StopType::Sleeper,
            StopType::Fuel,
            StopType::Delivery
        ]
    );
    assert!(response
        .route_data
        .compliance_status
        .warnings
        .contains(&"Trip spans 2 days".to_string()));
    assert_eq!(response.log_sheets_generated, 2);

    let timeline = response.route_data.duty_timeline.clone().unwrap();
    assert_eq!(longest_driving_between(&timeline, shift_reset), 660);
    assert_eq!(longest_driving_between(&timeline, break_reset), 480);

    // el repostaje on-duty de 30 minutos corta la conducción del día 2
    let fuel_stop = timeline
        .iter()
        .find(|s| s.duty_status == DutyStatus::OnDuty && s.remarks == "Fueling")
        .expect("fuel segment");
    assert_eq!((fuel_stop.end - fuel_stop.start).num_minutes(), 30);

    store.with_sheets(trip.id, |sheets| {
        let numbers: Vec<i32> = sheets.iter().map(|s| s.sheet.sheet_number).collect();
        assert_eq!(numbers, vec![1, 2]);

        let miles: Vec<Decimal> = sheets.iter().map(|s| s.sheet.total_miles).collect();
        assert_eq!(miles, vec![Decimal::new(6600, 1), Decimal::new(6400, 1)]);

        for stored in sheets {
            let sheet = &stored.sheet;
            assert_eq!(
                sheet.off_duty_hours + sheet.sleeper_berth_hours + sheet.driving_hours + sheet.on_duty_hours,
                Decimal::new(2400, 2)
            );
            assert_eq!(stored.entries[0].start_time.to_string(), "00:00:00");
        }

        let first = &sheets[0].sheet;
        assert_eq!(first.off_duty_hours, Decimal::new(850, 2));
        assert_eq!(first.on_duty_hours, Decimal::new(200, 2));
        assert_eq!(first.driving_hours, Decimal::new(1100, 2));
        assert_eq!(first.sleeper_berth_hours, Decimal::new(250, 2));

        let second = &sheets[1].sheet;
        assert_eq!(second.sleeper_berth_hours, Decimal::new(750, 2));
        assert_eq!(second.driving_hours, Decimal::new(1067, 2));
        assert_eq!(second.on_duty_hours, Decimal::new(150, 2));
        assert_eq!(second.off_duty_hours, Decimal::new(433, 2));
    });
}

#[tokio::test]
async fn test_sixty_hour_carrier_gets_restart_near_cycle_limit() {
    let trip = sample_trip(Decimal::new(5500, 2));
    let store = InMemoryStore::with_trip(trip.clone());
    store.set_cycle(CycleRule::SixtySevenDay);
    let clock = fixed_clock();
    let settings = simulated();

    let response = TripPlanningService::new(&store, &StaticProvider(None), &clock, &settings)
        .calculate_route(&trip.trip_id)
        .await
        .unwrap();

    let restart = response
        .route_data
        .planned_stops
        .iter()
        .find(|s| s.duration_minutes == 34 * 60)
        .expect("restart stop");
    assert_eq!(restart.stop_type, StopType::Rest);
    assert_eq!(
        restart.reason,
        "34-hour restart required - 60-hour/7-day cycle limit reached"
    );

    let orders: Vec<i32> = store.stops(trip.id).iter().map(|s| s.stop_order).collect();
    let expected: Vec<i32> = (1..=orders.len() as i32).collect();
    assert_eq!(orders, expected);

    store.with_sheets(trip.id, |sheets| {
        assert!(sheets.len() >= 2);
        for (index, stored) in sheets.iter().enumerate() {
            assert_eq!(stored.sheet.sheet_number, index as i32 + 1);
            let sheet = &stored.sheet;
            assert_eq!(
                sheet.off_duty_hours + sheet.sleeper_berth_hours + sheet.driving_hours + sheet.on_duty_hours,
                Decimal::new(2400, 2)
            );
        }
    });
}

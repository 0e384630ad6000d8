//! Services module
//!
//! Este módulo contiene la lógica de negocio de la planificación de trips:
//! reglas HOS, cálculo de ruta, simulación, hojas ELD y la orquestación de
//! `calculate_route`. Las dependencias externas (proveedor de mapas, reloj,
//! persistencia) se reciben por constructor.

pub mod clock;
pub mod directions_service;
pub mod eld_log_service;
pub mod hos_rules;
pub mod hos_simulator;
pub mod route_calculation_service;
pub mod route_geometry;
pub mod trip_planning_service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use directions_service::{GoogleDirectionsClient, RoutingProvider, UnavailableProvider};
pub use route_calculation_service::PlanningMode;
pub use trip_planning_service::{PlanningSettings, TripPlanningService};

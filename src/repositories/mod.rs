//! Repositorios
//!
//! Acceso a PostgreSQL con consultas `sqlx` en tiempo de ejecución.

pub mod carrier_repository;
pub mod driver_repository;
pub mod trip_repository;

pub use carrier_repository::CarrierRepository;
pub use driver_repository::DriverRepository;
pub use trip_repository::{TripRepository, TripStore};

//! Controladores
//!
//! Se construyen por request con el pool de PostgreSQL y coordinan
//! validación, repositorios y servicios.

pub mod carrier_controller;
pub mod driver_controller;
pub mod trip_controller;

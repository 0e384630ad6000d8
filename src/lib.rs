//! Trip planner
//!
//! Backend de planificación de viajes para camiones con reglas HOS
//! (Hours of Service) y hojas de registro ELD.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL (ver `migrations/`).

pub mod carrier;
pub mod driver;
pub mod trip;
pub mod planned_stop;
pub mod eld_log;

//! Modelo de Carrier
//!
//! Empresa de transporte (motor carrier). Mapea exactamente a la tabla
//! `carriers`. El flag `operates_every_day` decide la regla de ciclo HOS
//! (ver `CycleRule::from_operates_every_day`).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Carrier principal - mapea exactamente a la tabla carriers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Carrier {
    pub id: Uuid,
    pub name: String,
    pub dot_number: String,
    pub main_office_address: String,
    /// true = regla 70h/8 días, false = regla 60h/7 días
    pub operates_every_day: bool,
    pub created_at: DateTime<Utc>,
}

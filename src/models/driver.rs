//! Modelo de Driver
//!
//! Conductor con licencia CDL, perteneciente a un único carrier.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Driver principal - mapea exactamente a la tabla drivers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Driver {
    pub id: Uuid,
    pub driver_id: String,
    pub name: String,
    pub cdl_number: String,
    pub carrier_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Driver con el nombre de su carrier (JOIN carriers)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DriverWithCarrier {
    pub id: Uuid,
    pub driver_id: String,
    pub name: String,
    pub cdl_number: String,
    pub carrier_id: Uuid,
    pub carrier_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

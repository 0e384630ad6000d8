//! Configuración de variables de entorno
//!
//! Este módulo carga la configuración del servidor, del proveedor de mapas y
//! de la planificación desde variables de entorno (`.env` vía dotenvy).

use std::env::{self, VarError};
use std::str::FromStr;
use std::time::Duration;

use anyhow::anyhow;

use crate::services::eld_log_service::LogSheetDefaults;
use crate::services::route_calculation_service::PlanningMode;
use crate::services::trip_planning_service::PlanningSettings;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub log_level: String,
    pub cors_origins: Vec<String>,
    pub google_maps_api_key: Option<String>,
    pub directions_timeout: Duration,
    pub planning_mode: PlanningMode,
    pub default_vehicle_numbers: String,
    pub default_shipping_docs: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        let log_defaults = LogSheetDefaults::default();
        Self {
            environment: "development".to_string(),
            port: 8000,
            host: "0.0.0.0".to_string(),
            log_level: "info".to_string(),
            cors_origins: Vec::new(),
            google_maps_api_key: None,
            directions_timeout: Duration::from_secs(10),
            planning_mode: PlanningMode::Fixed,
            default_vehicle_numbers: log_defaults.vehicle_numbers,
            default_shipping_docs: log_defaults.shipping_docs,
        }
    }
}

impl EnvironmentConfig {
    /// Lee la configuración; las variables ausentes toman el valor por defecto
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            environment: optional("ENVIRONMENT")?.unwrap_or(defaults.environment),
            port: parsed("PORT")?.unwrap_or(defaults.port),
            host: optional("HOST")?.unwrap_or(defaults.host),
            log_level: optional("LOG_LEVEL")?.unwrap_or(defaults.log_level),
            cors_origins: optional("CORS_ORIGINS")?
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            google_maps_api_key: optional("GOOGLE_MAPS_API_KEY")?.filter(|key| !key.trim().is_empty()),
            directions_timeout: parsed::<u64>("DIRECTIONS_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.directions_timeout),
            planning_mode: match optional("ROUTE_PLANNING_MODE")? {
                Some(value) => value.parse().map_err(|e: String| anyhow!(e))?,
                None => defaults.planning_mode,
            },
            default_vehicle_numbers: optional("DEFAULT_VEHICLE_NUMBERS")?.unwrap_or(defaults.default_vehicle_numbers),
            default_shipping_docs: optional("DEFAULT_SHIPPING_DOCS")?.unwrap_or(defaults.default_shipping_docs),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn planning_settings(&self) -> PlanningSettings {
        PlanningSettings {
            mode: self.planning_mode,
            log_defaults: LogSheetDefaults {
                vehicle_numbers: self.default_vehicle_numbers.clone(),
                shipping_docs: self.default_shipping_docs.clone(),
            },
        }
    }
}

fn optional(name: &str) -> anyhow::Result<Option<String>> {
    match env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(anyhow!("{name} value is not valid unicode")),
    }
}

fn parsed<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    optional(name)?
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|e| anyhow!("{name} must be a valid value: {e}"))
        })
        .transpose()
}

//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::services::clock::{Clock, SystemClock};
use crate::services::directions_service::{GoogleDirectionsClient, RoutingProvider, UnavailableProvider};
use crate::services::trip_planning_service::PlanningSettings;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub routing: Arc<dyn RoutingProvider>,
    pub clock: Arc<dyn Clock>,
    pub planning: Arc<PlanningSettings>,
}

impl AppState {
    /// Estado de producción: Google Directions si hay API key, reloj del sistema
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> anyhow::Result<Self> {
        let routing: Arc<dyn RoutingProvider> = match &config.google_maps_api_key {
            Some(key) => {
                log::info!("🗺️ Google Directions configurado");
                Arc::new(GoogleDirectionsClient::new(key.clone(), config.directions_timeout)?)
            }
            None => {
                log::warn!("⚠️ GOOGLE_MAPS_API_KEY no configurada, se usará la ruta mock");
                Arc::new(UnavailableProvider)
            }
        };

        Ok(Self::with_dependencies(pool, config, routing, Arc::new(SystemClock)))
    }

    pub fn with_dependencies(
        pool: PgPool,
        config: EnvironmentConfig,
        routing: Arc<dyn RoutingProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let planning = Arc::new(config.planning_settings());
        Self {
            pool,
            config,
            routing,
            clock,
            planning,
        }
    }
}

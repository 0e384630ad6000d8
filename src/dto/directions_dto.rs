//! DTOs para la Directions API de Google Maps
//!
//! Este módulo define la consulta de direcciones, la ruta base que consumen
//! los servicios de planificación y las estructuras de la respuesta JSON del
//! proveedor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::planned_stop::Coordinates;

/// Consulta de direcciones independiente del proveedor
#[derive(Debug, Clone)]
pub struct DirectionsRequest {
    pub origin: String,
    pub destination: String,
    pub waypoints: Vec<String>,
    pub avoid_tolls: bool,
    pub optimize_waypoints: bool,
    pub departure_time: DateTime<Utc>,
}

/// Caja que contiene la ruta completa
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RouteBounds {
    pub ne: Coordinates,
    pub sw: Coordinates,
}

/// Tramo entre dos puntos de la ruta (origen → pickup, pickup → destino)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RouteLeg {
    /// millas
    pub distance: f64,
    /// minutos
    pub duration: f64,
}

/// Ruta base sobre la que se calculan las paradas
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BaseRoute {
    /// [longitude, latitude]
    pub coordinates: Vec<[f64; 2]>,
    /// millas
    pub total_distance: f64,
    /// minutos de conducción
    pub total_duration: f64,
    pub bounds: RouteBounds,
    pub legs: Vec<RouteLeg>,
}

// Respuesta JSON de https://maps.googleapis.com/maps/api/directions/json

#[derive(Debug, Deserialize)]
pub struct GoogleDirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<GoogleRoute>,
}

#[derive(Debug, Deserialize)]
pub struct GoogleRoute {
    pub bounds: Option<GoogleBounds>,
    #[serde(default)]
    pub legs: Vec<GoogleLeg>,
    pub overview_polyline: Option<GooglePolyline>,
}

#[derive(Debug, Deserialize)]
pub struct GoogleBounds {
    pub northeast: GoogleLatLng,
    pub southwest: GoogleLatLng,
}

#[derive(Debug, Deserialize)]
pub struct GoogleLatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub struct GoogleLeg {
    pub distance: GoogleValue,
    pub duration: GoogleValue,
}

/// `value` viene en metros o en segundos según el campo
#[derive(Debug, Deserialize)]
pub struct GoogleValue {
    pub value: f64,
}

#[derive(Debug, Deserialize)]
pub struct GooglePolyline {
    pub points: String,
}

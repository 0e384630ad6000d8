//! Servicio de direcciones (Google Maps Directions API)
//!
//! Este módulo define el trait `RoutingProvider` que consumen los servicios de
//! planificación y su implementación HTTP sobre la Directions API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::dto::directions_dto::*;
use crate::models::planned_stop::Coordinates;
use crate::services::route_geometry::{bounds_of, meters_to_miles, round_tenth};
use crate::utils::validation::validate_coordinates;

const GOOGLE_MAPS_BASE_URL: &str = "https://maps.googleapis.com";

#[derive(Debug, Error)]
pub enum DirectionsError {
    #[error("routing provider unavailable: {0}")]
    Unavailable(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned {status}: {message}")]
    Provider { status: String, message: String },

    #[error("could not parse provider response: {0}")]
    Parse(String),
}

/// Proveedor de rutas: devuelve `Ok(None)` cuando no hay resultado
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    async fn directions(&self, request: &DirectionsRequest) -> Result<Option<BaseRoute>, DirectionsError>;
}

/// Proveedor usado cuando no hay credenciales configuradas
#[derive(Debug, Clone, Default)]
pub struct UnavailableProvider;

#[async_trait]
impl RoutingProvider for UnavailableProvider {
    async fn directions(&self, _request: &DirectionsRequest) -> Result<Option<BaseRoute>, DirectionsError> {
        Err(DirectionsError::Unavailable("GOOGLE_MAPS_API_KEY not configured".to_string()))
    }
}

pub struct GoogleDirectionsClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl GoogleDirectionsClient {
    pub fn new(api_key: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            api_key,
            base_url: GOOGLE_MAPS_BASE_URL.to_string(),
            client,
        })
    }

    /// Apuntar a otro host (tests con servidor mock)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_url(&self, request: &DirectionsRequest) -> String {
        let mut url = format!(
            "{}/maps/api/directions/json?origin={}&destination={}&mode=driving&departure_time={}&key={}",
            self.base_url,
            urlencoding::encode(&request.origin),
            urlencoding::encode(&request.destination),
            request.departure_time.timestamp(),
            urlencoding::encode(&self.api_key),
        );

        if !request.waypoints.is_empty() {
            let encoded: Vec<String> = request
                .waypoints
                .iter()
                .map(|w| urlencoding::encode(w).into_owned())
                .collect();
            let prefix = if request.optimize_waypoints { "optimize:true%7C" } else { "" };
            url.push_str(&format!("&waypoints={}{}", prefix, encoded.join("%7C")));
        }

        if request.avoid_tolls {
            url.push_str("&avoid=tolls");
        }

        url
    }
}

#[async_trait]
impl RoutingProvider for GoogleDirectionsClient {
    async fn directions(&self, request: &DirectionsRequest) -> Result<Option<BaseRoute>, DirectionsError> {
        log::info!("🗺️ Directions: {} → {} ({} waypoints)", request.origin, request.destination, request.waypoints.len());

        let response = self
            .client
            .get(self.build_url(request))
            .header("User-Agent", "TripPlanner/1.0")
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;
        log::debug!("📡 Directions response status: {}", status);

        if !status.is_success() {
            return Err(DirectionsError::Provider {
                status: status.to_string(),
                message: response_text,
            });
        }

        let parsed: GoogleDirectionsResponse = serde_json::from_str(&response_text)
            .map_err(|e| DirectionsError::Parse(e.to_string()))?;

        match parsed.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" | "NOT_FOUND" => {
                log::warn!("⚠️ Directions sin resultados ({})", parsed.status);
                return Ok(None);
            }
            other => {
                return Err(DirectionsError::Provider {
                    status: other.to_string(),
                    message: parsed.error_message.unwrap_or_default(),
                });
            }
        }

        match parsed.routes.into_iter().next() {
            Some(route) => process_google_route(route),
            None => Ok(None),
        }
    }
}

/// Convierte la primera ruta de Google a `BaseRoute` (millas y minutos)
fn process_google_route(route: GoogleRoute) -> Result<Option<BaseRoute>, DirectionsError> {
    let coordinates = match &route.overview_polyline {
        Some(polyline) => decode_polyline(&polyline.points)?,
        None => Vec::new(),
    };
    if coordinates.is_empty() || route.legs.is_empty() {
        return Ok(None);
    }

    let legs: Vec<RouteLeg> = route
        .legs
        .iter()
        .map(|leg| RouteLeg {
            distance: round_tenth(meters_to_miles(leg.distance.value)),
            duration: round_tenth(leg.duration.value / 60.0),
        })
        .collect();

    let total_meters: f64 = route.legs.iter().map(|l| l.distance.value).sum();
    let total_seconds: f64 = route.legs.iter().map(|l| l.duration.value).sum();

    let bounds = match route.bounds {
        Some(b) => RouteBounds {
            ne: Coordinates::new(b.northeast.lat, b.northeast.lng),
            sw: Coordinates::new(b.southwest.lat, b.southwest.lng),
        },
        None => bounds_of(&coordinates)
            .ok_or_else(|| DirectionsError::Parse("route has no geometry".to_string()))?,
    };

    Ok(Some(BaseRoute {
        coordinates,
        total_distance: round_tenth(meters_to_miles(total_meters)),
        total_duration: round_tenth(total_seconds / 60.0),
        bounds,
        legs,
    }))
}

/// Decodifica una polilínea codificada (Encoded Polyline Algorithm Format)
/// a pares [longitude, latitude].
pub fn decode_polyline(encoded: &str) -> Result<Vec<[f64; 2]>, DirectionsError> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut points = Vec::new();

    while index < bytes.len() {
        lat += next_polyline_value(bytes, &mut index)?;
        lng += next_polyline_value(bytes, &mut index)?;

        let latitude = lat as f64 / 1e5;
        let longitude = lng as f64 / 1e5;
        validate_coordinates(latitude, longitude)
            .map_err(|_| DirectionsError::Parse(format!("coordinate out of range: {}, {}", latitude, longitude)))?;
        points.push([longitude, latitude]);
    }

    Ok(points)
}

fn next_polyline_value(bytes: &[u8], index: &mut usize) -> Result<i64, DirectionsError> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let byte = *bytes
            .get(*index)
            .ok_or_else(|| DirectionsError::Parse("truncated polyline".to_string()))? as i64
            - 63;
        if !(0..64).contains(&byte) {
            return Err(DirectionsError::Parse("invalid polyline character".to_string()));
        }
        *index += 1;

        result |= (byte & 0x1f) << shift;
        shift += 5;
        if byte < 0x20 {
            break;
        }
        if shift > 60 {
            return Err(DirectionsError::Parse("polyline value overflow".to_string()));
        }
    }

    Ok(if result & 1 != 0 { !(result >> 1) } else { result >> 1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_decode_reference_polyline() {
        let points = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
        assert_eq!(points.len(), 3);
        assert!(close(points[0][0], -120.2) && close(points[0][1], 38.5));
        assert!(close(points[1][0], -120.95) && close(points[1][1], 40.7));
        assert!(close(points[2][0], -126.453) && close(points[2][1], 43.252));
    }

    #[test]
    fn test_decode_rejects_truncated_input() {
        assert!(decode_polyline("_p~iF~ps|U_").is_err());
        assert!(decode_polyline("").unwrap().is_empty());
    }

    #[test]
    fn test_build_url_with_waypoints() {
        let client = GoogleDirectionsClient::new("secret key".to_string(), Duration::from_secs(5))
            .unwrap()
            .with_base_url("http://localhost:1234/");
        let request = DirectionsRequest {
            origin: "Atlanta, GA".to_string(),
            destination: "Nashville, TN".to_string(),
            waypoints: vec!["Birmingham, AL".to_string()],
            avoid_tolls: true,
            optimize_waypoints: true,
            departure_time: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
        };

        let url = client.build_url(&request);
        assert!(url.starts_with("http://localhost:1234/maps/api/directions/json?"));
        assert!(url.contains("origin=Atlanta%2C%20GA"));
        assert!(url.contains("waypoints=optimize:true%7CBirmingham%2C%20AL"));
        assert!(url.contains("avoid=tolls"));
        assert!(url.contains("key=secret%20key"));
    }

    #[tokio::test]
    async fn test_unavailable_provider_always_fails() {
        let request = DirectionsRequest {
            origin: "A".to_string(),
            destination: "B".to_string(),
            waypoints: Vec::new(),
            avoid_tolls: true,
            optimize_waypoints: true,
            departure_time: Utc::now(),
        };
        let result = UnavailableProvider.directions(&request).await;
        assert!(matches!(result, Err(DirectionsError::Unavailable(_))));
    }
}

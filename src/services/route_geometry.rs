//! Geometría de la ruta
//!
//! Distancias haversine a lo largo de la polilínea, caja envolvente y
//! posición aproximada de una parada a partir de la fracción recorrida.

use geo::{BoundingRect, HaversineDistance, LineString, Point};

use crate::dto::directions_dto::RouteBounds;
use crate::models::planned_stop::Coordinates;

const METERS_PER_MILE: f64 = 1609.344;

/// Polilínea [lng, lat] con longitudes acumuladas en millas
pub struct RouteGeometry {
    points: Vec<Point<f64>>,
    cumulative_miles: Vec<f64>,
}

impl RouteGeometry {
    pub fn new(coordinates: &[[f64; 2]]) -> Self {
        let points: Vec<Point<f64>> = coordinates.iter().map(|c| Point::new(c[0], c[1])).collect();

        let mut cumulative_miles = Vec::with_capacity(points.len());
        let mut total = 0.0;
        for (index, point) in points.iter().enumerate() {
            if index > 0 {
                total += points[index - 1].haversine_distance(point) / METERS_PER_MILE;
            }
            cumulative_miles.push(total);
        }

        Self {
            points,
            cumulative_miles,
        }
    }

    pub fn length_miles(&self) -> f64 {
        self.cumulative_miles.last().copied().unwrap_or(0.0)
    }

    /// Punto aproximado tras recorrer `fraction` (0..=1) de la ruta
    pub fn point_at(&self, fraction: f64) -> Option<Coordinates> {
        let first = self.points.first()?;
        let fraction = fraction.clamp(0.0, 1.0);
        let total = self.length_miles();
        if self.points.len() == 1 || total <= 0.0 {
            return Some(Coordinates::new(first.y(), first.x()));
        }

        let target = total * fraction;
        for index in 1..self.points.len() {
            let segment_start = self.cumulative_miles[index - 1];
            let segment_end = self.cumulative_miles[index];
            if target <= segment_end {
                let span = segment_end - segment_start;
                let t = if span > 0.0 { (target - segment_start) / span } else { 0.0 };
                let a = self.points[index - 1];
                let b = self.points[index];
                let lng = a.x() + (b.x() - a.x()) * t;
                let lat = a.y() + (b.y() - a.y()) * t;
                return Some(Coordinates::new(round_coordinate(lat), round_coordinate(lng)));
            }
        }

        self.points.last().map(|p| Coordinates::new(p.y(), p.x()))
    }
}

/// Caja envolvente de la polilínea
pub fn bounds_of(coordinates: &[[f64; 2]]) -> Option<RouteBounds> {
    let line: LineString<f64> = coordinates.iter().map(|c| (c[0], c[1])).collect();
    let rect = line.bounding_rect()?;
    Some(RouteBounds {
        ne: Coordinates::new(rect.max().y, rect.max().x),
        sw: Coordinates::new(rect.min().y, rect.min().x),
    })
}

pub fn meters_to_miles(meters: f64) -> f64 {
    meters / METERS_PER_MILE
}

/// Redondeo a una décima, como se guardan las millas
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round_coordinate(value: f64) -> f64 {
    (value * 1e4).round() / 1e4
}

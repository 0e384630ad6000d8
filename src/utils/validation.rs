//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! de entrada (trips, coordenadas) usadas por los DTOs y servicios.

use std::borrow::Cow;
use std::collections::HashSet;

use rust_decimal::Decimal;
use validator::ValidationError;

/// Límite superior de horas de ciclo aceptadas al crear un trip
pub const MAX_CYCLE_HOURS: i64 = 70;

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor esté en un rango específico
pub fn validate_range<T: PartialOrd + std::fmt::Display + serde::Serialize>(
    value: T,
    min: T,
    max: T,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        let mut error = ValidationError::new("range");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Horas de ciclo usadas: 0.00 a 70.00 inclusive
pub fn validate_cycle_hours(value: &Decimal) -> Result<(), ValidationError> {
    let min = Decimal::new(0, 2);
    let max = Decimal::new(MAX_CYCLE_HOURS * 100, 2);

    validate_range(*value, min, max).map_err(|mut error| {
        let message = if *value < min {
            "Cycle hours cannot be negative"
        } else {
            "Cycle hours cannot exceed 70 hours"
        };
        error.message = Some(Cow::from(message));
        error
    })
}

/// Normaliza una ubicación para compararla: sin espacios en los extremos y en minúsculas
pub fn normalize_location(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Un trip necesita al menos 2 ubicaciones distintas entre actual/pickup/dropoff
pub fn validate_distinct_locations(locations: &[&str]) -> Result<(), ValidationError> {
    let distinct: HashSet<String> = locations.iter().map(|l| normalize_location(l)).collect();
    if distinct.len() < 2 {
        let mut error = ValidationError::new("distinct_locations");
        error.message = Some(Cow::from("Trip must have at least 2 different locations"));
        error.add_param("distinct".into(), &distinct.len());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de coordenadas GPS (simplificado)
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), ValidationError> {
    if !(-90.0..=90.0).contains(&lat) {
        let mut error = ValidationError::new("latitude");
        error.add_param("value".into(), &lat);
        error.add_param("range".into(), &"-90.0 to 90.0".to_string());
        return Err(error);
    }

    if !(-180.0..=180.0).contains(&lng) {
        let mut error = ValidationError::new("longitude");
        error.add_param("value".into(), &lng);
        error.add_param("range".into(), &"-180.0 to 180.0".to_string());
        return Err(error);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_range() {
        assert!(validate_range(5, 1, 10).is_ok());
        assert!(validate_range(0, 1, 10).is_err());
        assert!(validate_range(15, 1, 10).is_err());
    }

    #[test]
    fn test_validate_cycle_hours_bounds() {
        assert!(validate_cycle_hours(&Decimal::new(0, 2)).is_ok());
        assert!(validate_cycle_hours(&Decimal::new(7000, 2)).is_ok());
        assert!(validate_cycle_hours(&Decimal::new(3525, 2)).is_ok());

        let negative = validate_cycle_hours(&Decimal::new(-1, 2)).unwrap_err();
        assert_eq!(negative.message.unwrap(), "Cycle hours cannot be negative");

        let too_many = validate_cycle_hours(&Decimal::new(7001, 2)).unwrap_err();
        assert_eq!(too_many.message.unwrap(), "Cycle hours cannot exceed 70 hours");
    }

    #[test]
    fn test_distinct_locations_ignores_case_and_whitespace() {
        assert!(validate_distinct_locations(&["Atlanta, GA", " atlanta, ga ", "ATLANTA, GA"]).is_err());
        assert!(validate_distinct_locations(&["Atlanta, GA", "atlanta, ga", "Nashville, TN"]).is_ok());
        assert!(validate_distinct_locations(&["A", "B", "C"]).is_ok());
        assert!(validate_distinct_locations(&["", " ", ""]).is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("Atlanta").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(45.0, -75.0).is_ok());
        assert!(validate_coordinates(91.0, -75.0).is_err());
        assert!(validate_coordinates(45.0, -181.0).is_err());
    }
}

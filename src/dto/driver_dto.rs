//! DTOs de drivers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::driver::DriverWithCarrier;
use crate::utils::validation::validate_not_empty;

/// Request para registrar un driver
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDriverRequest {
    #[validate(length(min = 1, max = 20))]
    pub driver_id: String,
    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub cdl_number: String,
    /// id del carrier
    pub carrier: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDriverRequest {
    #[validate(length(min = 1, max = 20))]
    pub driver_id: Option<String>,
    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub cdl_number: Option<String>,
    pub carrier: Option<Uuid>,
}

/// Response de driver con el nombre de su carrier
#[derive(Debug, Clone, Serialize)]
pub struct DriverResponse {
    pub id: Uuid,
    pub driver_id: String,
    pub name: String,
    pub cdl_number: String,
    pub carrier: Uuid,
    pub carrier_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<DriverWithCarrier> for DriverResponse {
    fn from(driver: DriverWithCarrier) -> Self {
        Self {
            id: driver.id,
            driver_id: driver.driver_id,
            name: driver.name,
            cdl_number: driver.cdl_number,
            carrier: driver.carrier_id,
            carrier_name: driver.carrier_name,
            created_at: driver.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(name: Option<&str>) -> UpdateDriverRequest {
        UpdateDriverRequest {
            driver_id: None,
            name: name.map(str::to_string),
            cdl_number: None,
            carrier: None,
        }
    }

    #[test]
    fn test_update_rejects_blank_name() {
        let errors = update(Some("   ")).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_update_accepts_missing_or_real_name() {
        assert!(update(None).validate().is_ok());
        assert!(update(Some("Jamie Doe")).validate().is_ok());
    }

    #[test]
    fn test_create_rejects_blank_name() {
        let request = CreateDriverRequest {
            driver_id: "DRV-001".to_string(),
            name: " ".to_string(),
            cdl_number: "CDL-123".to_string(),
            carrier: Uuid::new_v4(),
        };
        assert!(request.validate().unwrap_err().field_errors().contains_key("name"));
    }
}

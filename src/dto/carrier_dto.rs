//! DTOs de carriers

use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::validate_not_empty;

fn default_operates_every_day() -> bool {
    true
}

/// Request para registrar un carrier
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCarrierRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_empty")]
    pub name: String,
    #[validate(length(min = 1, max = 20))]
    pub dot_number: String,
    #[validate(length(min = 1))]
    pub main_office_address: String,
    #[serde(default = "default_operates_every_day")]
    pub operates_every_day: bool,
}

/// Request para actualizar un carrier (campos opcionales)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCarrierRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub dot_number: Option<String>,
    #[validate(length(min = 1))]
    pub main_office_address: Option<String>,
    pub operates_every_day: Option<bool>,
}

use crate::dto::api_response::ApiResponse;
use crate::dto::carrier_dto::{CreateCarrierRequest, UpdateCarrierRequest};
use crate::models::carrier::Carrier;
use crate::repositories::carrier_repository::CarrierRepository;
use crate::utils::errors::{not_found_error, AppResult};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct CarrierController {
    repository: CarrierRepository,
}

impl CarrierController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CarrierRepository::new(pool),
        }
    }

    pub async fn create(&self, request: CreateCarrierRequest) -> AppResult<ApiResponse<Carrier>> {
        request.validate()?;

        let carrier = self
            .repository
            .create(
                request.name.trim(),
                request.dot_number.trim(),
                request.main_office_address.trim(),
                request.operates_every_day,
            )
            .await?;

        log::info!("🚚 Carrier creado: {} ({})", carrier.name, carrier.id);
        Ok(ApiResponse::success_with_message(carrier, "Carrier created successfully".to_string()))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Carrier> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Carrier", &id.to_string()))
    }

    pub async fn list(&self) -> AppResult<Vec<Carrier>> {
        self.repository.list().await
    }

    pub async fn update(&self, id: Uuid, request: UpdateCarrierRequest) -> AppResult<ApiResponse<Carrier>> {
        request.validate()?;
        let current = self.get_by_id(id).await?;

        let carrier = self
            .repository
            .update(
                current,
                request.name,
                request.dot_number,
                request.main_office_address,
                request.operates_every_day,
            )
            .await?;

        Ok(ApiResponse::success_with_message(carrier, "Carrier updated successfully".to_string()))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        if !self.repository.delete(id).await? {
            return Err(not_found_error("Carrier", &id.to_string()));
        }

        log::info!("🗑️ Carrier eliminado: {}", id);
        Ok(ApiResponse::message("Carrier deleted successfully".to_string()))
    }
}

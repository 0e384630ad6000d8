use crate::dto::api_response::ApiResponse;
use crate::dto::driver_dto::{CreateDriverRequest, DriverResponse, UpdateDriverRequest};
use crate::repositories::carrier_repository::CarrierRepository;
use crate::repositories::driver_repository::DriverRepository;
use crate::utils::errors::{conflict_error, not_found_error, validation_error, AppResult};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct DriverController {
    repository: DriverRepository,
    carriers: CarrierRepository,
}

impl DriverController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: DriverRepository::new(pool.clone()),
            carriers: CarrierRepository::new(pool),
        }
    }

    pub async fn create(&self, request: CreateDriverRequest) -> AppResult<ApiResponse<DriverResponse>> {
        request.validate()?;

        // driver_id único
        if self.repository.driver_id_exists(&request.driver_id, None).await? {
            return Err(conflict_error("Driver", "driver_id", &request.driver_id));
        }
        self.ensure_carrier(request.carrier).await?;

        let driver = self
            .repository
            .create(&request.driver_id, request.name.trim(), &request.cdl_number, request.carrier)
            .await?;

        log::info!("👤 Driver creado: {} ({})", driver.driver_id, driver.id);
        let response = self.get_by_id(driver.id).await?;
        Ok(ApiResponse::success_with_message(response, "Driver created successfully".to_string()))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<DriverResponse> {
        let driver = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Driver", &id.to_string()))?;

        Ok(driver.into())
    }

    pub async fn list(&self) -> AppResult<Vec<DriverResponse>> {
        let drivers = self.repository.list().await?;
        Ok(drivers.into_iter().map(DriverResponse::from).collect())
    }

    pub async fn update(&self, id: Uuid, request: UpdateDriverRequest) -> AppResult<ApiResponse<DriverResponse>> {
        request.validate()?;

        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Driver", &id.to_string()))?;

        if let Some(driver_id) = &request.driver_id {
            if self.repository.driver_id_exists(driver_id, Some(id)).await? {
                return Err(conflict_error("Driver", "driver_id", driver_id));
            }
        }
        if let Some(carrier) = request.carrier {
            self.ensure_carrier(carrier).await?;
        }

        self.repository
            .update(current, request.driver_id, request.name, request.cdl_number, request.carrier)
            .await?;

        let response = self.get_by_id(id).await?;
        Ok(ApiResponse::success_with_message(response, "Driver updated successfully".to_string()))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        if !self.repository.delete(id).await? {
            return Err(not_found_error("Driver", &id.to_string()));
        }

        log::info!("🗑️ Driver eliminado: {}", id);
        Ok(ApiResponse::message("Driver deleted successfully".to_string()))
    }

    async fn ensure_carrier(&self, carrier_id: Uuid) -> AppResult<()> {
        if self.carriers.find_by_id(carrier_id).await?.is_none() {
            return Err(validation_error("carrier", "Carrier does not exist"));
        }
        Ok(())
    }
}

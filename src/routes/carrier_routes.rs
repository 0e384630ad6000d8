use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use crate::controllers::carrier_controller::CarrierController;
use crate::dto::api_response::ApiResponse;
use crate::dto::carrier_dto::{CreateCarrierRequest, UpdateCarrierRequest};
use crate::models::carrier::Carrier;
use crate::state::AppState;
use crate::utils::errors::AppError;
use axum::http::StatusCode;
use uuid::Uuid;

pub fn create_carrier_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_carriers).post(create_carrier))
        .route("/:id", get(get_carrier).put(update_carrier).delete(delete_carrier))
}

async fn create_carrier(
    State(state): State<AppState>,
    Json(request): Json<CreateCarrierRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Carrier>>), AppError> {
    let controller = CarrierController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_carriers(State(state): State<AppState>) -> Result<Json<Vec<Carrier>>, AppError> {
    let controller = CarrierController::new(state.pool.clone());
    Ok(Json(controller.list().await?))
}

async fn get_carrier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Carrier>, AppError> {
    let controller = CarrierController::new(state.pool.clone());
    Ok(Json(controller.get_by_id(id).await?))
}

async fn update_carrier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCarrierRequest>,
) -> Result<Json<ApiResponse<Carrier>>, AppError> {
    let controller = CarrierController::new(state.pool.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_carrier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = CarrierController::new(state.pool.clone());
    Ok(Json(controller.delete(id).await?))
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use crate::controllers::trip_controller::TripController;
use crate::dto::route_dto::CalculateRouteResponse;
use crate::dto::trip_dto::{CreateTripRequest, TripDetailResponse, TripResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_trip_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trips).post(create_trip))
        .route("/:trip_id", get(get_trip).delete(delete_trip))
        .route("/:trip_id/calculate_route", post(calculate_route))
}

async fn create_trip(
    State(state): State<AppState>,
    Json(request): Json<CreateTripRequest>,
) -> Result<(StatusCode, Json<TripDetailResponse>), AppError> {
    let controller = TripController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_trips(State(state): State<AppState>) -> Result<Json<Vec<TripResponse>>, AppError> {
    let controller = TripController::new(state.pool.clone());
    Ok(Json(controller.list().await?))
}

async fn get_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<Json<TripDetailResponse>, AppError> {
    let controller = TripController::new(state.pool.clone());
    Ok(Json(controller.get_detail(&trip_id).await?))
}

async fn delete_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let controller = TripController::new(state.pool.clone());
    controller.delete(&trip_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn calculate_route(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<Json<CalculateRouteResponse>, AppError> {
    log::info!("🧮 calculate_route solicitado para trip {}", trip_id);
    let controller = TripController::new(state.pool.clone());
    let response = controller
        .calculate_route(&trip_id, state.routing.as_ref(), state.clock.as_ref(), &state.planning)
        .await?;
    Ok(Json(response))
}

//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tracing::debug;

use crate::sensors::DepartureSensor;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stops", get(list_stops))
        .route("/sensors", get(list_sensors))
        .route("/sensors/:unique_id", get(get_sensor))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Every configured stop with its sensor counts.
async fn list_stops(State(state): State<AppState>) -> Json<Vec<StopSummary>> {
    let stops = state.stops.read().await;
    Json(stops.iter().map(StopSummary::from).collect())
}

/// Every sensor of every stop, in stop then index order.
async fn list_sensors(State(state): State<AppState>) -> Json<SensorsResponse> {
    let stops = state.stops.read().await;
    let sensors = stops
        .iter()
        .flat_map(|stop| stop.sensors().iter().cloned())
        .collect();

    Json(SensorsResponse {
        name: state.name.to_string(),
        sensors,
    })
}

/// One sensor by unique id.
async fn get_sensor(
    State(state): State<AppState>,
    Path(unique_id): Path<String>,
) -> Result<Json<DepartureSensor>, AppError> {
    let stops = state.stops.read().await;
    stops
        .iter()
        .flat_map(|stop| stop.sensors())
        .find(|sensor| sensor.unique_id == unique_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound {
            message: format!("no sensor with id {unique_id}"),
        })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    NotFound { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
        };

        debug!(%status, message = %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

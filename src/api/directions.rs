//! Endpoints del despachador de direcciones

use axum::{extract::State, response::Json, routing::post, Router};
use serde_json::json;

use crate::dto::directions_dto::{
    DepartureMode, DevicePositionRequest, DirectionsRequest, DirectionsResponse,
};
use crate::services::DeparturePoint;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::geo::LatLng;

pub fn create_directions_router() -> Router<AppState> {
    Router::new()
        .route("/directions", post(launch_directions))
        .route("/directions/device-position", post(report_device_position))
}

/// Resolver el origen y delegar en el colaborador de navegación externo.
/// El fallo de geolocalización aflora como alerta descartable (503).
async fn launch_directions(
    State(state): State<AppState>,
    Json(request): Json<DirectionsRequest>,
) -> AppResult<Json<DirectionsResponse>> {
    let departure = match request.mode {
        DepartureMode::Gps => DeparturePoint::DeviceGps,
        DepartureMode::Text => {
            let origin = request
                .origin
                .filter(|o| !o.trim().is_empty())
                .ok_or_else(|| {
                    AppError::BadRequest("free-text departure requires an origin".to_string())
                })?;
            DeparturePoint::FreeText(origin)
        }
    };

    let outcome = state
        .directions
        .launch(
            departure,
            &request.destination_name,
            LatLng::new(request.lat, request.lng),
        )
        .await?;

    Ok(Json(DirectionsResponse { url: outcome.url }))
}

/// El cliente reporta la posición actual del dispositivo
async fn report_device_position(
    State(state): State<AppState>,
    Json(request): Json<DevicePositionRequest>,
) -> Json<serde_json::Value> {
    state
        .geolocator
        .report(LatLng::new(request.lat, request.lng));
    Json(json!({ "success": true }))
}

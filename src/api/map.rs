//! Endpoints del mapa
//!
//! La capa HTTP traduce los eventos de la UI (mapa listo, fin de arrastre,
//! cambio de filtro o consulta, zoom, clic en marcador) a llamadas sobre el
//! motor de sincronización, y devuelve el estado declarativo de la
//! superficie para que el cliente lo pinte con su SDK.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::json;

use crate::dto::map_dto::{
    CategoryFilterRequest, FetchOutcomeResponse, MapQueryRequest, MapReadyRequest, MarkersResponse,
    PanEndRequest, SelectPlaceRequest, ZoomDirection, ZoomRequest,
};
use crate::models::Place;
use crate::state::AppState;
use crate::utils::errors::AppResult;
use crate::utils::geo::LatLng;

pub fn create_map_router() -> Router<AppState> {
    Router::new()
        .route("/ready", post(map_ready))
        .route("/pan", post(pan_end))
        .route("/category", post(set_category))
        .route("/query", post(set_query))
        .route("/zoom", post(zoom))
        .route("/select", post(select_place))
        .route("/markers", get(get_markers))
}

/// El SDK del cliente reporta cargado; arranca el primer ciclo de fetch.
/// La posición del dispositivo, si llega, alimenta el recentrado inicial.
async fn map_ready(
    State(state): State<AppState>,
    Json(request): Json<MapReadyRequest>,
) -> Json<FetchOutcomeResponse> {
    if let Some(position) = request.position {
        state.geolocator.report(position);
    }

    let outcome = state.map_engine.ready().await;
    let mut response = FetchOutcomeResponse::from_fetch(outcome.fetch);
    response.recentred = Some(outcome.recentred);
    Json(response)
}

/// Fin de arrastre: nuevo centro y re-fetch
async fn pan_end(
    State(state): State<AppState>,
    Json(request): Json<PanEndRequest>,
) -> Json<FetchOutcomeResponse> {
    let outcome = state
        .map_engine
        .pan_end(LatLng::new(request.lat, request.lng))
        .await;
    Json(FetchOutcomeResponse::from_fetch(outcome))
}

async fn set_category(
    State(state): State<AppState>,
    Json(request): Json<CategoryFilterRequest>,
) -> Json<FetchOutcomeResponse> {
    let outcome = state.map_engine.set_category(request.content_type_id).await;
    Json(FetchOutcomeResponse::from_fetch(outcome))
}

async fn set_query(
    State(state): State<AppState>,
    Json(request): Json<MapQueryRequest>,
) -> Json<FetchOutcomeResponse> {
    let outcome = state.map_engine.set_query(request.keyword).await;
    Json(FetchOutcomeResponse::from_fetch(outcome))
}

/// Zoom con los controles +/- ; no refetcha
async fn zoom(
    State(state): State<AppState>,
    Json(request): Json<ZoomRequest>,
) -> Json<serde_json::Value> {
    match request.direction {
        ZoomDirection::In => state.map_engine.zoom_in(),
        ZoomDirection::Out => state.map_engine.zoom_out(),
    }
    Json(json!({ "level": state.canvas.snapshot().level }))
}

/// Clic en un marcador: selecciona y recentra, nunca refetcha
async fn select_place(
    State(state): State<AppState>,
    Json(request): Json<SelectPlaceRequest>,
) -> AppResult<Json<Place>> {
    let place = state.map_engine.select_place(&request.place_id).await?;
    Ok(Json(place))
}

/// Estado declarativo completo de la superficie del mapa
async fn get_markers(State(state): State<AppState>) -> Json<MarkersResponse> {
    Json(MarkersResponse {
        fetching: state.map_engine.is_fetching().await,
        snapshot: state.canvas.snapshot(),
        selected: state.map_engine.selected_place().await,
    })
}

//! Endpoints del workflow de búsqueda y alta

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::json;
use validator::Validate;

use crate::dto::search_dto::{AddStagedRequest, AddStagedResponse, SearchRequest, SearchResponse, SelectDayRequest};
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_search_router() -> Router<AppState> {
    Router::new()
        .route("/search", post(search_places))
        .route("/search/session", get(get_session))
        .route("/search/day", post(select_day))
        .route("/search/add", post(add_to_day))
        .route("/search/leave", post(leave_workflow))
}

/// Buscar candidatos y escenificarlos para el día seleccionado
async fn search_places(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> AppResult<Json<SearchResponse>> {
    request.validate()?;

    let outcome = state.search.search(&request.keyword).await?;
    Ok(Json(SearchResponse {
        results: outcome.results,
        degraded: outcome.degraded,
        day_index: state.search.selected_day().await,
    }))
}

/// Estado de la sesión de escenificado (resultados + marcadores de alta)
async fn get_session(State(state): State<AppState>) -> Json<serde_json::Value> {
    let results = state.search.staged_results().await;
    let added: Vec<String> = state.search.added_source_ids().await.into_iter().collect();
    Json(json!({
        "query": state.search.staged_query().await,
        "results": results,
        "addedSourceIds": added,
        "dayIndex": state.search.selected_day().await,
    }))
}

/// Cambiar el día destino (limpia el marcador de sesión)
async fn select_day(
    State(state): State<AppState>,
    Json(request): Json<SelectDayRequest>,
) -> AppResult<Json<serde_json::Value>> {
    state.search.select_day(request.day_index).await?;
    Ok(Json(json!({
        "success": true,
        "dayIndex": request.day_index,
    })))
}

/// Añadir un resultado escenificado al día seleccionado
async fn add_to_day(
    State(state): State<AppState>,
    Json(request): Json<AddStagedRequest>,
) -> AppResult<Json<AddStagedResponse>> {
    let outcome = state.search.add_to_day(request.result_index).await?;
    Ok(Json(AddStagedResponse {
        entry: outcome.entry,
        already_added: outcome.already_added,
        day_index: outcome.day_index,
        persisted: outcome.persisted,
    }))
}

/// Salir del workflow descarta resultados y marcadores
async fn leave_workflow(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.search.leave().await;
    Json(json!({ "success": true }))
}

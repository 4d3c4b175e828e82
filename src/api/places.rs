//! Endpoints de catálogo de lugares (detalle y exploración por área)

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::models::place::{category_name, AREA_CODES};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub fn create_places_router() -> Router<AppState> {
    Router::new()
        .route("/explore", get(explore))
        .route("/:id/detail", get(place_detail))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExploreQuery {
    /// Nombre de área en coreano (서울, 부산, ...); alternativa al código
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub area_code: Option<i32>,
    #[serde(default)]
    pub content_type_id: Option<i32>,
    #[serde(default = "default_rows")]
    pub num_of_rows: u32,
    #[serde(default = "default_page")]
    pub page_no: u32,
}

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_rows() -> u32 {
    20
}

fn default_page() -> u32 {
    1
}

fn default_locale() -> String {
    "en".to_string()
}

/// Exploración por área; el fallo de transporte degrada a lista vacía
async fn explore(
    State(state): State<AppState>,
    Query(query): Query<ExploreQuery>,
) -> Json<serde_json::Value> {
    // el nombre de área gana al código cuando resuelve
    let area_code = query
        .area
        .as_deref()
        .and_then(|name| AREA_CODES.get(name).copied())
        .or(query.area_code);

    let (places, degraded) = match state
        .search
        .area_browse(area_code, query.content_type_id, query.num_of_rows, query.page_no)
        .await
    {
        Ok(places) => (places, false),
        Err(e) => {
            log::warn!("⚠️ Area browse failed, degrading to empty: {}", e);
            (Vec::new(), true)
        }
    };

    Json(json!({
        "places": places,
        "degraded": degraded,
    }))
}

/// Detalle de un lugar; una identidad que ya no resuelve es "not found",
/// no un error de transporte
async fn place_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> AppResult<Json<serde_json::Value>> {
    match state.search.place_detail(&id).await {
        Ok(Some(detail)) => {
            let category = category_name(detail.content_type_id, &query.locale);
            Ok(Json(json!({ "detail": detail, "categoryName": category })))
        }
        Ok(None) => Err(AppError::NotFound(format!(
            "Place with id '{}' not found",
            id
        ))),
        Err(e) => {
            log::warn!("⚠️ Detail lookup failed for {}: {}", id, e);
            Err(AppError::NotFound(format!(
                "Place with id '{}' not found",
                id
            )))
        }
    }
}

//! Endpoints de favoritos

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{delete, get, post},
    Router,
};

use crate::dto::favorites_dto::{FavoritesListResponse, ToggleResponse};
use crate::models::Place;
use crate::state::AppState;

pub fn create_favorites_router() -> Router<AppState> {
    Router::new()
        .route("/favorites", get(list_favorites))
        .route("/favorites/toggle", post(toggle_favorite))
        .route("/favorites/:id", delete(remove_favorite))
}

async fn list_favorites(State(state): State<AppState>) -> Json<FavoritesListResponse> {
    let favorites = state.favorites.list().await;
    let count = favorites.len();
    Json(FavoritesListResponse { favorites, count })
}

/// Toggle desde el mapa o la vista de detalle
async fn toggle_favorite(
    State(state): State<AppState>,
    Json(place): Json<Place>,
) -> Json<ToggleResponse> {
    let outcome = state.favorites.toggle(&place).await;
    Json(ToggleResponse {
        added: outcome.added,
        count: outcome.count,
        persisted: outcome.persisted,
    })
}

/// Baja directa desde la lista de favoritos
async fn remove_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<ToggleResponse> {
    let outcome = state.favorites.remove(&id).await;
    Json(ToggleResponse {
        added: outcome.added,
        count: outcome.count,
        persisted: outcome.persisted,
    })
}

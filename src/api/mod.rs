//! API endpoints
//!
//! Este módulo contiene los endpoints de la API.

pub mod directions;
pub mod favorites;
pub mod map;
pub mod places;
pub mod planner;
pub mod search;

use axum::Router;

use crate::state::AppState;

/// Crear el router principal de la API
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/planner", planner::create_planner_router())
        .nest("/map", map::create_map_router())
        .nest("/places", places::create_places_router())
        .merge(search::create_search_router())
        .merge(favorites::create_favorites_router())
        .merge(directions::create_directions_router())
}

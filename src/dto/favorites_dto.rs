use serde::Serialize;

use crate::models::FavoriteEntry;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesListResponse {
    pub favorites: Vec<FavoriteEntry>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    /// `true` si el lugar quedó marcado tras el toggle
    pub added: bool,
    pub count: usize,
    pub persisted: bool,
}

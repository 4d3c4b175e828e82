use serde::{Deserialize, Serialize};

use crate::map::CanvasSnapshot;
use crate::models::Place;
use crate::services::map_engine::FetchOutcome;
use crate::utils::geo::LatLng;

// El cliente reporta la posición del dispositivo al declarar el mapa listo
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapReadyRequest {
    #[serde(default)]
    pub position: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanEndRequest {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFilterRequest {
    #[serde(default)]
    pub content_type_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapQueryRequest {
    #[serde(default)]
    pub keyword: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomDirection {
    In,
    Out,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomRequest {
    pub direction: ZoomDirection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectPlaceRequest {
    pub place_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchOutcomeResponse {
    pub applied: bool,
    pub stale: bool,
    pub places: usize,
    pub degraded: bool,
    pub recentred: Option<bool>,
}

impl FetchOutcomeResponse {
    pub fn from_fetch(outcome: FetchOutcome) -> Self {
        Self {
            applied: outcome.applied,
            stale: outcome.stale,
            places: outcome.places,
            degraded: outcome.degraded,
            recentred: None,
        }
    }
}

// Estado declarativo completo que el cliente pinta con su SDK
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkersResponse {
    pub fetching: bool,
    pub snapshot: CanvasSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<Place>,
}

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Place, TripPlaceEntry};

#[derive(Debug, Deserialize, Validate)]
pub struct SearchRequest {
    #[validate(length(min = 1, message = "keyword must not be empty"))]
    pub keyword: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<Place>,
    /// `true` cuando el colaborador falló y se degradó a "sin resultados"
    pub degraded: bool,
    pub day_index: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectDayRequest {
    pub day_index: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStagedRequest {
    pub result_index: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStagedResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<TripPlaceEntry>,
    pub already_added: bool,
    pub day_index: usize,
    pub persisted: bool,
}

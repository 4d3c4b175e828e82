use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{MoveDirection, Trip};

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            message: Some(message),
            data: None,
        }
    }
}

// Request para crear un viaje
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

// Query para el borrado (la confirmación viaja con la petición)
#[derive(Debug, Deserialize)]
pub struct DeleteTripQuery {
    #[serde(default)]
    pub confirmed: bool,
}

// Resumen de viaje para el listado (más reciente primero)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSummaryResponse {
    pub id: String,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub day_count: usize,
    pub total_places: usize,
    pub created_at: DateTime<Utc>,
}

impl From<&Trip> for TripSummaryResponse {
    fn from(trip: &Trip) -> Self {
        Self {
            id: trip.id.clone(),
            title: trip.title.clone(),
            start_date: trip.start_date,
            end_date: trip.end_date,
            day_count: trip.days.len(),
            total_places: trip.total_places(),
            created_at: trip.created_at,
        }
    }
}

// Response de una mutación con el flag de persistencia observable
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripMutationResponse {
    pub trip: Trip,
    pub persisted: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTripResponse {
    pub deleted: bool,
    pub persisted: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovePlaceRequest {
    pub direction: MoveDirection,
}

#[derive(Debug, Deserialize)]
pub struct MemoRequest {
    #[serde(default)]
    pub memo: String,
}

#[derive(Debug, Deserialize)]
pub struct TimeRequest {
    #[serde(default)]
    pub time: String,
}

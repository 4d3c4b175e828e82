use serde::{Deserialize, Serialize};

// Modo de resolución del punto de partida
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepartureMode {
    Gps,
    Text,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionsRequest {
    pub mode: DepartureMode,
    /// Texto libre de origen; solo en modo `text`, opaco y sin validar
    #[serde(default)]
    pub origin: Option<String>,
    pub destination_name: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionsResponse {
    pub url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicePositionRequest {
    pub lat: f64,
    pub lng: f64,
}

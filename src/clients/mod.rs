//! Clientes de colaboradores externos
//!
//! Este módulo define las interfaces de capacidad sobre los colaboradores
//! externos (búsqueda de lugares, búsqueda secundaria por cercanía) y los
//! clientes HTTP concretos que las implementan. El núcleo solo conoce las
//! interfaces; los clientes concretos se inyectan al construir el estado.

pub mod device;
pub mod kakao_client;
pub mod tour_client;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Place;
use crate::utils::geo::LatLng;

pub use tour_client::{PlaceDetail, TourApiClient};

/// Colaborador primario de búsqueda de lugares (Tour API)
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    /// Búsqueda por palabra clave; "sin resultados" es un resultado normal
    async fn search_keyword(
        &self,
        keyword: &str,
        content_type_id: Option<i32>,
        num_of_rows: u32,
    ) -> Result<Vec<Place>>;

    /// Búsqueda por centro + radio en metros, ordenada por distancia
    async fn location_based(
        &self,
        center: LatLng,
        radius_m: u32,
        content_type_id: Option<i32>,
        num_of_rows: u32,
    ) -> Result<Vec<Place>>;

    /// Listado por código de área, con paginación
    async fn area_based(
        &self,
        area_code: Option<i32>,
        content_type_id: Option<i32>,
        num_of_rows: u32,
        page_no: u32,
    ) -> Result<Vec<Place>>;

    /// Detalle de un lugar; `None` cuando la identidad ya no resuelve
    async fn detail_common(&self, content_id: &str) -> Result<Option<PlaceDetail>>;
}

/// Colaborador secundario de búsqueda genérica (solo para suplementar
/// resultados escasos en el mapa)
#[async_trait]
pub trait NearbyPlaceSearch: Send + Sync {
    async fn search_nearby(
        &self,
        keyword: &str,
        center: LatLng,
        radius_m: u32,
    ) -> Result<Vec<Place>>;
}

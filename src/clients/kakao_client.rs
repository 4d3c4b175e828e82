//! Cliente de búsqueda local de Kakao
//!
//! Colaborador secundario: búsqueda genérica por palabra clave alrededor de
//! un centro (farmacias, cajeros, hospitales...). Solo se usa para
//! suplementar resultados escasos del colaborador primario en el mapa.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::clients::NearbyPlaceSearch;
use crate::models::Place;
use crate::utils::geo::LatLng;

/// Radio máximo que acepta el API local de Kakao
const MAX_RADIUS_M: u32 = 20_000;
/// Tamaño de página para el suplemento
const PAGE_SIZE: u32 = 15;

#[derive(Debug, Deserialize)]
struct KakaoSearchResponse {
    documents: Vec<KakaoDocument>,
}

#[derive(Debug, Deserialize)]
struct KakaoDocument {
    #[serde(default)]
    id: String,
    #[serde(default)]
    place_name: String,
    #[serde(default)]
    road_address_name: String,
    #[serde(default)]
    address_name: String,
    /// Longitud
    #[serde(default)]
    x: String,
    /// Latitud
    #[serde(default)]
    y: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    distance: String,
}

impl KakaoDocument {
    fn into_place(self) -> Place {
        let addr = if self.road_address_name.is_empty() {
            self.address_name
        } else {
            self.road_address_name
        };

        Place {
            content_id: self.id,
            content_type_id: 0,
            title: self.place_name,
            addr,
            image: String::new(),
            mapx: self.x,
            mapy: self.y,
            tel: if self.phone.is_empty() { None } else { Some(self.phone) },
            dist: self.distance.parse().ok(),
        }
    }
}

pub struct KakaoLocalClient {
    base_url: String,
    rest_api_key: String,
    client: reqwest::Client,
}

impl KakaoLocalClient {
    pub fn new(base_url: String, rest_api_key: String, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            rest_api_key,
            client,
        }
    }
}

#[async_trait]
impl NearbyPlaceSearch for KakaoLocalClient {
    async fn search_nearby(
        &self,
        keyword: &str,
        center: LatLng,
        radius_m: u32,
    ) -> Result<Vec<Place>> {
        let url = format!(
            "{}/v2/local/search/keyword.json?query={}&x={}&y={}&radius={}&sort=distance&size={}",
            self.base_url,
            urlencoding::encode(keyword),
            center.lng,
            center.lat,
            radius_m.min(MAX_RADIUS_M),
            PAGE_SIZE
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("KakaoAK {}", self.rest_api_key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::error!("❌ Kakao local search failed with status {}", status);
            return Err(anyhow!("Kakao local search returned status {}", status));
        }

        let parsed: KakaoSearchResponse = response.json().await?;
        let places: Vec<Place> = parsed
            .documents
            .into_iter()
            .map(KakaoDocument::into_place)
            .collect();

        log::info!("🏪 Kakao nearby '{}': {} results", keyword, places.len());
        Ok(places)
    }
}

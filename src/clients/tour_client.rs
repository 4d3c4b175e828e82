//! Cliente del Tour API coreano (KorService2)
//!
//! Implementa el colaborador primario de búsqueda de lugares. El API
//! devuelve dos formatos de error distintos (con y sin envoltorio
//! `response`) y entrega `items` como array, objeto suelto o string vacío,
//! así que el parseo navega el JSON de forma tolerante antes de tipar cada
//! item.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::clients::PlaceSearch;
use crate::models::Place;
use crate::utils::geo::LatLng;

/// Detalle común de un lugar (endpoint detailCommon2)
#[derive(Debug, Clone, serde::Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetail {
    pub content_id: String,
    pub content_type_id: i32,
    pub title: String,
    pub overview: String,
    pub addr: String,
    pub homepage: String,
    pub tel: String,
    pub mapx: String,
    pub mapy: String,
    pub image: String,
}

/// Item crudo tal y como lo entrega el API
#[derive(Debug, Deserialize)]
struct RawTourItem {
    #[serde(default)]
    contentid: String,
    #[serde(default)]
    contenttypeid: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    addr1: String,
    #[serde(default)]
    firstimage: String,
    #[serde(default)]
    mapx: String,
    #[serde(default)]
    mapy: String,
    #[serde(default)]
    tel: String,
    #[serde(default)]
    dist: String,
    #[serde(default)]
    overview: String,
    #[serde(default)]
    homepage: String,
}

impl RawTourItem {
    fn into_place(self) -> Place {
        Place {
            content_id: self.contentid,
            content_type_id: self.contenttypeid.parse().unwrap_or(0),
            title: self.title,
            addr: self.addr1,
            image: self.firstimage,
            mapx: self.mapx,
            mapy: self.mapy,
            tel: if self.tel.is_empty() { None } else { Some(self.tel) },
            dist: self.dist.parse().ok(),
        }
    }

    fn into_detail(self) -> PlaceDetail {
        PlaceDetail {
            content_id: self.contentid,
            content_type_id: self.contenttypeid.parse().unwrap_or(0),
            title: self.title,
            overview: self.overview,
            addr: self.addr1,
            homepage: self.homepage,
            tel: self.tel,
            mapx: self.mapx,
            mapy: self.mapy,
            image: self.firstimage,
        }
    }
}

pub struct TourApiClient {
    base_url: String,
    service_key: String,
    client: reqwest::Client,
}

impl TourApiClient {
    pub fn new(base_url: String, service_key: String, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            service_key,
            client,
        }
    }

    /// Llamada genérica a un endpoint del KorService2
    async fn fetch_items(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Vec<Value>> {
        // Parámetros comunes que exige el API
        let mut query_parts = vec![
            format!("serviceKey={}", self.service_key),
            "MobileOS=ETC".to_string(),
            "MobileApp=KTourGuide".to_string(),
            "_type=json".to_string(),
        ];
        for (key, value) in params {
            query_parts.push(format!("{}={}", key, urlencoding::encode(value)));
        }

        let url = format!("{}/{}?{}", self.base_url, endpoint, query_parts.join("&"));
        log::debug!("🗺️ Tour API request: {}", endpoint);

        let response = self
            .client
            .get(&url)
            .header("User-Agent", "TourPlanning/1.0")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::error!("❌ Tour API failed with status {}", status);
            return Err(anyhow!("Tour API returned status {}", status));
        }

        let body: Value = response.json().await?;

        // Formato de error v2 sin envoltorio response
        if let Some(code) = body.get("resultCode").and_then(Value::as_str) {
            if code != "0000" {
                let msg = body
                    .get("resultMsg")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown");
                log::error!("❌ Tour API error: {}", msg);
                return Err(anyhow!("Tour API error: {}", msg));
            }
        }

        // Formato de éxito v2
        if let Some(code) = body
            .pointer("/response/header/resultCode")
            .and_then(Value::as_str)
        {
            if code != "0000" {
                let msg = body
                    .pointer("/response/header/resultMsg")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown");
                log::error!("❌ Tour API error: {}", msg);
                return Err(anyhow!("Tour API error: {}", msg));
            }
        }

        // items puede ser array, objeto único o string vacío
        let items = match body.pointer("/response/body/items/item") {
            Some(Value::Array(arr)) => arr.clone(),
            Some(Value::Object(obj)) => vec![Value::Object(obj.clone())],
            _ => Vec::new(),
        };

        Ok(items)
    }

    fn parse_places(items: Vec<Value>) -> Vec<Place> {
        items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<RawTourItem>(item).ok())
            .map(RawTourItem::into_place)
            .collect()
    }
}

#[async_trait]
impl PlaceSearch for TourApiClient {
    async fn search_keyword(
        &self,
        keyword: &str,
        content_type_id: Option<i32>,
        num_of_rows: u32,
    ) -> Result<Vec<Place>> {
        let mut params = vec![
            ("keyword", keyword.to_string()),
            ("numOfRows", num_of_rows.to_string()),
            ("pageNo", "1".to_string()),
            ("arrange", "A".to_string()),
        ];
        if let Some(ct) = content_type_id {
            params.push(("contentTypeId", ct.to_string()));
        }

        let items = self.fetch_items("searchKeyword2", &params).await?;
        let places = Self::parse_places(items);
        log::info!("🔍 Keyword search '{}': {} results", keyword, places.len());
        Ok(places)
    }

    async fn location_based(
        &self,
        center: LatLng,
        radius_m: u32,
        content_type_id: Option<i32>,
        num_of_rows: u32,
    ) -> Result<Vec<Place>> {
        let mut params = vec![
            ("mapX", center.lng.to_string()),
            ("mapY", center.lat.to_string()),
            ("radius", radius_m.to_string()),
            ("numOfRows", num_of_rows.to_string()),
            ("pageNo", "1".to_string()),
            ("arrange", "E".to_string()),
        ];
        if let Some(ct) = content_type_id {
            params.push(("contentTypeId", ct.to_string()));
        }

        let items = self.fetch_items("locationBasedList2", &params).await?;
        let places = Self::parse_places(items);
        log::info!(
            "📍 Location search ({:.4}, {:.4}) r={}m: {} results",
            center.lat,
            center.lng,
            radius_m,
            places.len()
        );
        Ok(places)
    }

    async fn area_based(
        &self,
        area_code: Option<i32>,
        content_type_id: Option<i32>,
        num_of_rows: u32,
        page_no: u32,
    ) -> Result<Vec<Place>> {
        let mut params = vec![
            ("numOfRows", num_of_rows.to_string()),
            ("pageNo", page_no.to_string()),
            ("arrange", "Q".to_string()),
        ];
        if let Some(area) = area_code {
            params.push(("areaCode", area.to_string()));
        }
        if let Some(ct) = content_type_id {
            params.push(("contentTypeId", ct.to_string()));
        }

        let items = self.fetch_items("areaBasedList2", &params).await?;
        Ok(Self::parse_places(items))
    }

    async fn detail_common(&self, content_id: &str) -> Result<Option<PlaceDetail>> {
        let params = vec![("contentId", content_id.to_string())];
        let items = self.fetch_items("detailCommon2", &params).await?;

        let detail = items
            .into_iter()
            .next()
            .and_then(|item| serde_json::from_value::<RawTourItem>(item).ok())
            .map(RawTourItem::into_detail);

        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_item_into_place() {
        let raw: RawTourItem = serde_json::from_value(serde_json::json!({
            "contentid": "126508",
            "contenttypeid": "12",
            "title": "경복궁",
            "addr1": "서울특별시 종로구 사직로 161",
            "firstimage": "http://example.com/a.jpg",
            "mapx": "126.9769930325",
            "mapy": "37.5788222356",
            "tel": "02-3700-3900",
            "dist": "523.4"
        }))
        .unwrap();

        let place = raw.into_place();
        assert_eq!(place.content_id, "126508");
        assert_eq!(place.content_type_id, 12);
        assert_eq!(place.tel.as_deref(), Some("02-3700-3900"));
        assert!((place.dist.unwrap() - 523.4).abs() < 1e-9);
        assert!(place.is_mappable());
    }

    #[test]
    fn test_raw_item_tolerates_missing_fields() {
        let raw: RawTourItem =
            serde_json::from_value(serde_json::json!({ "title": "이름만" })).unwrap();
        let place = raw.into_place();
        assert_eq!(place.content_type_id, 0);
        assert!(place.tel.is_none());
        assert!(place.dist.is_none());
        assert!(!place.is_mappable());
    }
}

//! Modelo de lugar turístico
//!
//! Un `Place` es un punto de interés tal y como lo entrega cualquier
//! colaborador de búsqueda (Tour API o búsqueda local secundaria). Las
//! coordenadas llegan como strings y se validan solo al momento de mapear.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::utils::geo::{haversine_km, LatLng};

/// Códigos de categoría del Tour API (contentTypeId)
pub mod content_types {
    pub const ATTRACTIONS: i32 = 12;
    pub const CULTURE: i32 = 14;
    pub const FESTIVALS: i32 = 15;
    pub const TRAVEL_COURSES: i32 = 25;
    pub const LEISURE: i32 = 28;
    pub const ACCOMMODATION: i32 = 32;
    pub const SHOPPING: i32 = 38;
    pub const RESTAURANTS: i32 = 39;
}

lazy_static! {
    /// Códigos de área del Tour API, por nombre coreano
    pub static ref AREA_CODES: HashMap<&'static str, i32> = {
        let mut m = HashMap::new();
        m.insert("서울", 1);
        m.insert("인천", 2);
        m.insert("대전", 3);
        m.insert("대구", 4);
        m.insert("광주", 5);
        m.insert("부산", 6);
        m.insert("울산", 7);
        m.insert("세종", 8);
        m.insert("경기", 31);
        m.insert("강원", 32);
        m.insert("충북", 33);
        m.insert("충남", 34);
        m.insert("경북", 35);
        m.insert("경남", 36);
        m.insert("전북", 37);
        m.insert("전남", 38);
        m.insert("제주", 39);
        m
    };

    /// Nombres de categoría por locale (ko/en/ja/zh)
    static ref CATEGORY_NAMES: HashMap<i32, HashMap<&'static str, &'static str>> = {
        let mut m = HashMap::new();
        let mut insert = |id: i32, ko, en, ja, zh| {
            let mut names = HashMap::new();
            names.insert("ko", ko);
            names.insert("en", en);
            names.insert("ja", ja);
            names.insert("zh", zh);
            m.insert(id, names);
        };
        insert(content_types::ATTRACTIONS, "관광지", "Attraction", "観光地", "景点");
        insert(content_types::CULTURE, "문화시설", "Culture", "文化施設", "文化设施");
        insert(content_types::FESTIVALS, "축제/행사", "Festival", "祭り", "节庆");
        insert(content_types::TRAVEL_COURSES, "여행코스", "Course", "コース", "路线");
        insert(content_types::LEISURE, "레포츠", "Leisure", "レジャー", "休闲");
        insert(content_types::ACCOMMODATION, "숙박", "Stay", "宿泊", "住宿");
        insert(content_types::SHOPPING, "쇼핑", "Shopping", "ショッピング", "购物");
        insert(content_types::RESTAURANTS, "음식점", "Restaurant", "レストラン", "餐厅");
        m
    };
}

/// Nombre localizado de una categoría; cae a inglés y después a "Place"
pub fn category_name(content_type_id: i32, locale: &str) -> &'static str {
    CATEGORY_NAMES
        .get(&content_type_id)
        .and_then(|names| names.get(locale).or_else(|| names.get("en")))
        .copied()
        .unwrap_or("Place")
}

/// Icono de categoría para las tarjetas y marcadores
pub fn category_icon(content_type_id: i32) -> &'static str {
    match content_type_id {
        content_types::ATTRACTIONS => "🏛️",
        content_types::CULTURE => "🎭",
        content_types::FESTIVALS => "🎉",
        content_types::TRAVEL_COURSES => "🗺️",
        content_types::LEISURE => "⛷️",
        content_types::ACCOMMODATION => "🏨",
        content_types::SHOPPING => "🛍️",
        content_types::RESTAURANTS => "🍽️",
        _ => "📍",
    }
}

/// Punto de interés entregado por un colaborador de búsqueda
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    /// Identidad estable dentro de su fuente (no única entre fuentes)
    pub content_id: String,
    pub content_type_id: i32,
    pub title: String,
    pub addr: String,
    #[serde(default)]
    pub image: String,
    /// Longitud, tal y como llega del colaborador
    #[serde(default)]
    pub mapx: String,
    /// Latitud, tal y como llega del colaborador
    #[serde(default)]
    pub mapy: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tel: Option<String>,
    /// Distancia en metros al punto de referencia; transitoria, no se persiste
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dist: Option<f64>,
}

impl Place {
    /// Coordenadas parseadas, solo si ambas son numéricas y positivas.
    ///
    /// El corte `> 0` replica el filtro de la fuente de datos coreana:
    /// descarta coordenadas vacías o "0" sin tratar el ecuador/meridiano,
    /// que no aparecen en este dataset.
    pub fn coords(&self) -> Option<LatLng> {
        let lat: f64 = self.mapy.parse().ok()?;
        let lng: f64 = self.mapx.parse().ok()?;
        if lat > 0.0 && lng > 0.0 {
            Some(LatLng::new(lat, lng))
        } else {
            None
        }
    }

    /// Un lugar solo se renderiza en el mapa si tiene coordenadas mapeables
    pub fn is_mappable(&self) -> bool {
        self.coords().is_some()
    }

    /// Distancia haversine en km desde `center`; `None` si no es mapeable
    pub fn distance_from(&self, center: LatLng) -> Option<f64> {
        self.coords().map(|c| haversine_km(center, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place_at(mapx: &str, mapy: &str) -> Place {
        Place {
            content_id: "1".to_string(),
            content_type_id: content_types::ATTRACTIONS,
            title: "경복궁".to_string(),
            addr: "서울특별시 종로구".to_string(),
            image: String::new(),
            mapx: mapx.to_string(),
            mapy: mapy.to_string(),
            tel: None,
            dist: None,
        }
    }

    #[test]
    fn test_coords_valid() {
        let p = place_at("126.9770", "37.5796");
        let c = p.coords().unwrap();
        assert!((c.lat - 37.5796).abs() < 1e-9);
        assert!((c.lng - 126.9770).abs() < 1e-9);
    }

    #[test]
    fn test_coords_rejects_empty_and_zero() {
        assert!(place_at("", "").coords().is_none());
        assert!(place_at("0", "0").coords().is_none());
        assert!(place_at("126.97", "abc").coords().is_none());
    }

    #[test]
    fn test_coords_rejects_non_positive() {
        // comportamiento heredado de la fuente: solo coordenadas positivas
        assert!(place_at("-73.98", "40.74").coords().is_none());
    }

    #[test]
    fn test_category_name_locale_fallback() {
        assert_eq!(category_name(content_types::RESTAURANTS, "ko"), "음식점");
        assert_eq!(category_name(content_types::RESTAURANTS, "fr"), "Restaurant");
        assert_eq!(category_name(99, "en"), "Place");
    }

    #[test]
    fn test_category_icon_default() {
        assert_eq!(category_icon(content_types::SHOPPING), "🛍️");
        assert_eq!(category_icon(0), "📍");
    }
}

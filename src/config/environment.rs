//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;
use std::path::PathBuf;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    /// Directorio del almacenamiento clave-valor persistente
    pub data_dir: PathBuf,
    // Tour API (colaborador primario de búsqueda)
    pub tour_api_base_url: String,
    pub tour_api_key: String,
    // Kakao Local (colaborador secundario de búsqueda)
    pub kakao_base_url: String,
    pub kakao_rest_api_key: String,
    // Límites de las llamadas externas
    pub search_timeout_secs: u64,
    pub geolocation_timeout_secs: u64,
    // Motor del mapa
    pub map_radius_m: u32,
    pub map_gps_anchored: bool,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            data_dir: env::var("DATA_DIR")
                .unwrap_or_else(|_| "./data".to_string())
                .into(),
            tour_api_base_url: env::var("TOUR_API_BASE_URL")
                .unwrap_or_else(|_| "https://apis.data.go.kr/B551011/KorService2".to_string()),
            tour_api_key: env::var("TOUR_API_KEY").expect("TOUR_API_KEY must be set"),
            kakao_base_url: env::var("KAKAO_BASE_URL")
                .unwrap_or_else(|_| "https://dapi.kakao.com".to_string()),
            kakao_rest_api_key: env::var("KAKAO_REST_API_KEY")
                .expect("KAKAO_REST_API_KEY must be set"),
            search_timeout_secs: env::var("SEARCH_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("SEARCH_TIMEOUT_SECS must be a valid number"),
            geolocation_timeout_secs: env::var("GEOLOCATION_TIMEOUT_SECS")
                .unwrap_or_else(|_| "8".to_string())
                .parse()
                .expect("GEOLOCATION_TIMEOUT_SECS must be a valid number"),
            map_radius_m: env::var("MAP_RADIUS_M")
                .unwrap_or_else(|_| "20000".to_string())
                .parse()
                .expect("MAP_RADIUS_M must be a valid number"),
            map_gps_anchored: env::var("MAP_GPS_ANCHORED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

impl EnvironmentConfig {
    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Configuración mínima para tests, sin tocar el entorno
    pub fn for_tests(data_dir: PathBuf) -> Self {
        Self {
            environment: "test".to_string(),
            port: 0,
            host: "127.0.0.1".to_string(),
            data_dir,
            tour_api_base_url: "http://localhost:0".to_string(),
            tour_api_key: String::new(),
            kakao_base_url: "http://localhost:0".to_string(),
            kakao_rest_api_key: String::new(),
            search_timeout_secs: 10,
            geolocation_timeout_secs: 8,
            map_radius_m: 20_000,
            map_gps_anchored: false,
        }
    }
}

//! Despachador de direcciones
//!
//! Resuelve un punto de partida con significado humano (GPS del dispositivo
//! o texto libre) y delega la ruta en el colaborador externo de navegación.
//! No calcula rutas ni rastrea si la herramienta externa tuvo éxito.

use std::sync::Arc;

use crate::clients::device::{Geolocator, UrlLauncher};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::geo::LatLng;

/// Esquema de enlace del colaborador para origen con coordenadas
const LINK_BASE: &str = "https://map.kakao.com/link/from";
/// URL de ruta con extremos nombrados, para origen de texto libre
const ROUTE_BASE: &str = "https://map.kakao.com";

/// Punto de partida de la ruta
#[derive(Debug, Clone)]
pub enum DeparturePoint {
    /// Posición actual del dispositivo (lookup asíncrono con timeout)
    DeviceGps,
    /// String opaco; se entrega sin validar al colaborador externo
    FreeText(String),
}

/// Resultado del despacho: la URL abierta en el colaborador externo
#[derive(Debug, Clone)]
pub struct DirectionsOutcome {
    pub url: String,
}

pub struct DirectionsService {
    geolocator: Arc<dyn Geolocator>,
    launcher: Arc<dyn UrlLauncher>,
    geolocation_timeout_secs: u64,
}

impl DirectionsService {
    pub fn new(
        geolocator: Arc<dyn Geolocator>,
        launcher: Arc<dyn UrlLauncher>,
        geolocation_timeout_secs: u64,
    ) -> Self {
        Self {
            geolocator,
            launcher,
            geolocation_timeout_secs,
        }
    }

    /// Resolver el origen y abrir la experiencia externa de navegación.
    ///
    /// El fallo de geolocalización aflora como error descartable; el de la
    /// herramienta externa no se observa (fire-and-forget).
    pub async fn launch(
        &self,
        departure: DeparturePoint,
        destination_name: &str,
        destination: LatLng,
    ) -> AppResult<DirectionsOutcome> {
        let url = match departure {
            DeparturePoint::DeviceGps => {
                let timeout = std::time::Duration::from_secs(self.geolocation_timeout_secs);
                let origin = tokio::time::timeout(timeout, self.geolocator.current_position())
                    .await
                    .map_err(|_| AppError::Geolocation("geolocation timed out".to_string()))?
                    .map_err(|e| AppError::Geolocation(e.to_string()))?;

                format!(
                    "{}/{},{},{}/to/{},{},{}",
                    LINK_BASE,
                    urlencoding::encode("내 위치"),
                    origin.lat,
                    origin.lng,
                    urlencoding::encode(destination_name),
                    destination.lat,
                    destination.lng
                )
            }
            DeparturePoint::FreeText(origin) => {
                format!(
                    "{}/?sName={}&eName={}",
                    ROUTE_BASE,
                    urlencoding::encode(origin.trim()),
                    urlencoding::encode(destination_name)
                )
            }
        };

        self.launcher.open(&url);
        Ok(DirectionsOutcome { url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::device::ReportedPositionGeolocator;
    use std::sync::Mutex;

    /// Lanzador de prueba que registra las URLs abiertas
    #[derive(Default)]
    struct RecordingLauncher {
        opened: Mutex<Vec<String>>,
    }

    impl UrlLauncher for RecordingLauncher {
        fn open(&self, url: &str) {
            self.opened.lock().unwrap().push(url.to_string());
        }
    }

    fn service(position: Option<LatLng>) -> (Arc<RecordingLauncher>, DirectionsService) {
        let geolocator = Arc::new(ReportedPositionGeolocator::new());
        if let Some(pos) = position {
            geolocator.report(pos);
        }
        let launcher = Arc::new(RecordingLauncher::default());
        (launcher.clone(), DirectionsService::new(geolocator, launcher, 8))
    }

    #[tokio::test]
    async fn test_gps_departure_builds_coordinate_link() {
        let (launcher, service) = service(Some(LatLng::new(37.5547, 126.9707)));

        let outcome = service
            .launch(
                DeparturePoint::DeviceGps,
                "경복궁",
                LatLng::new(37.5796, 126.9770),
            )
            .await
            .unwrap();

        assert!(outcome.url.starts_with("https://map.kakao.com/link/from/"));
        assert!(outcome.url.contains("37.5547"));
        assert!(outcome.url.contains("/to/"));
        assert!(outcome.url.contains("37.5796"));
        assert_eq!(launcher.opened.lock().unwrap().as_slice(), &[outcome.url]);
    }

    #[tokio::test]
    async fn test_gps_failure_surfaces_dismissible_error() {
        let (launcher, service) = service(None);

        let result = service
            .launch(
                DeparturePoint::DeviceGps,
                "경복궁",
                LatLng::new(37.5796, 126.9770),
            )
            .await;

        assert!(matches!(result, Err(AppError::Geolocation(_))));
        assert!(launcher.opened.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_free_text_departure_is_opaque_and_encoded() {
        let (launcher, service) = service(None);

        let outcome = service
            .launch(
                DeparturePoint::FreeText("서울역 1번 출구".to_string()),
                "N Seoul Tower",
                LatLng::new(37.5512, 126.9882),
            )
            .await
            .unwrap();

        assert!(outcome.url.starts_with("https://map.kakao.com/?sName="));
        // el texto libre viaja percent-encoded, sin validación
        assert!(outcome.url.contains("%EC%84%9C%EC%9A%B8%EC%97%AD"));
        assert!(outcome.url.contains("eName=N%20Seoul%20Tower"));
        assert_eq!(launcher.opened.lock().unwrap().len(), 1);
    }
}

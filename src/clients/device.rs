//! Colaboradores del dispositivo
//!
//! Geolocalización, prompt de confirmación y lanzador de URLs externas.
//! En el despliegue real el dispositivo está al otro lado del HTTP: la
//! posición llega reportada por el cliente y la confirmación viaja como
//! flag en la petición destructiva.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::RwLock;

use crate::utils::geo::LatLng;

/// Consulta one-shot de la posición actual del dispositivo
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<LatLng>;
}

/// Interacción sí/no previa a operaciones destructivas
pub trait ConfirmationPrompt: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

/// Apertura fire-and-forget de una experiencia de navegación externa
pub trait UrlLauncher: Send + Sync {
    fn open(&self, url: &str);
}

/// Geolocalizador alimentado por la última posición reportada por el cliente
#[derive(Default)]
pub struct ReportedPositionGeolocator {
    position: RwLock<Option<LatLng>>,
}

impl ReportedPositionGeolocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self, position: LatLng) {
        *self.position.write().unwrap() = Some(position);
    }

    pub fn clear(&self) {
        *self.position.write().unwrap() = None;
    }
}

#[async_trait]
impl Geolocator for ReportedPositionGeolocator {
    async fn current_position(&self) -> Result<LatLng> {
        self.position
            .read()
            .unwrap()
            .ok_or_else(|| anyhow!("no device position reported"))
    }
}

/// Confirmación resuelta de antemano (flag `confirmed` de la petición)
pub struct PreResolvedConfirmation(pub bool);

impl ConfirmationPrompt for PreResolvedConfirmation {
    fn confirm(&self, message: &str) -> bool {
        log::debug!("Confirmation '{}' resolved as {}", message, self.0);
        self.0
    }
}

/// Lanzador que registra la URL; el cliente la abre con la respuesta
#[derive(Default)]
pub struct LoggingUrlLauncher;

impl UrlLauncher for LoggingUrlLauncher {
    fn open(&self, url: &str) {
        log::info!("🚀 Launching external navigation: {}", url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reported_position_roundtrip() {
        let geo = ReportedPositionGeolocator::new();
        assert!(geo.current_position().await.is_err());

        geo.report(LatLng::new(37.5665, 126.9780));
        let pos = geo.current_position().await.unwrap();
        assert!((pos.lat - 37.5665).abs() < 1e-9);

        geo.clear();
        assert!(geo.current_position().await.is_err());
    }

    #[test]
    fn test_pre_resolved_confirmation() {
        assert!(PreResolvedConfirmation(true).confirm("삭제하시겠습니까?"));
        assert!(!PreResolvedConfirmation(false).confirm("삭제하시겠습니까?"));
    }
}

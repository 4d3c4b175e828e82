//! Superficie de mapa
//!
//! Interfaz de capacidad estrecha sobre el SDK de render de mapas: solo las
//! operaciones que el motor de sincronización necesita (centro, zoom,
//! overlays, fit-to-bounds, polilínea de ruta). `RecordedCanvas` es la
//! implementación del backend: mantiene el estado declarativo de overlays
//! que la capa HTTP devuelve al cliente para que éste lo pinte con el SDK
//! concreto.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use crate::utils::geo::{LatLng, LatLngBounds};

/// Marcador renderizado sobre el mapa
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// Identidad del lugar que representa
    pub place_id: String,
    pub position: LatLng,
    pub title: String,
    pub content_type_id: i32,
    /// Icono de categoría para la tarjeta del marcador
    pub icon: String,
    /// Número de orden de visita; solo en la ruta de un día del planner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

/// Capacidades mínimas que el motor exige al SDK de mapas
pub trait MapCanvas: Send + Sync {
    fn center(&self) -> LatLng;
    fn set_center(&self, center: LatLng);
    fn level(&self) -> i32;
    fn set_level(&self, level: i32);
    fn clear_overlays(&self);
    fn add_marker(&self, marker: Marker);
    fn draw_route(&self, path: Vec<LatLng>);
    fn fit_bounds(&self, bounds: LatLngBounds, padding: u32);
}

/// Estado declarativo completo de la superficie
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasSnapshot {
    pub center: LatLng,
    pub level: i32,
    pub markers: Vec<Marker>,
    pub route: Vec<LatLng>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fitted_bounds: Option<LatLngBounds>,
    /// Padding del último fit-to-bounds; lo aplica el SDK del cliente
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit_padding: Option<u32>,
}

struct CanvasState {
    center: LatLng,
    level: i32,
    markers: Vec<Marker>,
    route: Vec<LatLng>,
    fitted_bounds: Option<LatLngBounds>,
    fit_padding: Option<u32>,
}

/// Implementación que registra el estado en memoria
pub struct RecordedCanvas {
    state: Mutex<CanvasState>,
}

impl RecordedCanvas {
    pub fn new(center: LatLng, level: i32) -> Self {
        Self {
            state: Mutex::new(CanvasState {
                center,
                level,
                markers: Vec::new(),
                route: Vec::new(),
                fitted_bounds: None,
                fit_padding: None,
            }),
        }
    }

    pub fn snapshot(&self) -> CanvasSnapshot {
        let state = self.state.lock().unwrap();
        CanvasSnapshot {
            center: state.center,
            level: state.level,
            markers: state.markers.clone(),
            route: state.route.clone(),
            fitted_bounds: state.fitted_bounds,
            fit_padding: state.fit_padding,
        }
    }
}

impl MapCanvas for RecordedCanvas {
    fn center(&self) -> LatLng {
        self.state.lock().unwrap().center
    }

    fn set_center(&self, center: LatLng) {
        self.state.lock().unwrap().center = center;
    }

    fn level(&self) -> i32 {
        self.state.lock().unwrap().level
    }

    fn set_level(&self, level: i32) {
        self.state.lock().unwrap().level = level;
    }

    fn clear_overlays(&self) {
        let mut state = self.state.lock().unwrap();
        state.markers.clear();
        state.route.clear();
        state.fitted_bounds = None;
        state.fit_padding = None;
    }

    fn add_marker(&self, marker: Marker) {
        self.state.lock().unwrap().markers.push(marker);
    }

    fn draw_route(&self, path: Vec<LatLng>) {
        self.state.lock().unwrap().route = path;
    }

    fn fit_bounds(&self, bounds: LatLngBounds, padding: u32) {
        let mut state = self.state.lock().unwrap();
        state.center = bounds.center();
        state.fitted_bounds = Some(bounds);
        state.fit_padding = Some(padding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_overlays_resets_markers_and_route() {
        let canvas = RecordedCanvas::new(LatLng::new(37.5665, 126.9780), 7);
        canvas.add_marker(Marker {
            place_id: "1".to_string(),
            position: LatLng::new(37.57, 126.98),
            title: "경복궁".to_string(),
            content_type_id: 12,
            icon: "🏛️".to_string(),
            order: None,
        });
        canvas.draw_route(vec![LatLng::new(37.57, 126.98)]);

        assert_eq!(canvas.snapshot().markers.len(), 1);
        canvas.clear_overlays();
        let snap = canvas.snapshot();
        assert!(snap.markers.is_empty());
        assert!(snap.route.is_empty());
    }

    #[test]
    fn test_fit_bounds_recenters() {
        let canvas = RecordedCanvas::new(LatLng::new(37.5665, 126.9780), 7);
        let mut bounds = LatLngBounds::from_point(LatLng::new(37.0, 127.0));
        bounds.extend(LatLng::new(38.0, 128.0));
        canvas.fit_bounds(bounds, 80);

        let snap = canvas.snapshot();
        assert_eq!(snap.center, LatLng::new(37.5, 127.5));
        assert!(snap.fitted_bounds.is_some());
    }
}

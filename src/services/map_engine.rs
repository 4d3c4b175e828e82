//! Motor de sincronización del mapa
//!
//! Mantiene el conjunto de marcadores renderizados consistente con el centro
//! del viewport, el filtro de categoría activo, la consulta de texto libre y
//! el radio configurado. Todo el estado es propio de la instancia: nada vive
//! en estado global de módulo, de modo que varias instancias de mapa no
//! colisionan.
//!
//! Las peticiones en vuelo no se cancelan. Cada fetch lleva un número de
//! secuencia monótono y su resultado se descarta si al llegar ya se emitió
//! una petición más nueva; eso cierra la carrera de orden de resolución que
//! tenía el diseño original.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::device::Geolocator;
use crate::clients::{NearbyPlaceSearch, PlaceSearch};
use crate::map::{MapCanvas, Marker};
use crate::models::place::category_icon;
use crate::models::{Place, TripPlaceEntry};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::geo::{haversine_km, LatLng, LatLngBounds};

/// Zoom inicial del mapa
pub const DEFAULT_LEVEL: i32 = 7;
/// Zoom de acercamiento al encajar un único resultado
const CLOSE_LEVEL: i32 = 5;
/// Padding fijo del fit-to-bounds
const FIT_PADDING: u32 = 80;
/// Filas pedidas al colaborador primario por fetch
const FETCH_ROWS: u32 = 30;
/// Por debajo de este número de resultados GPS se suplementa con el
/// colaborador secundario
const MIN_PRIMARY_RESULTS: usize = 3;

/// Configuración fija de una instancia del motor
#[derive(Debug, Clone)]
pub struct MapEngineConfig {
    /// Radio de búsqueda en metros
    pub radius_m: u32,
    /// Contexto anclado a GPS: recentrado inicial + filtro de distancia
    pub gps_anchored: bool,
    pub geolocation_timeout_secs: u64,
}

impl Default for MapEngineConfig {
    fn default() -> Self {
        Self {
            radius_m: 20_000,
            gps_anchored: false,
            geolocation_timeout_secs: 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Uninitialized,
    Ready,
}

/// Resultado de un ciclo de fetch/render
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// `false` si el motor no estaba Ready o el resultado se descartó
    pub applied: bool,
    /// `true` cuando el resultado llegó después de una petición más nueva
    pub stale: bool,
    pub places: usize,
    /// `true` cuando el colaborador primario falló y se degradó a vacío
    pub degraded: bool,
}

/// Resultado de la transición a Ready
#[derive(Debug, Clone)]
pub struct ReadyOutcome {
    /// `true` si la geolocalización inicial recentró el mapa
    pub recentred: bool,
    pub fetch: FetchOutcome,
}

struct EngineInner {
    lifecycle: Lifecycle,
    category: Option<i32>,
    query: Option<String>,
    applied_seq: u64,
    places: Vec<Place>,
    selected: Option<Place>,
}

pub struct MapEngine {
    canvas: Arc<dyn MapCanvas>,
    primary: Arc<dyn PlaceSearch>,
    secondary: Arc<dyn NearbyPlaceSearch>,
    geolocator: Arc<dyn Geolocator>,
    config: MapEngineConfig,
    issued_seq: AtomicU64,
    inner: RwLock<EngineInner>,
}

/// Filtro de radio inclusivo: un candidato exactamente a `radius_m` entra.
///
/// Anota la distancia en metros en cada candidato y devuelve la lista
/// ordenada ascendente por distancia. Los candidatos sin coordenadas
/// mapeables se descartan.
fn filter_by_radius(center: LatLng, places: Vec<Place>, radius_m: f64) -> Vec<Place> {
    let mut within: Vec<Place> = places
        .into_iter()
        .filter_map(|mut place| {
            let coords = place.coords()?;
            let dist_m = haversine_km(center, coords) * 1000.0;
            if dist_m <= radius_m {
                place.dist = Some(dist_m);
                Some(place)
            } else {
                None
            }
        })
        .collect();

    within.sort_by(|a, b| {
        a.dist
            .unwrap_or(f64::MAX)
            .partial_cmp(&b.dist.unwrap_or(f64::MAX))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    within
}

impl MapEngine {
    pub fn new(
        canvas: Arc<dyn MapCanvas>,
        primary: Arc<dyn PlaceSearch>,
        secondary: Arc<dyn NearbyPlaceSearch>,
        geolocator: Arc<dyn Geolocator>,
        config: MapEngineConfig,
    ) -> Self {
        Self {
            canvas,
            primary,
            secondary,
            geolocator,
            config,
            issued_seq: AtomicU64::new(0),
            inner: RwLock::new(EngineInner {
                lifecycle: Lifecycle::Uninitialized,
                category: None,
                query: None,
                applied_seq: 0,
                places: Vec::new(),
                selected: None,
            }),
        }
    }

    /// Transición Uninitialized → Ready cuando el SDK reporta cargado.
    ///
    /// En contexto GPS intenta una geolocalización única y acotada; el
    /// éxito recentra en silencio y el fallo deja el centro por defecto.
    /// Nunca bloquea la inicialización.
    pub async fn ready(&self) -> ReadyOutcome {
        {
            let mut inner = self.inner.write().await;
            inner.lifecycle = Lifecycle::Ready;
        }

        let mut recentred = false;
        if self.config.gps_anchored {
            let timeout = std::time::Duration::from_secs(self.config.geolocation_timeout_secs);
            match tokio::time::timeout(timeout, self.geolocator.current_position()).await {
                Ok(Ok(position)) => {
                    self.canvas.set_center(position);
                    recentred = true;
                    log::info!("📍 Map recentred to device position");
                }
                Ok(Err(e)) => {
                    log::info!("📍 Geolocation unavailable, keeping default center: {}", e);
                }
                Err(_) => {
                    log::warn!("⏳ Geolocation timed out, keeping default center");
                }
            }
        }

        let fetch = self.refresh().await;
        ReadyOutcome { recentred, fetch }
    }

    /// Ciclo completo de fetch + reconciliación de marcadores.
    ///
    /// Concurrente-seguro: los disparos solapados no se cancelan entre sí,
    /// pero solo el más reciente llega a aplicarse.
    pub async fn refresh(&self) -> FetchOutcome {
        let (category, query) = {
            let inner = self.inner.read().await;
            if inner.lifecycle != Lifecycle::Ready {
                log::debug!("Map not ready, skipping fetch");
                return FetchOutcome {
                    applied: false,
                    stale: false,
                    places: 0,
                    degraded: false,
                };
            }
            (inner.category, inner.query.clone())
        };

        let seq = self.issued_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let center = self.canvas.center();

        let (results, degraded) = self.fetch_places(center, category, query.as_deref()).await;

        let mut inner = self.inner.write().await;
        // descarte de resultados rancios: ya se emitió una petición más nueva
        if seq != self.issued_seq.load(Ordering::SeqCst) || seq <= inner.applied_seq {
            log::info!("🕸️ Discarding stale fetch #{} ({} results)", seq, results.len());
            return FetchOutcome {
                applied: false,
                stale: true,
                places: results.len(),
                degraded,
            };
        }
        inner.applied_seq = seq;
        inner.places = results.clone();
        inner.selected = None;
        drop(inner);

        self.reconcile_markers(&results);
        self.auto_fit(&results);

        log::info!("🗺️ Fetch #{} applied: {} markers", seq, results.len());
        FetchOutcome {
            applied: true,
            stale: false,
            places: results.len(),
            degraded,
        }
    }

    /// Resolución de la consulta: texto libre → keyword; si no, radio sobre
    /// el centro del viewport. En modo GPS el keyword se filtra por
    /// distancia y se suplementa cuando queda corto.
    async fn fetch_places(
        &self,
        center: LatLng,
        category: Option<i32>,
        query: Option<&str>,
    ) -> (Vec<Place>, bool) {
        let radius_m = self.config.radius_m as f64;

        if let Some(keyword) = query.filter(|q| !q.trim().is_empty()) {
            let keyword = keyword.trim();
            let (mut results, degraded) =
                match self.primary.search_keyword(keyword, category, FETCH_ROWS).await {
                    Ok(results) => (results, false),
                    Err(e) => {
                        log::warn!("⚠️ Keyword fetch failed, degrading to empty: {}", e);
                        (Vec::new(), true)
                    }
                };

            if self.config.gps_anchored {
                results = filter_by_radius(center, results, radius_m);

                if results.len() < MIN_PRIMARY_RESULTS {
                    match self
                        .secondary
                        .search_nearby(keyword, center, self.config.radius_m)
                        .await
                    {
                        Ok(supplement) => {
                            // deduplicado por nombre contra el resultado primario
                            let existing: std::collections::HashSet<String> =
                                results.iter().map(|p| p.title.clone()).collect();
                            let fresh: Vec<Place> = supplement
                                .into_iter()
                                .filter(|p| !existing.contains(&p.title))
                                .collect();
                            if !fresh.is_empty() {
                                log::info!("🏪 Supplemented {} secondary results", fresh.len());
                                results.extend(fresh);
                            }
                        }
                        Err(e) => {
                            log::warn!("⚠️ Secondary supplement failed: {}", e);
                        }
                    }
                }
            }

            (results.into_iter().filter(Place::is_mappable).collect(), degraded)
        } else {
            let (results, degraded) = match self
                .primary
                .location_based(center, self.config.radius_m, category, FETCH_ROWS)
                .await
            {
                Ok(results) => (results, false),
                Err(e) => {
                    log::warn!("⚠️ Location fetch failed, degrading to empty: {}", e);
                    (Vec::new(), true)
                }
            };

            (results.into_iter().filter(Place::is_mappable).collect(), degraded)
        }
    }

    /// Quitar todos los marcadores previos y reinstanciar uno por lugar con
    /// coordenadas mapeables
    fn reconcile_markers(&self, places: &[Place]) {
        self.canvas.clear_overlays();
        for place in places {
            if let Some(position) = place.coords() {
                self.canvas.add_marker(Marker {
                    place_id: place.content_id.clone(),
                    position,
                    title: place.title.clone(),
                    content_type_id: place.content_type_id,
                    icon: category_icon(place.content_type_id).to_string(),
                    order: None,
                });
            }
        }
    }

    /// Un resultado: centrar y acercar. Varios: encajar la caja que los
    /// cubre con padding fijo.
    fn auto_fit(&self, places: &[Place]) {
        let coords: Vec<LatLng> = places.iter().filter_map(Place::coords).collect();
        match coords.len() {
            0 => {}
            1 => {
                self.canvas.set_center(coords[0]);
                self.canvas.set_level(CLOSE_LEVEL);
            }
            _ => {
                if let Some(bounds) = LatLngBounds::covering(&coords) {
                    self.canvas.fit_bounds(bounds, FIT_PADDING);
                }
            }
        }
    }

    /// Fin de arrastre: nuevo centro de viewport y re-fetch
    pub async fn pan_end(&self, center: LatLng) -> FetchOutcome {
        self.canvas.set_center(center);
        self.refresh().await
    }

    /// Cambio de filtro de categoría (re-entra en Fetching)
    pub async fn set_category(&self, category: Option<i32>) -> FetchOutcome {
        self.inner.write().await.category = category;
        self.refresh().await
    }

    /// Cambio de consulta de texto libre (re-entra en Fetching)
    pub async fn set_query(&self, query: Option<String>) -> FetchOutcome {
        self.inner.write().await.query = query.filter(|q| !q.trim().is_empty());
        self.refresh().await
    }

    /// El zoom solo se ajusta con los controles explícitos; no refetcha
    pub fn zoom_in(&self) {
        self.canvas.set_level(self.canvas.level() - 1);
    }

    pub fn zoom_out(&self) {
        self.canvas.set_level(self.canvas.level() + 1);
    }

    /// Clic en un marcador: selecciona el lugar y recentra sin refetch
    pub async fn select_place(&self, place_id: &str) -> AppResult<Place> {
        let mut inner = self.inner.write().await;
        let place = inner
            .places
            .iter()
            .find(|p| p.content_id == place_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Place with id '{}' not found", place_id)))?;

        if let Some(position) = place.coords() {
            self.canvas.set_center(position);
        }
        inner.selected = Some(place.clone());
        Ok(place)
    }

    pub async fn selected_place(&self) -> Option<Place> {
        self.inner.read().await.selected.clone()
    }

    pub async fn current_places(&self) -> Vec<Place> {
        self.inner.read().await.places.clone()
    }

    /// Hay peticiones emitidas aún sin aplicar
    pub async fn is_fetching(&self) -> bool {
        self.issued_seq.load(Ordering::SeqCst) > self.inner.read().await.applied_seq
    }

    /// Render del mapa del planificador: marcadores numerados en orden de
    /// visita + polilínea de la ruta del día
    pub fn render_day_route(&self, entries: &[TripPlaceEntry]) {
        self.canvas.clear_overlays();

        let mut path = Vec::new();
        let mut order: u32 = 0;
        for entry in entries {
            // misma puerta de validez que el resto de contextos de mapa
            if entry.lat > 0.0 && entry.lng > 0.0 {
                let position = LatLng::new(entry.lat, entry.lng);
                order += 1;
                self.canvas.add_marker(Marker {
                    place_id: entry.id.clone(),
                    position,
                    title: entry.name.clone(),
                    content_type_id: entry.content_type_id,
                    icon: category_icon(entry.content_type_id).to_string(),
                    order: Some(order),
                });
                path.push(position);
            }
        }

        match path.len() {
            0 => {}
            1 => {
                self.canvas.set_center(path[0]);
                self.canvas.set_level(CLOSE_LEVEL);
            }
            _ => {
                self.canvas.draw_route(path.clone());
                if let Some(bounds) = LatLngBounds::covering(&path) {
                    self.canvas.fit_bounds(bounds, FIT_PADDING);
                }
            }
        }
    }
}

//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Todos los colaboradores externos entran
//! por sus interfaces de capacidad, de modo que los tests inyectan dobles.

use std::sync::Arc;

use crate::clients::device::{LoggingUrlLauncher, ReportedPositionGeolocator};
use crate::clients::{NearbyPlaceSearch, PlaceSearch};
use crate::config::environment::EnvironmentConfig;
use crate::map::RecordedCanvas;
use crate::services::map_engine::DEFAULT_LEVEL;
use crate::services::{
    DirectionsService, FavoritesService, MapEngine, MapEngineConfig, PlannerService, SearchService,
};
use crate::storage::KeyValueStore;
use crate::utils::geo::DEFAULT_CENTER;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub planner: Arc<PlannerService>,
    pub favorites: Arc<FavoritesService>,
    pub search: Arc<SearchService>,
    pub map_engine: Arc<MapEngine>,
    pub directions: Arc<DirectionsService>,
    /// Superficie declarativa que la capa HTTP devuelve al cliente
    pub canvas: Arc<RecordedCanvas>,
    /// Posición del dispositivo reportada por el cliente
    pub geolocator: Arc<ReportedPositionGeolocator>,
}

impl AppState {
    pub fn new(
        config: EnvironmentConfig,
        store: Arc<dyn KeyValueStore>,
        primary: Arc<dyn PlaceSearch>,
        secondary: Arc<dyn NearbyPlaceSearch>,
    ) -> Self {
        let planner = Arc::new(PlannerService::new(store.clone()));
        let favorites = Arc::new(FavoritesService::new(store));
        let search = Arc::new(SearchService::new(planner.clone(), primary.clone()));

        let canvas = Arc::new(RecordedCanvas::new(DEFAULT_CENTER, DEFAULT_LEVEL));
        let geolocator = Arc::new(ReportedPositionGeolocator::new());
        let map_engine = Arc::new(MapEngine::new(
            canvas.clone(),
            primary,
            secondary,
            geolocator.clone(),
            MapEngineConfig {
                radius_m: config.map_radius_m,
                gps_anchored: config.map_gps_anchored,
                geolocation_timeout_secs: config.geolocation_timeout_secs,
            },
        ));

        let directions = Arc::new(DirectionsService::new(
            geolocator.clone(),
            Arc::new(LoggingUrlLauncher),
            config.geolocation_timeout_secs,
        ));

        Self {
            config,
            planner,
            favorites,
            search,
            map_engine,
            directions,
            canvas,
            geolocator,
        }
    }
}

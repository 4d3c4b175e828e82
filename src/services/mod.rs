//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: el
//! planificador de itinerarios, los favoritos, el workflow de búsqueda,
//! el motor de sincronización del mapa y el despachador de direcciones.

pub mod directions_service;
pub mod favorites_service;
pub mod map_engine;
pub mod planner_service;
pub mod search_service;

pub use directions_service::{DeparturePoint, DirectionsService};
pub use favorites_service::FavoritesService;
pub use map_engine::{MapEngine, MapEngineConfig};
pub use planner_service::PlannerService;
pub use search_service::SearchService;

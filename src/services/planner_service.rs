//! Servicio del planificador de itinerarios
//!
//! Fuente única de verdad de la colección de viajes en memoria y de su
//! persistencia. Toda mutación estructural de un día pasa por el punto de
//! estrangulamiento `mutate_day`, que aplica el cambio sobre la instantánea
//! en memoria y reescribe la colección completa; así la colección persistida
//! y el viaje activo nunca divergen.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::device::ConfirmationPrompt;
use crate::models::{Day, Trip, TripStats};
use crate::storage::{KeyValueStore, PLANNER_KEY};
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::{validate_date_range, validate_not_empty};

/// Resultado de una mutación del itinerario.
///
/// `persisted` hace observable un fallo de escritura sin romper el contrato
/// de no propagar errores de almacenamiento: la mutación en memoria queda
/// aplicada igualmente.
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    pub trip: Trip,
    pub persisted: bool,
}

/// Resultado de un borrado de viaje
#[derive(Debug, Clone)]
pub struct DeleteOutcome {
    /// `false` cuando el prompt de confirmación lo rechazó
    pub deleted: bool,
    pub persisted: bool,
}

pub struct PlannerService {
    store: Arc<dyn KeyValueStore>,
    trips: RwLock<Vec<Trip>>,
    active_trip: RwLock<Option<String>>,
}

impl PlannerService {
    /// Construir el servicio cargando la colección persistida.
    ///
    /// La carga falla en blando: ausencia o JSON corrupto dejan una
    /// colección vacía, nunca un error hacia el llamador.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let trips = Self::load(store.as_ref());
        log::info!("📋 Planner loaded: {} trips", trips.len());

        Self {
            store,
            trips: RwLock::new(trips),
            active_trip: RwLock::new(None),
        }
    }

    fn load(store: &dyn KeyValueStore) -> Vec<Trip> {
        match store.get(PLANNER_KEY) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(trips) => trips,
                Err(e) => {
                    log::warn!("⚠️ Corrupted planner collection, starting empty: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        }
    }

    /// Serializar y sobrescribir la colección completa; `false` si falló
    fn save(&self, trips: &[Trip]) -> bool {
        let raw = match serde_json::to_string(trips) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("⚠️ Failed to serialize planner collection: {}", e);
                return false;
            }
        };

        match self.store.set(PLANNER_KEY, &raw) {
            Ok(()) => true,
            Err(e) => {
                // pérdida de datos posible; la mutación en memoria se mantiene
                log::warn!("⚠️ Failed to persist planner collection: {}", e);
                false
            }
        }
    }

    pub async fn trips(&self) -> Vec<Trip> {
        self.trips.read().await.clone()
    }

    pub async fn trip(&self, trip_id: &str) -> Option<Trip> {
        self.trips
            .read()
            .await
            .iter()
            .find(|t| t.id == trip_id)
            .cloned()
    }

    pub async fn active_trip_id(&self) -> Option<String> {
        self.active_trip.read().await.clone()
    }

    pub async fn set_active_trip(&self, trip_id: &str) -> AppResult<Trip> {
        let trip = self
            .trip(trip_id)
            .await
            .ok_or_else(|| not_found_error("Trip", trip_id))?;
        *self.active_trip.write().await = Some(trip.id.clone());
        Ok(trip)
    }

    /// Crear un viaje con todos sus días materializados y dejarlo activo.
    ///
    /// Rechaza título vacío y rango invertido; el rango es inmutable a
    /// partir de aquí.
    pub async fn create_trip(
        &self,
        title: &str,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    ) -> AppResult<MutationOutcome> {
        if validate_not_empty(title).is_err() {
            return Err(AppError::InvalidInput("trip title must not be empty".to_string()));
        }
        if validate_date_range(start, end).is_err() {
            return Err(AppError::InvalidInput(
                "trip end date must not be before start date".to_string(),
            ));
        }

        let trip = Trip::new(title.trim().to_string(), start, end);

        let mut trips = self.trips.write().await;
        // orden más reciente primero
        trips.insert(0, trip.clone());
        let persisted = self.save(&trips);
        drop(trips);

        *self.active_trip.write().await = Some(trip.id.clone());
        log::info!("✈️ Trip created: '{}' ({} days)", trip.title, trip.days.len());

        Ok(MutationOutcome { trip, persisted })
    }

    /// Borrar un viaje previa confirmación; el rechazo es un no-op.
    ///
    /// El borrado cae en cascada sobre días y entradas, y limpia el puntero
    /// de viaje activo si apuntaba al viaje borrado.
    pub async fn delete_trip(
        &self,
        trip_id: &str,
        prompt: &dyn ConfirmationPrompt,
    ) -> AppResult<DeleteOutcome> {
        if !prompt.confirm("삭제하시겠습니까?") {
            log::info!("🗑️ Trip delete declined: {}", trip_id);
            return Ok(DeleteOutcome {
                deleted: false,
                persisted: true,
            });
        }

        let mut trips = self.trips.write().await;
        let before = trips.len();
        trips.retain(|t| t.id != trip_id);
        if trips.len() == before {
            return Err(not_found_error("Trip", trip_id));
        }
        let persisted = self.save(&trips);
        drop(trips);

        let mut active = self.active_trip.write().await;
        if active.as_deref() == Some(trip_id) {
            *active = None;
        }

        log::info!("🗑️ Trip deleted: {}", trip_id);
        Ok(DeleteOutcome {
            deleted: true,
            persisted,
        })
    }

    /// Punto de estrangulamiento de toda mutación de un día.
    ///
    /// Aplica `mutate` sobre el día indicado y reescribe la colección
    /// completa en la misma vuelta. Devuelve lo que devuelva el closure
    /// junto con el viaje actualizado.
    pub async fn mutate_day<F, R>(
        &self,
        trip_id: &str,
        day_index: usize,
        mutate: F,
    ) -> AppResult<(R, MutationOutcome)>
    where
        F: FnOnce(&mut Day) -> R,
    {
        let mut trips = self.trips.write().await;
        let trip = trips
            .iter_mut()
            .find(|t| t.id == trip_id)
            .ok_or_else(|| not_found_error("Trip", trip_id))?;

        let day_count = trip.days.len();
        let day = trip.days.get_mut(day_index).ok_or_else(|| {
            AppError::BadRequest(format!(
                "day index {} out of range (trip has {} days)",
                day_index, day_count
            ))
        })?;

        let result = mutate(day);
        let updated = trip.clone();
        let persisted = self.save(&trips);

        Ok((
            result,
            MutationOutcome {
                trip: updated,
                persisted,
            },
        ))
    }

    /// Estadísticas derivadas; el contador de favoritos llega del store de
    /// favoritos, aquí no se recalcula
    pub async fn stats(&self, favorites_count: usize) -> TripStats {
        let trips = self.trips.read().await;
        TripStats::compute(&trips, favorites_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::device::PreResolvedConfirmation;
    use crate::models::{MoveDirection, Place, TripPlaceEntry};
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_place(id: &str) -> Place {
        Place {
            content_id: id.to_string(),
            content_type_id: 12,
            title: format!("Lugar {}", id),
            addr: "서울".to_string(),
            image: String::new(),
            mapx: "126.9780".to_string(),
            mapy: "37.5665".to_string(),
            tel: None,
            dist: None,
        }
    }

    fn service() -> (Arc<MemoryStore>, PlannerService) {
        let store = Arc::new(MemoryStore::new());
        let planner = PlannerService::new(store.clone());
        (store, planner)
    }

    #[tokio::test]
    async fn test_create_trip_materializes_days() {
        let (_store, planner) = service();
        let outcome = planner
            .create_trip("Seoul Weekend", date(2026, 3, 10), date(2026, 3, 11))
            .await
            .unwrap();

        assert!(outcome.persisted);
        assert_eq!(outcome.trip.days.len(), 2);
        assert_eq!(outcome.trip.days[0].date, date(2026, 3, 10));
        assert_eq!(outcome.trip.days[1].date, date(2026, 3, 11));
        assert!(outcome.trip.days.iter().all(|d| d.places.is_empty()));
        assert_eq!(planner.active_trip_id().await, Some(outcome.trip.id));
    }

    #[tokio::test]
    async fn test_create_trip_rejects_inverted_range() {
        let (_store, planner) = service();
        let result = planner
            .create_trip("X", date(2026, 3, 10), date(2026, 3, 5))
            .await;

        assert!(result.is_err());
        assert!(planner.trips().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_trip_rejects_empty_title() {
        let (_store, planner) = service();
        let result = planner
            .create_trip("   ", date(2026, 3, 10), date(2026, 3, 11))
            .await;

        assert!(result.is_err());
        assert!(planner.trips().await.is_empty());
    }

    #[tokio::test]
    async fn test_most_recent_trip_first() {
        let (_store, planner) = service();
        planner
            .create_trip("Primero", date(2026, 3, 10), date(2026, 3, 11))
            .await
            .unwrap();
        planner
            .create_trip("Segundo", date(2026, 4, 1), date(2026, 4, 2))
            .await
            .unwrap();

        let trips = planner.trips().await;
        assert_eq!(trips[0].title, "Segundo");
        assert_eq!(trips[1].title, "Primero");
    }

    #[tokio::test]
    async fn test_persistence_roundtrip_through_store() {
        let (store, planner) = service();
        let outcome = planner
            .create_trip("Roundtrip", date(2026, 3, 10), date(2026, 3, 12))
            .await
            .unwrap();

        planner
            .mutate_day(&outcome.trip.id, 1, |day| {
                day.places.push(TripPlaceEntry::snapshot_of(&sample_place("1")));
                day.places[0].memo = "점심".to_string();
                day.places[0].time = "12:30".to_string();
                day.day_memo = "중요한 날".to_string();
            })
            .await
            .unwrap();

        // un servicio nuevo sobre el mismo store ve la colección idéntica
        let reloaded = PlannerService::new(store);
        let trips = reloaded.trips().await;
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].days[1].places.len(), 1);
        assert_eq!(trips[0].days[1].places[0].memo, "점심");
        assert_eq!(trips[0].days[1].places[0].time, "12:30");
        assert_eq!(trips[0].days[1].day_memo, "중요한 날");
    }

    #[tokio::test]
    async fn test_load_soft_fails_on_corrupted_json() {
        let store = Arc::new(MemoryStore::new());
        store.set(PLANNER_KEY, "{not json").unwrap();
        let planner = PlannerService::new(store);
        assert!(planner.trips().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_order_matches_call_order_and_moves_swap_adjacent() {
        let (_store, planner) = service();
        let trip = planner
            .create_trip("Orden", date(2026, 3, 10), date(2026, 3, 10))
            .await
            .unwrap()
            .trip;

        for id in ["a", "b", "c"] {
            planner
                .mutate_day(&trip.id, 0, |day| {
                    day.places.push(TripPlaceEntry::snapshot_of(&sample_place(id)));
                })
                .await
                .unwrap();
        }

        let (moved, outcome) = planner
            .mutate_day(&trip.id, 0, |day| day.move_place(1, MoveDirection::Down))
            .await
            .unwrap();
        assert!(moved);

        let order: Vec<&str> = outcome.trip.days[0]
            .places
            .iter()
            .map(|p| p.source_id.as_str())
            .collect();
        assert_eq!(order, vec!["a", "c", "b"]);
    }

    #[tokio::test]
    async fn test_delete_cascades_and_clears_active_pointer() {
        let (store, planner) = service();
        let trip = planner
            .create_trip("Borrable", date(2026, 3, 10), date(2026, 3, 12))
            .await
            .unwrap()
            .trip;
        planner
            .mutate_day(&trip.id, 0, |day| {
                day.places.push(TripPlaceEntry::snapshot_of(&sample_place("1")));
            })
            .await
            .unwrap();

        let outcome = planner
            .delete_trip(&trip.id, &PreResolvedConfirmation(true))
            .await
            .unwrap();
        assert!(outcome.deleted);
        assert!(planner.trips().await.is_empty());
        assert!(planner.active_trip_id().await.is_none());

        // la colección persistida tampoco conserva días ni entradas
        let raw = store.get(PLANNER_KEY).unwrap();
        assert_eq!(raw, "[]");
    }

    #[tokio::test]
    async fn test_delete_declined_is_noop() {
        let (_store, planner) = service();
        let trip = planner
            .create_trip("Intocable", date(2026, 3, 10), date(2026, 3, 11))
            .await
            .unwrap()
            .trip;

        let outcome = planner
            .delete_trip(&trip.id, &PreResolvedConfirmation(false))
            .await
            .unwrap();
        assert!(!outcome.deleted);
        assert_eq!(planner.trips().await.len(), 1);
        assert_eq!(planner.active_trip_id().await, Some(trip.id));
    }

    #[tokio::test]
    async fn test_mutation_survives_persistence_failure() {
        let (store, planner) = service();
        let trip = planner
            .create_trip("Frágil", date(2026, 3, 10), date(2026, 3, 11))
            .await
            .unwrap()
            .trip;

        store.set_fail_writes(true);
        let (_, outcome) = planner
            .mutate_day(&trip.id, 0, |day| {
                day.places.push(TripPlaceEntry::snapshot_of(&sample_place("1")));
            })
            .await
            .unwrap();

        // el fallo es observable pero la mutación en memoria queda aplicada
        assert!(!outcome.persisted);
        assert_eq!(planner.trip(&trip.id).await.unwrap().days[0].places.len(), 1);
    }

    #[tokio::test]
    async fn test_mutate_day_out_of_range() {
        let (_store, planner) = service();
        let trip = planner
            .create_trip("Corto", date(2026, 3, 10), date(2026, 3, 10))
            .await
            .unwrap()
            .trip;

        let result = planner.mutate_day(&trip.id, 5, |_day| ()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_stats_use_favorites_figure_as_given() {
        let (_store, planner) = service();
        planner
            .create_trip("Stats", date(2026, 3, 10), date(2026, 3, 12))
            .await
            .unwrap();

        let stats = planner.stats(7).await;
        assert_eq!(stats.total_trips, 1);
        assert_eq!(stats.total_days, 3);
        assert_eq!(stats.favorites, 7);
    }
}

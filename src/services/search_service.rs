//! Workflow de búsqueda y alta en el planificador
//!
//! Escenifica candidatos para un día concreto sin tocar el día hasta que el
//! usuario confirma cada alta. El marcador "añadido en esta sesión" evita el
//! doble clic sobre el mismo resultado, está acotado a la selección de día
//! actual y NO es una garantía de deduplicación durable: reentrar al
//! workflow permite añadir el mismo lugar otra vez.

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::PlaceSearch;
use crate::models::{Place, TripPlaceEntry};
use crate::services::planner_service::PlannerService;
use crate::utils::errors::{AppError, AppResult};

/// Filas pedidas al colaborador por búsqueda (un solo viaje, sin cursor)
const SEARCH_ROWS: u32 = 20;

/// Resultado de una búsqueda escenificada
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub results: Vec<Place>,
    /// `true` cuando el colaborador falló y se degradó a "sin resultados"
    pub degraded: bool,
}

/// Resultado de un alta en el día seleccionado
#[derive(Debug, Clone)]
pub struct AddOutcome {
    /// `None` cuando el alta fue rechazada por el marcador de sesión
    pub entry: Option<TripPlaceEntry>,
    pub already_added: bool,
    pub day_index: usize,
    pub persisted: bool,
}

#[derive(Default)]
struct SearchSession {
    day_index: usize,
    query: String,
    results: Vec<Place>,
    added_source_ids: HashSet<String>,
}

pub struct SearchService {
    planner: Arc<PlannerService>,
    searcher: Arc<dyn PlaceSearch>,
    session: RwLock<SearchSession>,
}

impl SearchService {
    pub fn new(planner: Arc<PlannerService>, searcher: Arc<dyn PlaceSearch>) -> Self {
        Self {
            planner,
            searcher,
            session: RwLock::new(SearchSession::default()),
        }
    }

    /// Búsqueda por palabra clave contra el colaborador primario.
    ///
    /// Un fallo de transporte se traga y degrada a lista vacía; el flag
    /// `degraded` lo deja observable para la UI y los tests.
    pub async fn search(&self, keyword: &str) -> AppResult<SearchOutcome> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(AppError::InvalidInput("search keyword must not be empty".to_string()));
        }

        let (results, degraded) = match self.searcher.search_keyword(keyword, None, SEARCH_ROWS).await
        {
            Ok(results) => (results, false),
            Err(e) => {
                log::warn!("⚠️ Place search failed, degrading to empty: {}", e);
                (Vec::new(), true)
            }
        };

        let mut session = self.session.write().await;
        session.query = keyword.to_string();
        session.results = results.clone();

        Ok(SearchOutcome { results, degraded })
    }

    /// Cambiar el día destino limpia el marcador de sesión (está acotado a
    /// la selección de día, no a la entrada al workflow)
    pub async fn select_day(&self, day_index: usize) -> AppResult<()> {
        let trip_id = self.require_active_trip().await?;
        let trip = self
            .planner
            .trip(&trip_id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Trip with id '{}' not found", trip_id)))?;

        if day_index >= trip.days.len() {
            return Err(AppError::BadRequest(format!(
                "day index {} out of range (trip has {} days)",
                day_index,
                trip.days.len()
            )));
        }

        let mut session = self.session.write().await;
        session.day_index = day_index;
        session.added_source_ids.clear();
        Ok(())
    }

    /// Añadir un resultado escenificado al día seleccionado.
    ///
    /// Sintetiza la entrada con identidad propia y la anexa a través del
    /// punto de estrangulamiento del planificador.
    pub async fn add_to_day(&self, result_index: usize) -> AppResult<AddOutcome> {
        let trip_id = self.require_active_trip().await?;

        let (place, day_index) = {
            let session = self.session.read().await;
            let place = session.results.get(result_index).cloned().ok_or_else(|| {
                AppError::BadRequest(format!("staged result index {} out of range", result_index))
            })?;

            if session.added_source_ids.contains(&place.content_id) {
                log::info!("🚫 '{}' already staged for day {}", place.title, session.day_index + 1);
                return Ok(AddOutcome {
                    entry: None,
                    already_added: true,
                    day_index: session.day_index,
                    persisted: true,
                });
            }
            (place, session.day_index)
        };

        let entry = TripPlaceEntry::snapshot_of(&place);
        let entry_for_day = entry.clone();
        let (_, outcome) = self
            .planner
            .mutate_day(&trip_id, day_index, move |day| {
                day.places.push(entry_for_day);
            })
            .await?;

        self.session
            .write()
            .await
            .added_source_ids
            .insert(place.content_id.clone());

        log::info!("✅ '{}' added to Day {}", place.title, day_index + 1);
        Ok(AddOutcome {
            entry: Some(entry),
            already_added: false,
            day_index,
            persisted: outcome.persisted,
        })
    }

    /// Salir del workflow descarta resultados, consulta y marcadores
    pub async fn leave(&self) {
        *self.session.write().await = SearchSession::default();
    }

    pub async fn staged_results(&self) -> Vec<Place> {
        self.session.read().await.results.clone()
    }

    pub async fn added_source_ids(&self) -> HashSet<String> {
        self.session.read().await.added_source_ids.clone()
    }

    pub async fn selected_day(&self) -> usize {
        self.session.read().await.day_index
    }

    pub async fn staged_query(&self) -> String {
        self.session.read().await.query.clone()
    }

    /// Exploración por área contra el colaborador primario (pasarela)
    pub async fn area_browse(
        &self,
        area_code: Option<i32>,
        content_type_id: Option<i32>,
        num_of_rows: u32,
        page_no: u32,
    ) -> anyhow::Result<Vec<Place>> {
        self.searcher
            .area_based(area_code, content_type_id, num_of_rows, page_no)
            .await
    }

    /// Detalle de un lugar contra el colaborador primario (pasarela)
    pub async fn place_detail(
        &self,
        content_id: &str,
    ) -> anyhow::Result<Option<crate::clients::PlaceDetail>> {
        self.searcher.detail_common(content_id).await
    }

    async fn require_active_trip(&self) -> AppResult<String> {
        self.planner
            .active_trip_id()
            .await
            .ok_or_else(|| AppError::BadRequest("no active trip selected".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use chrono::NaiveDate;

    use crate::clients::PlaceDetail;
    use crate::utils::geo::LatLng;

    /// Colaborador de búsqueda de prueba: devuelve lo configurado o falla
    struct FakeSearch {
        results: Vec<Place>,
        fail: bool,
    }

    #[async_trait]
    impl PlaceSearch for FakeSearch {
        async fn search_keyword(
            &self,
            _keyword: &str,
            _content_type_id: Option<i32>,
            _num_of_rows: u32,
        ) -> Result<Vec<Place>> {
            if self.fail {
                return Err(anyhow!("connection reset"));
            }
            Ok(self.results.clone())
        }

        async fn location_based(
            &self,
            _center: LatLng,
            _radius_m: u32,
            _content_type_id: Option<i32>,
            _num_of_rows: u32,
        ) -> Result<Vec<Place>> {
            Ok(Vec::new())
        }

        async fn area_based(
            &self,
            _area_code: Option<i32>,
            _content_type_id: Option<i32>,
            _num_of_rows: u32,
            _page_no: u32,
        ) -> Result<Vec<Place>> {
            Ok(Vec::new())
        }

        async fn detail_common(&self, _content_id: &str) -> Result<Option<PlaceDetail>> {
            Ok(None)
        }
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

    async fn setup(results: Vec<Place>, fail: bool) -> (Arc<PlannerService>, SearchService, String) {
        let planner = Arc::new(PlannerService::new(Arc::new(MemoryStore::new())));
        let trip = planner
            .create_trip(
                "테스트 여행",
                NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
                NaiveDate::from_ymd_opt(2026, 3, 11).unwrap(),
            )
            .await
            .unwrap()
            .trip;
        let service = SearchService::new(planner.clone(), Arc::new(FakeSearch { results, fail }));
        (planner, service, trip.id)
    }

    #[tokio::test]
    async fn test_search_stages_results() {
        let (_planner, service, _trip) = setup(vec![sample_place("1"), sample_place("2")], false).await;
        let outcome = service.search("경복궁").await.unwrap();
        assert_eq!(outcome.results.len(), 2);
        assert!(!outcome.degraded);
        assert_eq!(service.staged_results().await.len(), 2);
    }

    #[tokio::test]
    async fn test_search_degrades_on_transport_failure() {
        let (_planner, service, _trip) = setup(vec![], true).await;
        let outcome = service.search("경복궁").await.unwrap();
        assert!(outcome.results.is_empty());
        assert!(outcome.degraded);
    }

    #[tokio::test]
    async fn test_add_appends_to_selected_day_in_order() {
        let (planner, service, trip_id) = setup(vec![sample_place("1"), sample_place("2")], false).await;
        service.search("경복궁").await.unwrap();

        service.add_to_day(0).await.unwrap();
        service.add_to_day(1).await.unwrap();

        let trip = planner.trip(&trip_id).await.unwrap();
        let order: Vec<&str> = trip.days[0].places.iter().map(|p| p.source_id.as_str()).collect();
        assert_eq!(order, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_second_add_blocked_by_session_marker() {
        let (planner, service, trip_id) = setup(vec![sample_place("1")], false).await;
        service.search("경복궁").await.unwrap();

        let first = service.add_to_day(0).await.unwrap();
        assert!(!first.already_added);

        let second = service.add_to_day(0).await.unwrap();
        assert!(second.already_added);
        assert!(second.entry.is_none());

        let trip = planner.trip(&trip_id).await.unwrap();
        assert_eq!(trip.days[0].places.len(), 1);
    }

    #[tokio::test]
    async fn test_marker_is_scoped_per_day_selection() {
        let (planner, service, trip_id) = setup(vec![sample_place("1")], false).await;
        service.search("경복궁").await.unwrap();
        service.add_to_day(0).await.unwrap();

        // cambiar de día limpia el marcador: el mismo lugar entra en Day 2
        service.select_day(1).await.unwrap();
        let outcome = service.add_to_day(0).await.unwrap();
        assert!(!outcome.already_added);

        let trip = planner.trip(&trip_id).await.unwrap();
        assert_eq!(trip.days[0].places.len(), 1);
        assert_eq!(trip.days[1].places.len(), 1);
    }

    #[tokio::test]
    async fn test_reentering_workflow_allows_duplicates() {
        let (planner, service, trip_id) = setup(vec![sample_place("1")], false).await;
        service.search("경복궁").await.unwrap();
        service.add_to_day(0).await.unwrap();

        service.leave().await;
        service.search("경복궁").await.unwrap();
        let outcome = service.add_to_day(0).await.unwrap();
        assert!(!outcome.already_added);

        let trip = planner.trip(&trip_id).await.unwrap();
        assert_eq!(trip.days[0].places.len(), 2);
        // misma fuente, identidades de entrada distintas
        assert_ne!(trip.days[0].places[0].id, trip.days[0].places[1].id);
    }

    #[tokio::test]
    async fn test_select_day_out_of_range() {
        let (_planner, service, _trip) = setup(vec![], false).await;
        assert!(service.select_day(9).await.is_err());
    }

    #[tokio::test]
    async fn test_add_requires_active_trip() {
        let planner = Arc::new(PlannerService::new(Arc::new(MemoryStore::new())));
        let service = SearchService::new(
            planner,
            Arc::new(FakeSearch {
                results: vec![sample_place("1")],
                fail: false,
            }),
        );
        service.search("카페").await.unwrap();
        assert!(service.add_to_day(0).await.is_err());
    }
}

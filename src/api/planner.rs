//! Endpoints del planificador de itinerarios

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use validator::Validate;

use crate::clients::device::PreResolvedConfirmation;
use crate::dto::planner_dto::{
    ApiResponse, CreateTripRequest, DeleteTripQuery, DeleteTripResponse, MemoRequest,
    MovePlaceRequest, TimeRequest, TripMutationResponse, TripSummaryResponse,
};
use crate::map::CanvasSnapshot;
use crate::models::{Trip, TripStats};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub fn create_planner_router() -> Router<AppState> {
    Router::new()
        .route("/trips", get(list_trips))
        .route("/trips", post(create_trip))
        .route("/trips/:id", get(get_trip))
        .route("/trips/:id", delete(delete_trip))
        .route("/trips/:id/activate", post(activate_trip))
        .route("/trips/:id/days/:day/route", get(day_route))
        .route("/trips/:id/days/:day/memo", put(set_day_memo))
        .route("/trips/:id/days/:day/places/:entry/move", post(move_place))
        .route("/trips/:id/days/:day/places/:entry", delete(remove_place))
        .route("/trips/:id/days/:day/places/:entry/memo", put(set_place_memo))
        .route("/trips/:id/days/:day/places/:entry/time", put(set_place_time))
        .route("/stats", get(get_stats))
}

/// Listado de viajes, más reciente primero
async fn list_trips(State(state): State<AppState>) -> Json<Vec<TripSummaryResponse>> {
    let trips = state.planner.trips().await;
    Json(trips.iter().map(TripSummaryResponse::from).collect())
}

/// Crear un viaje.
///
/// La validación fallida no es un error HTTP: responde el sobre con
/// `success=false`, igual que el botón deshabilitado de la UI.
async fn create_trip(
    State(state): State<AppState>,
    Json(request): Json<CreateTripRequest>,
) -> AppResult<Json<ApiResponse<TripMutationResponse>>> {
    if let Err(e) = request.validate() {
        log::warn!("⚠️ Trip creation rejected: {}", e);
        return Ok(Json(ApiResponse::error("invalid trip data".to_string())));
    }

    match state
        .planner
        .create_trip(&request.title, request.start_date, request.end_date)
        .await
    {
        Ok(outcome) => Ok(Json(ApiResponse::success(TripMutationResponse {
            trip: outcome.trip,
            persisted: outcome.persisted,
        }))),
        Err(AppError::InvalidInput(msg)) => Ok(Json(ApiResponse::error(msg))),
        Err(e) => Err(e),
    }
}

async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Trip>> {
    let trip = state
        .planner
        .trip(&id)
        .await
        .ok_or_else(|| not_found_error("Trip", &id))?;
    Ok(Json(trip))
}

async fn activate_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Trip>>> {
    let trip = state.planner.set_active_trip(&id).await?;
    Ok(Json(ApiResponse::success(trip)))
}

/// Borrado con confirmación; el rechazo del prompt deja todo intacto
async fn delete_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DeleteTripQuery>,
) -> AppResult<Json<ApiResponse<DeleteTripResponse>>> {
    let prompt = PreResolvedConfirmation(query.confirmed);
    let outcome = state.planner.delete_trip(&id, &prompt).await?;
    Ok(Json(ApiResponse::success(DeleteTripResponse {
        deleted: outcome.deleted,
        persisted: outcome.persisted,
    })))
}

/// Mapa de la ruta de un día: marcadores numerados + polilínea
async fn day_route(
    State(state): State<AppState>,
    Path((id, day_index)): Path<(String, usize)>,
) -> AppResult<Json<CanvasSnapshot>> {
    let trip = state
        .planner
        .trip(&id)
        .await
        .ok_or_else(|| not_found_error("Trip", &id))?;
    let day = trip.days.get(day_index).ok_or_else(|| {
        AppError::BadRequest(format!(
            "day index {} out of range (trip has {} days)",
            day_index,
            trip.days.len()
        ))
    })?;

    state.map_engine.render_day_route(&day.places);
    Ok(Json(state.canvas.snapshot()))
}

async fn set_day_memo(
    State(state): State<AppState>,
    Path((id, day_index)): Path<(String, usize)>,
    Json(request): Json<MemoRequest>,
) -> AppResult<Json<ApiResponse<TripMutationResponse>>> {
    let (_, outcome) = state
        .planner
        .mutate_day(&id, day_index, move |day| {
            day.day_memo = request.memo;
        })
        .await?;

    Ok(Json(ApiResponse::success(TripMutationResponse {
        trip: outcome.trip,
        persisted: outcome.persisted,
    })))
}

/// Reordenado por intercambio adyacente
async fn move_place(
    State(state): State<AppState>,
    Path((id, day_index, entry_id)): Path<(String, usize, String)>,
    Json(request): Json<MovePlaceRequest>,
) -> AppResult<Json<ApiResponse<TripMutationResponse>>> {
    let (found, outcome) = state
        .planner
        .mutate_day(&id, day_index, move |day| {
            match day.places.iter().position(|p| p.id == entry_id) {
                Some(index) => {
                    day.move_place(index, request.direction);
                    true
                }
                None => false,
            }
        })
        .await?;

    if !found {
        return Err(AppError::NotFound("place entry not found in day".to_string()));
    }

    Ok(Json(ApiResponse::success(TripMutationResponse {
        trip: outcome.trip,
        persisted: outcome.persisted,
    })))
}

async fn remove_place(
    State(state): State<AppState>,
    Path((id, day_index, entry_id)): Path<(String, usize, String)>,
) -> AppResult<Json<ApiResponse<TripMutationResponse>>> {
    let (removed, outcome) = state
        .planner
        .mutate_day(&id, day_index, move |day| day.remove_place(&entry_id))
        .await?;

    if !removed {
        return Err(AppError::NotFound("place entry not found in day".to_string()));
    }

    Ok(Json(ApiResponse::success(TripMutationResponse {
        trip: outcome.trip,
        persisted: outcome.persisted,
    })))
}

async fn set_place_memo(
    State(state): State<AppState>,
    Path((id, day_index, entry_id)): Path<(String, usize, String)>,
    Json(request): Json<MemoRequest>,
) -> AppResult<Json<ApiResponse<TripMutationResponse>>> {
    let (found, outcome) = state
        .planner
        .mutate_day(&id, day_index, move |day| {
            match day.places.iter_mut().find(|p| p.id == entry_id) {
                Some(place) => {
                    place.memo = request.memo;
                    true
                }
                None => false,
            }
        })
        .await?;

    if !found {
        return Err(AppError::NotFound("place entry not found in day".to_string()));
    }

    Ok(Json(ApiResponse::success(TripMutationResponse {
        trip: outcome.trip,
        persisted: outcome.persisted,
    })))
}

async fn set_place_time(
    State(state): State<AppState>,
    Path((id, day_index, entry_id)): Path<(String, usize, String)>,
    Json(request): Json<TimeRequest>,
) -> AppResult<Json<ApiResponse<TripMutationResponse>>> {
    let (found, outcome) = state
        .planner
        .mutate_day(&id, day_index, move |day| {
            match day.places.iter_mut().find(|p| p.id == entry_id) {
                Some(place) => {
                    place.time = request.time;
                    true
                }
                None => false,
            }
        })
        .await?;

    if !found {
        return Err(AppError::NotFound("place entry not found in day".to_string()));
    }

    Ok(Json(ApiResponse::success(TripMutationResponse {
        trip: outcome.trip,
        persisted: outcome.persisted,
    })))
}

/// Estadísticas agregadas; el contador de favoritos sale del store de
/// favoritos, única fuente
async fn get_stats(State(state): State<AppState>) -> Json<TripStats> {
    let favorites = state.favorites.count().await;
    Json(state.planner.stats(favorites).await)
}

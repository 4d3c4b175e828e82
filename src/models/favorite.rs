//! Favoritos y estadísticas de viaje

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::place::Place;
use crate::models::trip::Trip;

/// Marcador persistido de un lugar, independiente de cualquier viaje
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    /// Identidad = identidad del lugar de origen
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub image: String,
    pub content_type_id: i32,
    pub added_at: DateTime<Utc>,
}

impl FavoriteEntry {
    /// Instantánea desnormalizada de los campos de presentación
    pub fn snapshot_of(place: &Place) -> Self {
        Self {
            id: place.content_id.clone(),
            name: place.title.clone(),
            address: place.addr.clone(),
            image: place.image.clone(),
            content_type_id: place.content_type_id,
            added_at: Utc::now(),
        }
    }
}

/// Estadísticas derivadas de las colecciones persistidas.
///
/// El contador de favoritos se lee siempre del store de favoritos; aquí solo
/// se agrega, nunca se recalcula por separado.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripStats {
    pub total_trips: usize,
    pub total_places: usize,
    pub total_days: usize,
    pub favorites: usize,
}

impl TripStats {
    pub fn compute(trips: &[Trip], favorites: usize) -> Self {
        Self {
            total_trips: trips.len(),
            total_places: trips.iter().map(|t| t.total_places()).sum(),
            total_days: trips.iter().map(|t| t.days.len()).sum(),
            favorites,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_stats_aggregate_all_trips() {
        let d = |day| NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
        let trips = vec![
            Trip::new("A".to_string(), d(10), d(11)),
            Trip::new("B".to_string(), d(20), d(22)),
        ];
        let stats = TripStats::compute(&trips, 4);
        assert_eq!(stats.total_trips, 2);
        assert_eq!(stats.total_days, 5);
        assert_eq!(stats.total_places, 0);
        assert_eq!(stats.favorites, 4);
    }
}

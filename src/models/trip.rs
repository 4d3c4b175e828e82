//! Modelo del planificador de viajes
//!
//! Jerarquía viaje → día → lugar. Los días se materializan todos al crear
//! el viaje (uno por fecha del rango, ambos extremos incluidos) y el rango
//! es inmutable después. El orden de lugares dentro de un día es el orden
//! de visita y gobierna la numeración y la polilínea del mapa.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::place::Place;

/// Dirección de un movimiento de reordenado (solo intercambios adyacentes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Un lugar incorporado a un día concreto del itinerario.
///
/// Copia los campos de presentación del `Place` de origen: el itinerario es
/// dueño de su propia instantánea y los cambios posteriores del catálogo no
/// alteran un itinerario guardado.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPlaceEntry {
    /// Identidad propia de la entrada, distinta de la identidad de origen
    pub id: String,
    /// Identidad del lugar de origen (para el marcador de sesión del workflow)
    pub source_id: String,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub image: String,
    pub content_type_id: i32,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub time: String,
}

impl TripPlaceEntry {
    /// Instantánea de un resultado de búsqueda, con identidad nueva.
    ///
    /// El sufijo uuid evita la colisión de dos altas dentro del mismo
    /// milisegundo que tenía el esquema `id + timestamp`.
    pub fn snapshot_of(place: &Place) -> Self {
        Self {
            id: format!("{}-{}", place.content_id, Uuid::new_v4()),
            source_id: place.content_id.clone(),
            name: place.title.clone(),
            address: place.addr.clone(),
            lat: place.mapy.parse().unwrap_or(0.0),
            lng: place.mapx.parse().unwrap_or(0.0),
            image: place.image.clone(),
            content_type_id: place.content_type_id,
            memo: String::new(),
            time: String::new(),
        }
    }
}

/// Un día del viaje: fecha fija y secuencia ordenada de lugares
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    pub date: NaiveDate,
    #[serde(default)]
    pub places: Vec<TripPlaceEntry>,
    #[serde(default)]
    pub day_memo: String,
}

impl Day {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            places: Vec::new(),
            day_memo: String::new(),
        }
    }

    /// Intercambio adyacente; devuelve `false` si el movimiento se sale del rango
    pub fn move_place(&mut self, index: usize, direction: MoveDirection) -> bool {
        if index >= self.places.len() {
            return false;
        }
        let target = match direction {
            MoveDirection::Up => {
                if index == 0 {
                    return false;
                }
                index - 1
            }
            MoveDirection::Down => {
                if index + 1 >= self.places.len() {
                    return false;
                }
                index + 1
            }
        };
        self.places.swap(index, target);
        true
    }

    /// Eliminar una entrada por su identidad propia
    pub fn remove_place(&mut self, entry_id: &str) -> bool {
        let before = self.places.len();
        self.places.retain(|p| p.id != entry_id);
        self.places.len() != before
    }
}

/// Contenedor de itinerario multi-día definido por el usuario
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: Vec<Day>,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    /// Crear un viaje materializando un día vacío por cada fecha del rango.
    ///
    /// Precondición (validada por el servicio): `end_date >= start_date`.
    pub fn new(title: String, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        let mut days = Vec::new();
        let mut current = start_date;
        while current <= end_date {
            days.push(Day::empty(current));
            current += Duration::days(1);
        }

        Self {
            id: Uuid::new_v4().to_string(),
            title,
            start_date,
            end_date,
            days,
            created_at: Utc::now(),
        }
    }

    pub fn total_places(&self) -> usize {
        self.days.iter().map(|d| d.places.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::place::content_types;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_place(id: &str) -> Place {
        Place {
            content_id: id.to_string(),
            content_type_id: content_types::ATTRACTIONS,
            title: format!("Lugar {}", id),
            addr: "서울".to_string(),
            image: String::new(),
            mapx: "126.9780".to_string(),
            mapy: "37.5665".to_string(),
            tel: None,
            dist: None,
        }
    }

    #[test]
    fn test_day_count_matches_inclusive_range() {
        let trip = Trip::new("Seoul Weekend".to_string(), date(2026, 3, 10), date(2026, 3, 11));
        assert_eq!(trip.days.len(), 2);
        assert_eq!(trip.days[0].date, date(2026, 3, 10));
        assert_eq!(trip.days[1].date, date(2026, 3, 11));
        assert!(trip.days.iter().all(|d| d.places.is_empty()));
    }

    #[test]
    fn test_single_day_trip() {
        let trip = Trip::new("Day trip".to_string(), date(2026, 5, 1), date(2026, 5, 1));
        assert_eq!(trip.days.len(), 1);
    }

    #[test]
    fn test_days_are_sequential_dates() {
        let trip = Trip::new("Semana".to_string(), date(2026, 3, 28), date(2026, 4, 3));
        assert_eq!(trip.days.len(), 7);
        for pair in trip.days.windows(2) {
            assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
        }
    }

    #[test]
    fn test_snapshot_has_fresh_identity() {
        let place = sample_place("123");
        let a = TripPlaceEntry::snapshot_of(&place);
        let b = TripPlaceEntry::snapshot_of(&place);
        assert_ne!(a.id, b.id);
        assert_eq!(a.source_id, "123");
        assert!(a.id.starts_with("123-"));
        assert_eq!(a.memo, "");
        assert_eq!(a.time, "");
    }

    #[test]
    fn test_move_place_swaps_adjacent_only() {
        let mut day = Day::empty(date(2026, 3, 10));
        for id in ["a", "b", "c"] {
            day.places.push(TripPlaceEntry::snapshot_of(&sample_place(id)));
        }

        assert!(day.move_place(2, MoveDirection::Up));
        let order: Vec<&str> = day.places.iter().map(|p| p.source_id.as_str()).collect();
        assert_eq!(order, vec!["a", "c", "b"]);

        // los extremos no se mueven fuera del rango
        assert!(!day.move_place(0, MoveDirection::Up));
        assert!(!day.move_place(2, MoveDirection::Down));
    }

    #[test]
    fn test_remove_place_by_entry_id() {
        let mut day = Day::empty(date(2026, 3, 10));
        let entry = TripPlaceEntry::snapshot_of(&sample_place("x"));
        let entry_id = entry.id.clone();
        day.places.push(entry);

        assert!(day.remove_place(&entry_id));
        assert!(day.places.is_empty());
        assert!(!day.remove_place(&entry_id));
    }
}

//! Utilidades geográficas
//!
//! Cálculo de distancias haversine y cajas de límites para el ajuste
//! automático del viewport del mapa.

use serde::{Deserialize, Serialize};

/// Radio de la Tierra en kilómetros
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Centro por defecto del mapa: Ayuntamiento de Seúl
pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 37.5665,
    lng: 126.9780,
};

/// Par de coordenadas geográficas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Distancia haversine entre dos puntos, en kilómetros
pub fn haversine_km(a: LatLng, b: LatLng) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Caja de límites que cubre un conjunto de puntos
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    /// Caja degenerada sobre un único punto
    pub fn from_point(point: LatLng) -> Self {
        Self {
            south_west: point,
            north_east: point,
        }
    }

    /// Extender la caja para cubrir también `point`
    pub fn extend(&mut self, point: LatLng) {
        if point.lat < self.south_west.lat {
            self.south_west.lat = point.lat;
        }
        if point.lng < self.south_west.lng {
            self.south_west.lng = point.lng;
        }
        if point.lat > self.north_east.lat {
            self.north_east.lat = point.lat;
        }
        if point.lng > self.north_east.lng {
            self.north_east.lng = point.lng;
        }
    }

    /// Caja que cubre todos los puntos; `None` si la lista está vacía
    pub fn covering(points: &[LatLng]) -> Option<Self> {
        let mut iter = points.iter();
        let first = iter.next()?;
        let mut bounds = Self::from_point(*first);
        for p in iter {
            bounds.extend(*p);
        }
        Some(bounds)
    }

    pub fn center(&self) -> LatLng {
        LatLng {
            lat: (self.south_west.lat + self.north_east.lat) / 2.0,
            lng: (self.south_west.lng + self.north_east.lng) / 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_same_point_is_zero() {
        let p = LatLng::new(37.5665, 126.9780);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn test_haversine_seoul_busan() {
        let seoul = LatLng::new(37.5665, 126.9780);
        let busan = LatLng::new(35.1796, 129.0756);
        let dist = haversine_km(seoul, busan);
        // ~325 km con margen de 5 km
        assert!((dist - 325.0).abs() < 5.0, "distancia inesperada: {}", dist);
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = LatLng::new(37.5665, 126.9780);
        let b = LatLng::new(35.1796, 129.0756);
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_covering() {
        let points = vec![
            LatLng::new(37.0, 127.0),
            LatLng::new(36.0, 128.0),
            LatLng::new(38.0, 126.5),
        ];
        let bounds = LatLngBounds::covering(&points).unwrap();
        assert_eq!(bounds.south_west, LatLng::new(36.0, 126.5));
        assert_eq!(bounds.north_east, LatLng::new(38.0, 128.0));
    }

    #[test]
    fn test_bounds_empty() {
        assert!(LatLngBounds::covering(&[]).is_none());
    }
}

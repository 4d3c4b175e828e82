//! Servicio de favoritos
//!
//! Conjunto persistido de lugares marcados, independiente de cualquier
//! viaje. La colección completa se reescribe en cada toggle, con la misma
//! semántica de fallo blando que el planificador. Este servicio es la única
//! fuente del contador de favoritos que consumen las estadísticas.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::{FavoriteEntry, Place};
use crate::storage::{KeyValueStore, FAVORITES_KEY};

/// Resultado de un toggle de favorito
#[derive(Debug, Clone)]
pub struct ToggleOutcome {
    /// `true` si el lugar quedó marcado; `false` si quedó desmarcado
    pub added: bool,
    pub count: usize,
    pub persisted: bool,
}

pub struct FavoritesService {
    store: Arc<dyn KeyValueStore>,
    favorites: RwLock<Vec<FavoriteEntry>>,
}

impl FavoritesService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let favorites = Self::load(store.as_ref());
        log::info!("❤️ Favorites loaded: {}", favorites.len());

        Self {
            store,
            favorites: RwLock::new(favorites),
        }
    }

    fn load(store: &dyn KeyValueStore) -> Vec<FavoriteEntry> {
        match store.get(FAVORITES_KEY) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(favorites) => favorites,
                Err(e) => {
                    log::warn!("⚠️ Corrupted favorites collection, starting empty: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        }
    }

    fn save(&self, favorites: &[FavoriteEntry]) -> bool {
        let raw = match serde_json::to_string(favorites) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("⚠️ Failed to serialize favorites: {}", e);
                return false;
            }
        };

        match self.store.set(FAVORITES_KEY, &raw) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("⚠️ Failed to persist favorites: {}", e);
                false
            }
        }
    }

    /// Alta o baja según presencia, con instantánea de presentación al dar
    /// de alta. Dos toggles seguidos devuelven la colección a su estado
    /// anterior.
    pub async fn toggle(&self, place: &Place) -> ToggleOutcome {
        let mut favorites = self.favorites.write().await;

        let added = if let Some(pos) = favorites.iter().position(|f| f.id == place.content_id) {
            favorites.remove(pos);
            false
        } else {
            favorites.push(FavoriteEntry::snapshot_of(place));
            true
        };

        let persisted = self.save(&favorites);
        let count = favorites.len();
        log::info!(
            "❤️ Favorite {} for '{}' (total: {})",
            if added { "added" } else { "removed" },
            place.title,
            count
        );

        ToggleOutcome {
            added,
            count,
            persisted,
        }
    }

    /// Baja directa desde la lista de favoritos
    pub async fn remove(&self, place_id: &str) -> ToggleOutcome {
        let mut favorites = self.favorites.write().await;
        let before = favorites.len();
        favorites.retain(|f| f.id != place_id);
        let removed = favorites.len() != before;
        let persisted = if removed { self.save(&favorites) } else { true };

        ToggleOutcome {
            added: false,
            count: favorites.len(),
            persisted,
        }
    }

    pub async fn list(&self) -> Vec<FavoriteEntry> {
        self.favorites.read().await.clone()
    }

    pub async fn is_favorite(&self, place_id: &str) -> bool {
        self.favorites.read().await.iter().any(|f| f.id == place_id)
    }

    /// Único punto de verdad del contador de favoritos
    pub async fn count(&self) -> usize {
        self.favorites.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn sample_place(id: &str) -> Place {
        Place {
            content_id: id.to_string(),
            content_type_id: 12,
            title: format!("Lugar {}", id),
            addr: "서울".to_string(),
            image: "http://example.com/img.jpg".to_string(),
            mapx: "126.9780".to_string(),
            mapy: "37.5665".to_string(),
            tel: None,
            dist: None,
        }
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_prior_state() {
        let service = FavoritesService::new(Arc::new(MemoryStore::new()));
        let place = sample_place("123");

        let first = service.toggle(&place).await;
        assert!(first.added);
        assert_eq!(first.count, 1);
        assert!(service.is_favorite("123").await);

        let second = service.toggle(&place).await;
        assert!(!second.added);
        assert_eq!(second.count, 0);
        assert!(!service.is_favorite("123").await);
    }

    #[tokio::test]
    async fn test_snapshot_denormalizes_display_fields() {
        let service = FavoritesService::new(Arc::new(MemoryStore::new()));
        service.toggle(&sample_place("7")).await;

        let list = service.list().await;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "Lugar 7");
        assert_eq!(list[0].image, "http://example.com/img.jpg");
        assert_eq!(list[0].content_type_id, 12);
    }

    #[tokio::test]
    async fn test_persists_across_reload() {
        let store = Arc::new(MemoryStore::new());
        let service = FavoritesService::new(store.clone());
        service.toggle(&sample_place("a")).await;
        service.toggle(&sample_place("b")).await;

        let reloaded = FavoritesService::new(store);
        assert_eq!(reloaded.count().await, 2);
        assert!(reloaded.is_favorite("a").await);
    }

    #[tokio::test]
    async fn test_load_soft_fails_on_corrupted_json() {
        let store = Arc::new(MemoryStore::new());
        store.set(FAVORITES_KEY, "??").unwrap();
        let service = FavoritesService::new(store);
        assert_eq!(service.count().await, 0);
    }

    #[tokio::test]
    async fn test_toggle_reports_persistence_failure() {
        let store = Arc::new(MemoryStore::new());
        let service = FavoritesService::new(store.clone());
        store.set_fail_writes(true);

        let outcome = service.toggle(&sample_place("x")).await;
        assert!(outcome.added);
        assert!(!outcome.persisted);
        // la mutación en memoria se mantiene
        assert!(service.is_favorite("x").await);
    }

    #[tokio::test]
    async fn test_remove_missing_is_noop() {
        let service = FavoritesService::new(Arc::new(MemoryStore::new()));
        let outcome = service.remove("nope").await;
        assert_eq!(outcome.count, 0);
        assert!(outcome.persisted);
    }
}

//! Almacenamiento clave-valor persistente
//!
//! Este módulo define la interfaz de capacidad sobre el almacenamiento local
//! del dispositivo (valores string con JSON dentro, claves string) y sus dos
//! implementaciones: una respaldada por ficheros para producción y una en
//! memoria para tests. El acceso es síncrono, como el storage del navegador
//! que reemplaza.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// Clave bajo la que se persiste la colección completa de viajes
pub const PLANNER_KEY: &str = "k-tour-planner";
/// Clave bajo la que se persiste la colección completa de favoritos
pub const FAVORITES_KEY: &str = "k-tour-favorites";

/// Acceso clave-valor síncrono, con valores string
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str);
}

/// Store respaldado por ficheros: un fichero JSON por clave bajo `data_dir`
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("creating data dir {}", data_dir.display()))?;
        Ok(Self { data_dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        fs::write(&path, value).with_context(|| format!("writing {}", path.display()))
    }

    fn remove(&self, key: &str) {
        let _ = fs::remove_file(self.path_for(key));
    }
}

/// Store en memoria para tests
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    /// Si está activo, todo `set` falla; simula cuota excedida
    fail_writes: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if *self.fail_writes.lock().unwrap() {
            anyhow::bail!("storage quota exceeded");
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get("k").is_none());
        store.set("k", "[1,2,3]").unwrap();
        assert_eq!(store.get("k").unwrap(), "[1,2,3]");
        store.remove("k");
        assert!(store.get("k").is_none());
    }

    #[test]
    fn test_memory_store_simulated_quota() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        assert!(store.set("k", "v").is_err());
        assert!(store.get("k").is_none());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = std::env::temp_dir().join(format!("tour-planning-test-{}", uuid::Uuid::new_v4()));
        let store = JsonFileStore::new(dir.clone()).unwrap();
        store.set(PLANNER_KEY, "{\"a\":1}").unwrap();
        assert_eq!(store.get(PLANNER_KEY).unwrap(), "{\"a\":1}");
        store.remove(PLANNER_KEY);
        assert!(store.get(PLANNER_KEY).is_none());
        let _ = std::fs::remove_dir_all(dir);
    }
}

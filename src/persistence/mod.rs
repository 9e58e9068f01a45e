//! Durable key-value storage
//!
//! The game persists two small records: the best score under
//! `neonGlideHighScore` and the settings JSON. Both go through the
//! [`KeyValueStore`] capability so the score keeper and settings loader can be
//! tested natively against a [`MemoryStore`]. In the browser the store is
//! LocalStorage ([`LocalStore`]).

use std::collections::HashMap;

/// Synchronous string key-value storage. Failures are not surfaced: a failed
/// read looks like a missing key, a failed write is dropped.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store for native builds and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// LocalStorage-backed store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStore {
    storage: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    /// Open LocalStorage. Private browsing modes may deny access; the store
    /// then behaves as permanently empty.
    pub fn open() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable, progress will not be saved");
        }
        Self { storage }
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        let storage = self.storage.as_ref()?;
        match storage.get_item(key) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("Failed to read '{}': {:?}", key, err);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(Err(err)) = self.storage.as_ref().map(|s| s.set_item(key, value)) {
            log::warn!("Failed to write '{}': {:?}", key, err);
        }
    }
}

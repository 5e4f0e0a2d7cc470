use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::backend::KvBackend;
use crate::error::StoreError;

/// Lazily loaded, write-on-checkpoint cache for one persisted document.
///
/// `load` merges the stored document over `defaults`: stored top-level keys
/// win and defaults fill the gaps. Reads before `load` are an error; saves
/// before `load` are skipped with a warning.
pub struct LazyStore<T> {
    key: String,
    defaults: T,
    backend: Arc<dyn KvBackend>,
    cache: Option<T>,
}

impl<T> LazyStore<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn new(key: impl Into<String>, defaults: T, backend: Arc<dyn KvBackend>) -> Self {
        Self {
            key: key.into(),
            defaults,
            backend,
            cache: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Populate the cache. Idempotent.
    pub fn load(&mut self) -> Result<(), StoreError> {
        if self.cache.is_some() {
            return Ok(());
        }

        let defaults = serde_json::to_value(&self.defaults)?;
        let merged = match self.backend.read(&self.key)? {
            Some(stored) => overlay(defaults, stored),
            None => {
                debug!(key = %self.key, "nothing stored, using defaults");
                defaults
            }
        };

        let value = serde_json::from_value(merged).map_err(|e| StoreError::Corrupt {
            key: self.key.clone(),
            message: e.to_string(),
        })?;
        self.cache = Some(value);
        debug!(key = %self.key, "store loaded");
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.is_some()
    }

    pub fn get(&self) -> Result<&T, StoreError> {
        self.cache
            .as_ref()
            .ok_or_else(|| StoreError::NotLoaded(self.key.clone()))
    }

    pub fn get_mut(&mut self) -> Result<&mut T, StoreError> {
        self.cache
            .as_mut()
            .ok_or_else(|| StoreError::NotLoaded(self.key.clone()))
    }

    /// Write the cache back to the backend.
    pub fn save(&self) -> Result<(), StoreError> {
        let Some(cache) = &self.cache else {
            warn!(key = %self.key, "store saved before load(), skipping");
            return Ok(());
        };
        self.backend.write(&self.key, &serde_json::to_value(cache)?)
    }

    /// Restore defaults and persist immediately.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.cache = Some(self.defaults.clone());
        self.save()
    }

    /// Replace the cache with `value` layered over defaults, then persist.
    pub fn replace(&mut self, value: T) -> Result<(), StoreError> {
        let merged = overlay(
            serde_json::to_value(&self.defaults)?,
            serde_json::to_value(value)?,
        );
        self.cache = Some(serde_json::from_value(merged)?);
        self.save()
    }
}

/// Shallow merge: top-level keys of `stored` override `defaults`.
/// Anything other than two objects yields `stored` unchanged.
fn overlay(defaults: Value, stored: Value) -> Value {
    match (defaults, stored) {
        (Value::Object(mut base), Value::Object(top)) => {
            for (key, value) in top {
                base.insert(key, value);
            }
            Value::Object(base)
        }
        (_, stored) => stored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use macrobuttons_core::Settings;
    use serde_json::json;

    fn store(backend: &MemoryBackend) -> LazyStore<Settings> {
        LazyStore::new("test:settings", Settings::default(), Arc::new(backend.clone()))
    }

    #[test]
    fn get_before_load_fails() {
        let backend = MemoryBackend::new();
        let s = store(&backend);
        assert!(!s.is_loaded());
        assert!(matches!(s.get(), Err(StoreError::NotLoaded(k)) if k == "test:settings"));
    }

    #[test]
    fn load_uses_defaults_when_empty() {
        let backend = MemoryBackend::new();
        let mut s = store(&backend);
        s.load().unwrap();
        assert!(s.is_loaded());
        assert_eq!(s.get().unwrap(), &Settings::default());
    }

    #[test]
    fn stored_keys_override_defaults() {
        let backend =
            MemoryBackend::new().with_value("test:settings", json!({"advancedMode": true}));
        let mut s = store(&backend);
        s.load().unwrap();
        let settings = s.get().unwrap();
        assert!(settings.advanced_mode);
        assert_eq!(settings.version, Settings::default().version);
    }

    #[test]
    fn load_is_idempotent() {
        let backend = MemoryBackend::new();
        let mut s = store(&backend);
        s.load().unwrap();
        s.get_mut().unwrap().sidebar_open = true;
        s.load().unwrap();
        assert!(s.get().unwrap().sidebar_open);
    }

    #[test]
    fn save_before_load_is_a_noop() {
        let backend = MemoryBackend::new();
        let s = store(&backend);
        s.save().unwrap();
        assert_eq!(backend.snapshot("test:settings"), None);
    }

    #[test]
    fn save_persists_cache() {
        let backend = MemoryBackend::new();
        let mut s = store(&backend);
        s.load().unwrap();
        s.get_mut().unwrap().advanced_mode = true;
        s.save().unwrap();
        assert_eq!(backend.snapshot("test:settings").unwrap()["advancedMode"], true);
    }

    #[test]
    fn reset_restores_defaults_and_persists() {
        let backend =
            MemoryBackend::new().with_value("test:settings", json!({"sidebarOpen": true}));
        let mut s = store(&backend);
        s.reset().unwrap();
        assert!(s.is_loaded());
        assert!(!s.get().unwrap().sidebar_open);
        assert_eq!(backend.snapshot("test:settings").unwrap()["sidebarOpen"], false);
    }

    #[test]
    fn non_object_document_is_an_error() {
        let backend = MemoryBackend::new().with_value("test:settings", json!([1, 2, 3]));
        let mut s = store(&backend);
        assert!(matches!(s.load(), Err(StoreError::Corrupt { key, .. }) if key == "test:settings"));
        assert!(!s.is_loaded());
    }

    #[test]
    fn reset_recovers_from_corrupt_document() {
        let backend =
            MemoryBackend::new().with_value("test:settings", json!({"advancedMode": "yes"}));
        let mut s = store(&backend);
        assert!(s.load().is_err());

        s.reset().unwrap();
        assert_eq!(s.get().unwrap(), &Settings::default());
        assert_eq!(backend.snapshot("test:settings").unwrap()["advancedMode"], false);
    }

    #[test]
    fn overlay_is_shallow() {
        let merged = overlay(
            json!({"a": {"x": 1, "y": 2}, "b": 1}),
            json!({"a": {"x": 9}}),
        );
        assert_eq!(merged, json!({"a": {"x": 9}, "b": 1}));
    }
}

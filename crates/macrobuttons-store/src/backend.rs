use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::StoreError;

/// Persistent key/value storage for whole JSON documents.
pub trait KvBackend: Send + Sync {
    /// Stored document for `key`, or `None` if nothing was ever written.
    fn read(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the stored document for `key`.
    fn write(&self, key: &str, value: &Value) -> Result<(), StoreError>;
}

/// Process-local backend. Clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    values: Arc<Mutex<HashMap<String, Value>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value as if it had been persisted earlier.
    pub fn with_value(self, key: &str, value: Value) -> Self {
        self.values.lock().insert(key.to_string(), value);
        self
    }

    pub fn snapshot(&self, key: &str) -> Option<Value> {
        self.values.lock().get(key).cloned()
    }
}

impl KvBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        self.values.lock().insert(key.to_string(), value.clone());
        Ok(())
    }
}

use std::collections::HashMap;
use std::sync::RwLock;

use stow_types::Value;
use tracing::warn;

use crate::layout;
use crate::traits::{Container, ContainerExt};

/// In-memory, HashMap-based container.
///
/// Intended for tests and embedding. Entries use the value-native layout and
/// live behind a `RwLock`; every operation clones in or out. Data is lost when
/// the container is dropped.
pub struct MemoryContainer {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryContainer {
    /// Create a new empty container.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of entries currently stored, metadata entries included.
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the container is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }

    /// Sorted list of every stored key.
    pub fn keys(&self) -> Vec<String> {
        let map = self.entries.read().expect("lock poisoned");
        let mut keys: Vec<String> = map.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Raw stored entry, bypassing the typed surface.
    pub fn entry(&self, key: &str) -> Option<Value> {
        self.entries.read().expect("lock poisoned").get(key).cloned()
    }

    fn put(&self, key: &str, value: Value) {
        let mut map = self.entries.write().expect("lock poisoned");
        map.insert(key.to_string(), value);
    }
}

impl Default for MemoryContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl Container for MemoryContainer {
    fn name(&self) -> &str {
        "memory"
    }

    fn get_scalar(&self, key: &str) -> Option<Value> {
        self.entry(key)
    }

    fn set_scalar(&self, key: &str, value: Option<Value>) -> bool {
        let Some(value) = self.validate(key, value) else {
            return false;
        };
        self.put(key, value);
        true
    }

    fn get_collection(&self, key: &str) -> Option<Vec<Value>> {
        layout::collection_from_value(key, self.entry(key)?).ok()
    }

    fn set_collection(&self, key: &str, values: Option<Vec<Value>>) -> bool {
        let Some(values) = self.validate(key, values) else {
            return false;
        };
        self.put(key, Value::Array(values));
        true
    }

    fn get_object(&self, key: &str) -> Option<Value> {
        self.entry(key)
    }

    fn set_object(&self, key: &str, value: Option<Value>) -> bool {
        self.set_scalar(key, value)
    }

    fn get_codable(&self, key: &str) -> Option<serde_json::Value> {
        match layout::codable_from_value(key, self.entry(key)?) {
            Ok(json) => Some(json),
            Err(e) => {
                warn!(key, error = %e, "undecodable codable entry");
                None
            }
        }
    }

    fn set_codable(&self, key: &str, value: Option<serde_json::Value>) -> bool {
        let Some(json) = self.validate(key, value) else {
            return false;
        };
        match layout::codable_to_value(&json) {
            Ok(value) => {
                self.put(key, value);
                true
            }
            Err(e) => {
                warn!(key, error = %e, "codable entry not persisted");
                false
            }
        }
    }

    fn get_archived(&self, key: &str) -> Option<Vec<u8>> {
        layout::archived_from_value(key, self.entry(key)?).ok()
    }

    fn set_archived(&self, key: &str, bytes: Option<Vec<u8>>) -> bool {
        let Some(bytes) = self.validate(key, bytes) else {
            return false;
        };
        self.put(key, Value::Data(bytes));
        true
    }

    fn exists(&self, key: &str) -> bool {
        self.entries.read().expect("lock poisoned").contains_key(key)
    }

    fn remove(&self, key: &str) {
        self.entries.write().expect("lock poisoned").remove(key);
    }

    fn remove_all(&self) {
        self.entries.write().expect("lock poisoned").clear();
    }
}

impl std::fmt::Debug for MemoryContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len();
        f.debug_struct("MemoryContainer")
            .field("entry_count", &count)
            .finish()
    }
}

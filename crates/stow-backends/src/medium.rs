//! Generic containers over the two kinds of storage medium.
//!
//! A backend only has to say how to load, store, and erase entries on its
//! medium. [`ValueContainer`] and [`ByteContainer`] turn that into the full
//! [`Container`] surface, applying the matching layout from
//! [`stow_container::layout`] and the "failures read as absent" policy.

use std::fmt;

use stow_container::{layout, Container, ContainerExt};
use stow_types::Value;
use tracing::warn;

/// A medium that stores [`Value`]s natively (preference stores, documents).
pub trait ValueMedium: Send + Sync {
    /// Backend name reported by [`Container::name`].
    const NAME: &'static str;

    type Error: fmt::Display;

    /// Load the entry under `key`. A missing entry is `Ok(None)`.
    fn load(&self, key: &str) -> Result<Option<Value>, Self::Error>;

    /// Store `value` under `key`, replacing any existing entry.
    fn store(&self, key: &str, value: Value) -> Result<(), Self::Error>;

    /// Erase the entry under `key`. Erasing a missing entry succeeds.
    fn erase(&self, key: &str) -> Result<(), Self::Error>;

    /// Erase every entry.
    fn erase_all(&self) -> Result<(), Self::Error>;

    /// Whether an entry is stored under `key`.
    fn contains(&self, key: &str) -> Result<bool, Self::Error>;
}

/// A medium that stores opaque bytes (credential vaults, files).
pub trait ByteMedium: Send + Sync {
    /// Backend name reported by [`Container::name`].
    const NAME: &'static str;

    type Error: fmt::Display;

    /// Load the bytes under `key`. A missing entry is `Ok(None)`.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Store `bytes` under `key`.
    fn store(&self, key: &str, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Erase the entry under `key`. Erasing a missing entry succeeds.
    fn erase(&self, key: &str) -> Result<(), Self::Error>;

    /// Erase every entry.
    fn erase_all(&self) -> Result<(), Self::Error>;

    /// Whether an entry is stored under `key`.
    fn contains(&self, key: &str) -> Result<bool, Self::Error>;
}

fn absorb<T, E: fmt::Display>(medium: &str, key: &str, op: &str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(medium, key, op, error = %e, "storage operation failed");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Value-native container
// ---------------------------------------------------------------------------

/// [`Container`] over a [`ValueMedium`].
pub struct ValueContainer<M> {
    medium: M,
}

impl<M: ValueMedium> ValueContainer<M> {
    /// Wrap a medium.
    pub fn from_medium(medium: M) -> Self {
        Self { medium }
    }

    /// The underlying medium, for its fallible API.
    pub fn medium(&self) -> &M {
        &self.medium
    }

    fn load(&self, key: &str) -> Option<Value> {
        absorb(M::NAME, key, "load", self.medium.load(key)).flatten()
    }

    fn store(&self, key: &str, value: Value) -> bool {
        absorb(M::NAME, key, "store", self.medium.store(key, value)).is_some()
    }
}

impl<M: ValueMedium> Container for ValueContainer<M> {
    fn name(&self) -> &str {
        M::NAME
    }

    fn get_scalar(&self, key: &str) -> Option<Value> {
        self.load(key)
    }

    fn set_scalar(&self, key: &str, value: Option<Value>) -> bool {
        match self.validate(key, value) {
            Some(value) => self.store(key, value),
            None => false,
        }
    }

    fn get_collection(&self, key: &str) -> Option<Vec<Value>> {
        let value = self.load(key)?;
        absorb(M::NAME, key, "decode", layout::collection_from_value(key, value))
    }

    fn set_collection(&self, key: &str, values: Option<Vec<Value>>) -> bool {
        match self.validate(key, values) {
            Some(values) => self.store(key, Value::Array(values)),
            None => false,
        }
    }

    fn get_object(&self, key: &str) -> Option<Value> {
        self.load(key)
    }

    fn set_object(&self, key: &str, value: Option<Value>) -> bool {
        self.set_scalar(key, value)
    }

    fn get_codable(&self, key: &str) -> Option<serde_json::Value> {
        let value = self.load(key)?;
        absorb(M::NAME, key, "decode", layout::codable_from_value(key, value))
    }

    fn set_codable(&self, key: &str, value: Option<serde_json::Value>) -> bool {
        let Some(json) = self.validate(key, value) else {
            return false;
        };
        absorb(M::NAME, key, "encode", layout::codable_to_value(&json))
            .is_some_and(|value| self.store(key, value))
    }

    fn get_archived(&self, key: &str) -> Option<Vec<u8>> {
        let value = self.load(key)?;
        absorb(M::NAME, key, "decode", layout::archived_from_value(key, value))
    }

    fn set_archived(&self, key: &str, bytes: Option<Vec<u8>>) -> bool {
        match self.validate(key, bytes) {
            Some(bytes) => self.store(key, Value::Data(bytes)),
            None => false,
        }
    }

    fn exists(&self, key: &str) -> bool {
        absorb(M::NAME, key, "contains", self.medium.contains(key)).unwrap_or(false)
    }

    fn remove(&self, key: &str) {
        absorb(M::NAME, key, "erase", self.medium.erase(key));
    }

    fn remove_all(&self) {
        absorb(M::NAME, "*", "erase_all", self.medium.erase_all());
    }
}

impl<M: fmt::Debug> fmt::Debug for ValueContainer<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValueContainer").field(&self.medium).finish()
    }
}

// ---------------------------------------------------------------------------
// Byte-native container
// ---------------------------------------------------------------------------

/// [`Container`] over a [`ByteMedium`]. Every form is archived to bytes.
pub struct ByteContainer<M> {
    medium: M,
}

impl<M: ByteMedium> ByteContainer<M> {
    /// Wrap a medium.
    pub fn from_medium(medium: M) -> Self {
        Self { medium }
    }

    /// The underlying medium, for its fallible API.
    pub fn medium(&self) -> &M {
        &self.medium
    }

    fn load(&self, key: &str) -> Option<Vec<u8>> {
        absorb(M::NAME, key, "load", self.medium.load(key)).flatten()
    }

    fn store(&self, key: &str, bytes: &[u8]) -> bool {
        absorb(M::NAME, key, "store", self.medium.store(key, bytes)).is_some()
    }

    fn load_value(&self, key: &str) -> Option<Value> {
        let bytes = self.load(key)?;
        absorb(M::NAME, key, "unarchive", layout::unarchive_value(&bytes))
    }

    fn store_value(&self, key: &str, value: &Value) -> bool {
        absorb(M::NAME, key, "archive", layout::archive_value(value))
            .is_some_and(|bytes| self.store(key, &bytes))
    }
}

impl<M: ByteMedium> Container for ByteContainer<M> {
    fn name(&self) -> &str {
        M::NAME
    }

    fn get_scalar(&self, key: &str) -> Option<Value> {
        self.load_value(key)
    }

    fn set_scalar(&self, key: &str, value: Option<Value>) -> bool {
        match self.validate(key, value) {
            Some(value) => self.store_value(key, &value),
            None => false,
        }
    }

    fn get_collection(&self, key: &str) -> Option<Vec<Value>> {
        let value = self.load_value(key)?;
        absorb(M::NAME, key, "decode", layout::collection_from_value(key, value))
    }

    fn set_collection(&self, key: &str, values: Option<Vec<Value>>) -> bool {
        match self.validate(key, values) {
            Some(values) => self.store_value(key, &Value::Array(values)),
            None => false,
        }
    }

    fn get_object(&self, key: &str) -> Option<Value> {
        self.load_value(key)
    }

    fn set_object(&self, key: &str, value: Option<Value>) -> bool {
        self.set_scalar(key, value)
    }

    fn get_codable(&self, key: &str) -> Option<serde_json::Value> {
        let bytes = self.load(key)?;
        absorb(M::NAME, key, "decode", layout::decode_json(&bytes))
    }

    fn set_codable(&self, key: &str, value: Option<serde_json::Value>) -> bool {
        let Some(json) = self.validate(key, value) else {
            return false;
        };
        absorb(M::NAME, key, "encode", layout::encode_json(&json))
            .is_some_and(|bytes| self.store(key, &bytes))
    }

    fn get_archived(&self, key: &str) -> Option<Vec<u8>> {
        self.load(key)
    }

    fn set_archived(&self, key: &str, bytes: Option<Vec<u8>>) -> bool {
        match self.validate(key, bytes) {
            Some(bytes) => self.store(key, &bytes),
            None => false,
        }
    }

    fn exists(&self, key: &str) -> bool {
        absorb(M::NAME, key, "contains", self.medium.contains(key)).unwrap_or(false)
    }

    fn remove(&self, key: &str) {
        absorb(M::NAME, key, "erase", self.medium.erase(key));
    }

    fn remove_all(&self) {
        absorb(M::NAME, "*", "erase_all", self.medium.erase_all());
    }
}

impl<M: fmt::Debug> fmt::Debug for ByteContainer<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ByteContainer").field(&self.medium).finish()
    }
}

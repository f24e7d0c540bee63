//! The [`Container`] trait defining the storage backend interface.
//!
//! Any backend (preferences, credential vault, filesystem, document) implements
//! this trait so that bridges can read and write typed values without knowing
//! which medium sits underneath.

use std::sync::Arc;

use stow_types::Value;

/// A storage backend addressed by string keys.
///
/// The surface is five parallel read/write pairs, one per serialized form a
/// bridge can produce:
///
/// | pair         | payload              | used for                         |
/// |--------------|----------------------|----------------------------------|
/// | scalar       | primitive [`Value`]  | strings, numbers, dates, blobs   |
/// | collection   | `Vec<Value>`         | lists of primitives              |
/// | object       | any [`Value`] tree   | dictionaries, lists of objects   |
/// | codable      | `serde_json::Value`  | structured serde types           |
/// | archived     | opaque bytes         | everything else                  |
///
/// Implementations must satisfy these invariants:
/// - Writing `None` through any `set_*` is exactly `remove(key)`. A backend
///   never stores a tombstone. Route every write through
///   [`ContainerExt::validate`] before persisting.
/// - Read failures (missing entry, unreadable medium, undecodable payload)
///   yield `None`. Write failures are logged and dropped. Callers that need an
///   error channel use the backend's own fallible methods instead.
/// - Every `set_*` returns `true` only when a value was persisted. Removal
///   through `None` and dropped writes return `false`.
/// - No operation is cancellable and none takes a lock across calls: two
///   callers mutating the same key race, and the backend's own atomicity
///   decides the outcome.
pub trait Container: Send + Sync {
    /// Short backend name for diagnostics (e.g. `"memory"`, `"file"`).
    fn name(&self) -> &str;

    /// Read a primitive value.
    fn get_scalar(&self, key: &str) -> Option<Value>;

    /// Write a primitive value, or remove the key when `None`.
    fn set_scalar(&self, key: &str, value: Option<Value>) -> bool;

    /// Read a list of primitive values.
    fn get_collection(&self, key: &str) -> Option<Vec<Value>>;

    /// Write a list of primitive values, or remove the key when `None`.
    fn set_collection(&self, key: &str, values: Option<Vec<Value>>) -> bool;

    /// Read an arbitrary value tree.
    fn get_object(&self, key: &str) -> Option<Value>;

    /// Write an arbitrary value tree, or remove the key when `None`.
    fn set_object(&self, key: &str, value: Option<Value>) -> bool;

    /// Read a JSON document. The container owns the byte encoding.
    fn get_codable(&self, key: &str) -> Option<serde_json::Value>;

    /// Write a JSON document, or remove the key when `None`.
    fn set_codable(&self, key: &str, value: Option<serde_json::Value>) -> bool;

    /// Read an opaque archive.
    fn get_archived(&self, key: &str) -> Option<Vec<u8>>;

    /// Write an opaque archive, or remove the key when `None`.
    fn set_archived(&self, key: &str, bytes: Option<Vec<u8>>) -> bool;

    /// Whether any entry is stored under `key`.
    fn exists(&self, key: &str) -> bool;

    /// Remove the entry under `key`. Removing a missing key is a no-op.
    fn remove(&self, key: &str);

    /// Remove every entry this container owns.
    fn remove_all(&self);
}

/// Provided behaviour shared by every [`Container`].
pub trait ContainerExt: Container {
    /// Pass a present value through unchanged; remove the key for `None`.
    ///
    /// Every backend write path calls this first, which is what makes
    /// "write nothing" and "remove" the same operation.
    fn validate<T>(&self, key: &str, value: Option<T>) -> Option<T> {
        match value {
            Some(value) => Some(value),
            None => {
                self.remove(key);
                None
            }
        }
    }
}

impl<C: Container + ?Sized> ContainerExt for C {}

/// A container shared between buckets, stores, and adapters.
pub type SharedContainer = Arc<dyn Container>;

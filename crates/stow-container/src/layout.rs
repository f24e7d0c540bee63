//! How the five container forms map onto a backend's native medium.
//!
//! Backends come in two shapes. Value-native backends (preferences,
//! documents, memory) hold [`Value`]s and keep scalars, collections, and
//! objects as they are; they only need codable and archived payloads turned
//! into `Data`. Byte-native backends (credential vaults, files) hold opaque
//! blobs, so every form is archived before it reaches the medium.

use stow_types::{Archive, Value};

use crate::error::{ContainerError, ContainerResult};

/// Encode a JSON document into the bytes a container persists.
pub fn encode_json(json: &serde_json::Value) -> ContainerResult<Vec<u8>> {
    Ok(serde_json::to_vec(json)?)
}

/// Decode bytes written by [`encode_json`].
pub fn decode_json(bytes: &[u8]) -> ContainerResult<serde_json::Value> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Value-native layout of a codable payload: JSON bytes in a `Data` value.
pub fn codable_to_value(json: &serde_json::Value) -> ContainerResult<Value> {
    Ok(Value::Data(encode_json(json)?))
}

/// Inverse of [`codable_to_value`].
pub fn codable_from_value(key: &str, value: Value) -> ContainerResult<serde_json::Value> {
    match value {
        Value::Data(bytes) => decode_json(&bytes),
        _ => Err(ContainerError::Layout {
            key: key.to_string(),
            expected: "json data",
        }),
    }
}

/// Value-native layout of an archive: the raw bytes in a `Data` value.
pub fn archived_from_value(key: &str, value: Value) -> ContainerResult<Vec<u8>> {
    match value {
        Value::Data(bytes) => Ok(bytes),
        _ => Err(ContainerError::Layout {
            key: key.to_string(),
            expected: "archive data",
        }),
    }
}

/// Value-native layout of a collection: an `Array` value.
pub fn collection_from_value(key: &str, value: Value) -> ContainerResult<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(ContainerError::Layout {
            key: key.to_string(),
            expected: "array",
        }),
    }
}

/// Byte-native layout of a value tree.
pub fn archive_value(value: &Value) -> ContainerResult<Vec<u8>> {
    Ok(value.archive()?)
}

/// Inverse of [`archive_value`].
pub fn unarchive_value(bytes: &[u8]) -> ContainerResult<Value> {
    Ok(Value::unarchive(bytes)?)
}

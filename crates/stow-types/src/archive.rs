//! Opaque binary archival for values with no other lossless encoding.
//!
//! The archive format is `bincode`. It is compact and stable for a given
//! type definition, but it is not self-describing: an archive can only be
//! read back by the type that wrote it.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{TypeError, TypeResult};
use crate::value::Value;

/// A type that can be flattened into an opaque byte archive.
pub trait Archive: Sized {
    /// Encode `self` into archive bytes.
    fn archive(&self) -> TypeResult<Vec<u8>>;

    /// Decode archive bytes written by [`Archive::archive`].
    fn unarchive(bytes: &[u8]) -> TypeResult<Self>;
}

/// Archive any serde-serializable value.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> TypeResult<Vec<u8>> {
    bincode::serialize(value).map_err(|e| TypeError::Serialization(e.to_string()))
}

/// Decode an archive produced by [`encode`].
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> TypeResult<T> {
    bincode::deserialize(bytes).map_err(|e| TypeError::Serialization(e.to_string()))
}

impl Archive for Value {
    fn archive(&self) -> TypeResult<Vec<u8>> {
        encode(self)
    }

    fn unarchive(bytes: &[u8]) -> TypeResult<Self> {
        decode(bytes)
    }
}

/// A list archives each element separately, then archives the list of
/// element archives.
impl<T: Archive> Archive for Vec<T> {
    fn archive(&self) -> TypeResult<Vec<u8>> {
        let parts = self
            .iter()
            .map(Archive::archive)
            .collect::<TypeResult<Vec<Vec<u8>>>>()?;
        encode(&parts)
    }

    fn unarchive(bytes: &[u8]) -> TypeResult<Self> {
        let parts: Vec<Vec<u8>> = decode(bytes)?;
        parts.iter().map(|part| T::unarchive(part)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Avatar {
        width: u32,
        pixels: Vec<u8>,
    }

    impl Archive for Avatar {
        fn archive(&self) -> TypeResult<Vec<u8>> {
            encode(self)
        }

        fn unarchive(bytes: &[u8]) -> TypeResult<Self> {
            decode(bytes)
        }
    }

    #[test]
    fn value_archive_round_trip() {
        let value = Value::Array(vec![Value::Integer(7), Value::String("x".into())]);
        let bytes = value.archive().unwrap();
        assert_eq!(Value::unarchive(&bytes).unwrap(), value);
    }

    #[test]
    fn list_of_archives_round_trip() {
        let avatars = vec![
            Avatar { width: 1, pixels: vec![0] },
            Avatar { width: 2, pixels: vec![1, 2] },
        ];
        let bytes = avatars.archive().unwrap();
        assert_eq!(Vec::<Avatar>::unarchive(&bytes).unwrap(), avatars);
    }

    #[test]
    fn garbage_fails_to_unarchive() {
        let err = Avatar::unarchive(&[0xff]).unwrap_err();
        assert!(matches!(err, TypeError::Serialization(_)));
    }
}

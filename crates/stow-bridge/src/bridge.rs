//! The bridge variants.
//!
//! A bridge is a zero-sized strategy type: it names which container pair a
//! value travels through and how the value is converted on the way. Bridges
//! are never instantiated; every operation is an associated function.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use stow_container::Container;
use stow_types::{Archive, Primitive, Value};
use tracing::{debug, warn};

use crate::storable::{RawRepresentable, Storable};

/// Moves values of one type in and out of a [`Container`].
pub trait Bridge {
    /// The type this bridge reads and writes.
    type Value;

    /// `false` for type shapes that cannot be stored (nested collections).
    const SUPPORTED: bool = true;

    /// Short strategy name for diagnostics.
    const NAME: &'static str;

    /// Read the value under `key`. Missing and undecodable entries are `None`.
    fn read(key: &str, container: &dyn Container) -> Option<Self::Value>;

    /// Write `value` under `key`. `None` removes the key.
    ///
    /// Returns `true` only when a value was persisted.
    fn write(key: &str, value: Option<&Self::Value>, container: &dyn Container) -> bool;
}

// ---------------------------------------------------------------------------
// Scalar and collection-of-scalar
// ---------------------------------------------------------------------------

/// Primitives through the scalar pair.
pub struct ScalarBridge<T>(PhantomData<fn() -> T>);

impl<T: Primitive> Bridge for ScalarBridge<T> {
    type Value = T;
    const NAME: &'static str = "scalar";

    fn read(key: &str, container: &dyn Container) -> Option<T> {
        let value = container.get_scalar(key)?;
        let kind = value.kind();
        let decoded = T::from_value(value);
        if decoded.is_none() {
            debug!(key, stored = %kind, "scalar has unexpected kind");
        }
        decoded
    }

    fn write(key: &str, value: Option<&T>, container: &dyn Container) -> bool {
        container.set_scalar(key, value.map(Primitive::to_value))
    }
}

/// Lists of primitives through the collection pair.
///
/// Reads are all-or-nothing: one element of the wrong kind makes the whole
/// list absent.
pub struct CollectionBridge<T>(PhantomData<fn() -> T>);

impl<T: Primitive> Bridge for CollectionBridge<T> {
    type Value = Vec<T>;
    const NAME: &'static str = "collection";

    fn read(key: &str, container: &dyn Container) -> Option<Vec<T>> {
        container
            .get_collection(key)?
            .into_iter()
            .map(T::from_value)
            .collect()
    }

    fn write(key: &str, value: Option<&Vec<T>>, container: &dyn Container) -> bool {
        let values = value.map(|items| items.iter().map(Primitive::to_value).collect());
        container.set_collection(key, values)
    }
}

// ---------------------------------------------------------------------------
// Object trees
// ---------------------------------------------------------------------------

/// A type that is itself a property-list tree.
pub trait ObjectForm: Sized {
    fn to_object(&self) -> Value;
    fn from_object(value: Value) -> Option<Self>;
}

impl ObjectForm for Value {
    fn to_object(&self) -> Value {
        self.clone()
    }

    fn from_object(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl ObjectForm for BTreeMap<String, Value> {
    fn to_object(&self) -> Value {
        Value::Dictionary(self.clone())
    }

    fn from_object(value: Value) -> Option<Self> {
        match value {
            Value::Dictionary(map) => Some(map),
            _ => None,
        }
    }
}

/// Value trees through the object pair.
pub struct ObjectBridge<T>(PhantomData<fn() -> T>);

impl<T: ObjectForm> Bridge for ObjectBridge<T> {
    type Value = T;
    const NAME: &'static str = "object";

    fn read(key: &str, container: &dyn Container) -> Option<T> {
        T::from_object(container.get_object(key)?)
    }

    fn write(key: &str, value: Option<&T>, container: &dyn Container) -> bool {
        container.set_object(key, value.map(ObjectForm::to_object))
    }
}

/// Lists of value trees through the object pair, stored as one `Array`.
pub struct ObjectCollectionBridge<T>(PhantomData<fn() -> T>);

impl<T: ObjectForm> Bridge for ObjectCollectionBridge<T> {
    type Value = Vec<T>;
    const NAME: &'static str = "object-collection";

    fn read(key: &str, container: &dyn Container) -> Option<Vec<T>> {
        match container.get_object(key)? {
            Value::Array(items) => items.into_iter().map(T::from_object).collect(),
            _ => None,
        }
    }

    fn write(key: &str, value: Option<&Vec<T>>, container: &dyn Container) -> bool {
        let object =
            value.map(|items| Value::Array(items.iter().map(ObjectForm::to_object).collect()));
        container.set_object(key, object)
    }
}

// ---------------------------------------------------------------------------
// JSON codable
// ---------------------------------------------------------------------------

/// Serde types through the codable pair.
pub struct JsonBridge<T>(PhantomData<fn() -> T>);

impl<T: Serialize + DeserializeOwned> Bridge for JsonBridge<T> {
    type Value = T;
    const NAME: &'static str = "codable";

    fn read(key: &str, container: &dyn Container) -> Option<T> {
        let json = container.get_codable(key)?;
        match serde_json::from_value(json) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "stored JSON does not decode");
                None
            }
        }
    }

    fn write(key: &str, value: Option<&T>, container: &dyn Container) -> bool {
        let Some(value) = value else {
            return container.set_codable(key, None);
        };
        match serde_json::to_value(value) {
            Ok(json) => container.set_codable(key, Some(json)),
            Err(e) => {
                warn!(key, error = %e, "value not persisted: JSON encoding failed");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Archived
// ---------------------------------------------------------------------------

/// [`Archive`] types through the archived pair.
pub struct ArchivedBridge<T>(PhantomData<fn() -> T>);

impl<T: Archive> Bridge for ArchivedBridge<T> {
    type Value = T;
    const NAME: &'static str = "archived";

    fn read(key: &str, container: &dyn Container) -> Option<T> {
        let bytes = container.get_archived(key)?;
        match T::unarchive(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "stored archive does not decode");
                None
            }
        }
    }

    fn write(key: &str, value: Option<&T>, container: &dyn Container) -> bool {
        let Some(value) = value else {
            return container.set_archived(key, None);
        };
        match value.archive() {
            Ok(bytes) => container.set_archived(key, Some(bytes)),
            Err(e) => {
                warn!(key, error = %e, "value not persisted: archiving failed");
                false
            }
        }
    }
}

/// Lists of [`Archive`] types through the object pair: an `Array` holding
/// one `Data` archive per element.
pub struct ArchivedCollectionBridge<T>(PhantomData<fn() -> T>);

impl<T: Archive> Bridge for ArchivedCollectionBridge<T> {
    type Value = Vec<T>;
    const NAME: &'static str = "archived-collection";

    fn read(key: &str, container: &dyn Container) -> Option<Vec<T>> {
        let Value::Array(items) = container.get_object(key)? else {
            return None;
        };
        items
            .into_iter()
            .map(|item| match item {
                Value::Data(bytes) => T::unarchive(&bytes).ok(),
                _ => None,
            })
            .collect()
    }

    fn write(key: &str, value: Option<&Vec<T>>, container: &dyn Container) -> bool {
        let Some(items) = value else {
            return container.set_object(key, None);
        };
        let archived: Result<Vec<Value>, _> = items
            .iter()
            .map(|item| item.archive().map(Value::Data))
            .collect();
        match archived {
            Ok(items) => container.set_object(key, Some(Value::Array(items))),
            Err(e) => {
                warn!(key, error = %e, "value not persisted: archiving failed");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Enum raw values
// ---------------------------------------------------------------------------

/// Raw-value enums through their raw type's bridge.
///
/// A stored raw value that names no case reads as absent.
pub struct EnumBridge<T>(PhantomData<fn() -> T>);

impl<T: RawRepresentable> Bridge for EnumBridge<T> {
    type Value = T;
    const NAME: &'static str = "enum";

    fn read(key: &str, container: &dyn Container) -> Option<T> {
        let raw = <<T::Raw as Storable>::Bridge as Bridge>::read(key, container)?;
        let case = T::from_raw(raw);
        if case.is_none() {
            debug!(key, "stored raw value names no case");
        }
        case
    }

    fn write(key: &str, value: Option<&T>, container: &dyn Container) -> bool {
        let raw = value.map(RawRepresentable::raw_value);
        <<T::Raw as Storable>::Bridge as Bridge>::write(key, raw.as_ref(), container)
    }
}

/// Lists of raw-value enums through the raw type's array bridge.
///
/// One unrecognised raw value makes the whole list absent.
pub struct EnumCollectionBridge<T>(PhantomData<fn() -> T>);

impl<T: RawRepresentable> Bridge for EnumCollectionBridge<T> {
    type Value = Vec<T>;
    const NAME: &'static str = "enum-collection";

    fn read(key: &str, container: &dyn Container) -> Option<Vec<T>> {
        let raws = <<T::Raw as Storable>::ArrayBridge as Bridge>::read(key, container)?;
        let cases: Option<Vec<T>> = raws.into_iter().map(T::from_raw).collect();
        if cases.is_none() {
            debug!(key, "stored list holds a raw value that names no case");
        }
        cases
    }

    fn write(key: &str, value: Option<&Vec<T>>, container: &dyn Container) -> bool {
        let raws: Option<Vec<T::Raw>> =
            value.map(|cases| cases.iter().map(RawRepresentable::raw_value).collect());
        <<T::Raw as Storable>::ArrayBridge as Bridge>::write(key, raws.as_ref(), container)
    }
}

// ---------------------------------------------------------------------------
// Optional and unsupported
// ---------------------------------------------------------------------------

/// `Option<T>` through `T`'s bridge. `Some(None)` writes as removal, so the
/// stored form is never double-wrapped.
pub struct OptionalBridge<B>(PhantomData<fn() -> B>);

impl<B: Bridge> Bridge for OptionalBridge<B> {
    type Value = Option<B::Value>;
    const SUPPORTED: bool = B::SUPPORTED;
    const NAME: &'static str = B::NAME;

    fn read(key: &str, container: &dyn Container) -> Option<Option<B::Value>> {
        B::read(key, container).map(Some)
    }

    fn write(key: &str, value: Option<&Option<B::Value>>, container: &dyn Container) -> bool {
        B::write(key, value.and_then(Option::as_ref), container)
    }
}

/// Placeholder bridge for shapes that cannot be stored. Buckets refuse to
/// build over it.
pub struct Unsupported<V>(PhantomData<fn() -> V>);

impl<V> Bridge for Unsupported<V> {
    type Value = V;
    const SUPPORTED: bool = false;
    const NAME: &'static str = "unsupported";

    fn read(_key: &str, _container: &dyn Container) -> Option<V> {
        None
    }

    fn write(key: &str, _value: Option<&V>, _container: &dyn Container) -> bool {
        warn!(key, "write through unsupported bridge ignored");
        false
    }
}

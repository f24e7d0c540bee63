//! Which bridge a type uses.
//!
//! Every storable type names two bridges: [`Storable::Bridge`] for a single
//! value, and [`Storable::ArrayBridge`] for a `Vec` of it. `Vec<T>` takes
//! `T`'s array bridge, which is why a nested `Vec<Vec<T>>` lands on
//! [`Unsupported`].

use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use stow_types::{Url, Value};

use crate::bridge::{
    Bridge, CollectionBridge, ObjectBridge, ObjectCollectionBridge, OptionalBridge, ScalarBridge,
    Unsupported,
};

/// A type that can live in a bucket.
///
/// Implemented here for the primitives, [`Value`] trees, `Option<T>`, and
/// `Vec<T>`. User types opt in with [`storable_codable!`](crate::storable_codable),
/// [`storable_archived!`](crate::storable_archived), or
/// [`storable_raw!`](crate::storable_raw).
pub trait Storable: Sized + fmt::Debug {
    /// Bridge for one value.
    type Bridge: Bridge<Value = Self>;

    /// Bridge for a `Vec` of values.
    type ArrayBridge: Bridge<Value = Vec<Self>>;

    /// Whether writing this value should remove the key instead.
    fn is_absent(&self) -> bool {
        false
    }

    /// The value a schema field reads as when nothing is stored.
    ///
    /// # Panics
    ///
    /// Mandatory types have no empty value, so the default panics with the
    /// field name. A mandatory field must be seeded when it is declared.
    fn on_missing(field: &str) -> Self {
        panic!("mandatory field `{field}` has no stored value; declare it with an initial value")
    }

    /// Human-readable rendering for bucket descriptions and the debug log.
    fn describe(&self) -> String {
        format!("{self:?}")
    }
}

/// An enum that round-trips through a raw storable value.
pub trait RawRepresentable: Sized {
    type Raw: Storable;

    fn raw_value(&self) -> Self::Raw;

    /// The case for `raw`, or `None` if `raw` names no case.
    fn from_raw(raw: Self::Raw) -> Option<Self>;
}

macro_rules! scalar_storable {
    ($($ty:ty),+ $(,)?) => {$(
        impl Storable for $ty {
            type Bridge = ScalarBridge<$ty>;
            type ArrayBridge = CollectionBridge<$ty>;
        }
    )+};
}

scalar_storable!(String, i64, i32, u32, f64, f32, bool, DateTime<Utc>, Bytes, Url);

impl Storable for Value {
    type Bridge = ObjectBridge<Value>;
    type ArrayBridge = ObjectCollectionBridge<Value>;

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl Storable for BTreeMap<String, Value> {
    type Bridge = ObjectBridge<BTreeMap<String, Value>>;
    type ArrayBridge = ObjectCollectionBridge<BTreeMap<String, Value>>;
}

impl<T: Storable> Storable for Option<T> {
    type Bridge = OptionalBridge<T::Bridge>;
    type ArrayBridge = Unsupported<Vec<Option<T>>>;

    fn is_absent(&self) -> bool {
        self.as_ref().map_or(true, T::is_absent)
    }

    fn on_missing(_field: &str) -> Self {
        None
    }

    fn describe(&self) -> String {
        match self {
            Some(value) => value.describe(),
            None => "NA".to_string(),
        }
    }
}

impl<T: Storable> Storable for Vec<T> {
    type Bridge = T::ArrayBridge;
    type ArrayBridge = Unsupported<Vec<Vec<T>>>;
}

/// Whether `T` can be stored at all.
pub const fn is_supported<T: Storable>() -> bool {
    <T::Bridge as Bridge>::SUPPORTED
}

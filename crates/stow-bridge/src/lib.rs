//! Type-directed bridges between Rust values and stow containers.
//!
//! A [`Storable`] type names the [`Bridge`] that carries it, and the bridge
//! picks one of the container's five pairs:
//!
//! | type                                  | bridge                        | pair       |
//! |---------------------------------------|-------------------------------|------------|
//! | `String`, integers, floats, `bool`, dates, `Bytes`, `Url` | [`ScalarBridge`] | scalar |
//! | `Vec` of those                        | [`CollectionBridge`]          | collection |
//! | [`Value`](stow_types::Value), `BTreeMap<String, Value>` (and `Vec`s) | [`ObjectBridge`], [`ObjectCollectionBridge`] | object |
//! | [`storable_codable!`] types (and `Vec`s) | [`JsonBridge`]             | codable    |
//! | [`storable_archived!`] types          | [`ArchivedBridge`]            | archived   |
//! | `Vec` of archived types               | [`ArchivedCollectionBridge`]  | object     |
//! | [`storable_raw!`] enums (and `Vec`s)  | [`EnumBridge`], [`EnumCollectionBridge`] | the raw type's |
//! | `Option<T>`                           | [`OptionalBridge`] over `T`'s | `T`'s      |
//!
//! `Vec<Vec<T>>` and `Vec<Option<T>>` resolve to [`Unsupported`].

pub mod bridge;
mod macros;
pub mod storable;

pub use bridge::{
    ArchivedBridge, ArchivedCollectionBridge, Bridge, CollectionBridge, EnumBridge,
    EnumCollectionBridge, JsonBridge, ObjectBridge, ObjectCollectionBridge, ObjectForm,
    OptionalBridge, ScalarBridge, Unsupported,
};
pub use storable::{is_supported, RawRepresentable, Storable};

#[doc(hidden)]
pub mod __private {
    pub use stow_types::{archive, Archive, TypeResult};
}

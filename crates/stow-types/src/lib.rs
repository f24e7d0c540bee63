//! Foundation types for stow.
//!
//! Every other stow crate depends on `stow-types`.
//!
//! # Key Types
//!
//! - [`Value`] -- property-list value exchanged between bridges and containers
//! - [`Primitive`] -- platform scalars that map losslessly onto a [`Value`]
//! - [`Url`] -- validated absolute URL
//! - [`Archive`] -- opaque binary archival for everything else
//! - [`Timestamp`] -- UTC instant used for freshness and expiration metadata

pub mod archive;
pub mod error;
pub mod temporal;
pub mod url;
pub mod value;

pub use archive::Archive;
pub use error::{TypeError, TypeResult};
pub use temporal::{expire_key, update_key, Timestamp};
pub use url::Url;
pub use value::{Primitive, Value, ValueKind};

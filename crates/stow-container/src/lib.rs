//! Storage container contract for stow.
//!
//! A container is a key-addressed backend with a uniform typed surface. The
//! bridge layer picks one of the container's five read/write pairs for each
//! value type; the container decides how that form lands on its medium.
//!
//! # Backends
//!
//! All backends implement the [`Container`] trait:
//!
//! - [`MemoryContainer`] -- `HashMap`-based container for tests and embedding
//! - the preferences, credential, file, and document backends live in
//!   `stow-backends`
//!
//! # Design Rules
//!
//! 1. Writing nothing is removing: `set_*(key, None)` equals `remove(key)`.
//! 2. Reads never fail; an unreadable entry is an absent entry.
//! 3. Writes never fail; an unpersistable write is logged and dropped.
//! 4. Containers do no cross-call locking. Concurrent writers to one key race.

pub mod error;
pub mod layout;
pub mod memory;
pub mod traits;

pub use error::{ContainerError, ContainerResult};
pub use memory::MemoryContainer;
pub use traits::{Container, ContainerExt, SharedContainer};

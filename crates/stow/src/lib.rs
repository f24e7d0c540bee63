//! Typed key-value persistence over pluggable containers.
//!
//! This is the main entry point for applications using stow. It re-exports
//! the container contract, the backends, and the bridge layer, and adds:
//!
//! - [`Bucket`] -- a typed value under one key with `key-update` and
//!   `key-expire` metadata, expired lazily on read
//! - [`Store`], [`Field`], [`Adapter`] -- a schema of buckets accessed by field
//! - [`StoreConfig`] -- default container and debug log for a schema
//! - [`DebugLog`] -- opt-in journal of bucket writes
//!
//! Nothing here locks across calls. Callers that write one key from several
//! threads or processes must coordinate themselves.

pub mod bucket;
pub mod config;
pub mod debug;
pub mod store;

pub use bucket::{Bucket, BucketBuilder};
pub use config::StoreConfig;
pub use debug::DebugLog;
pub use store::{Adapter, Field, Store};

// Re-export the layers underneath
pub use stow_backends::{
    BackendConfig, CredentialContainer, CredentialVault, DocumentConfig, DocumentContainer,
    DocumentOrigin, FileConfig, FileContainer, MemoryVault, OverwritePolicy, PreferencesConfig,
    PreferencesContainer, VaultConfig,
};
pub use stow_bridge::{
    is_supported, storable_archived, storable_codable, storable_raw, Bridge, RawRepresentable,
    Storable,
};
pub use stow_container::{Container, ContainerExt, MemoryContainer, SharedContainer};
pub use stow_types::{temporal, Archive, Timestamp, Url, Value, ValueKind};

// Whole layers, for items not re-exported above
pub use stow_backends as backends;
pub use stow_bridge as bridge;

//! Concrete storage backends for stow.
//!
//! | backend        | medium                              | container               |
//! |----------------|-------------------------------------|-------------------------|
//! | preferences    | named suite, optional JSON file     | [`PreferencesContainer`] |
//! | credential     | [`CredentialVault`] items           | [`CredentialContainer`]  |
//! | file           | one checksummed file per key        | [`FileContainer`]        |
//! | document       | one shared JSON document            | [`DocumentContainer`]    |
//!
//! Each backend implements [`ValueMedium`] or [`ByteMedium`]; the generic
//! [`ValueContainer`] and [`ByteContainer`] supply the
//! [`Container`](stow_container::Container) surface. The medium types keep
//! their fallible methods for callers that need to see errors.
//!
//! [`BackendConfig`] selects a backend from TOML.

mod atomic;
pub mod config;
pub mod credential;
pub mod document;
pub mod error;
pub mod file;
pub mod medium;
pub mod preferences;

pub use config::{default_data_dir, BackendConfig};
pub use credential::{CredentialContainer, CredentialVault, Keychain, MemoryVault, VaultConfig};
pub use document::{Document, DocumentConfig, DocumentContainer, DocumentOrigin};
pub use error::{
    BackendError, BackendResult, CredentialError, CredentialResult, DocumentError, DocumentResult,
    FileError, FileResult, PreferencesError, PreferencesResult,
};
pub use file::{FileConfig, FileContainer, FileStore, OverwritePolicy};
pub use medium::{ByteContainer, ByteMedium, ValueContainer, ValueMedium};
pub use preferences::{Preferences, PreferencesConfig, PreferencesContainer};

use std::io;
use std::path::PathBuf;

use stow_container::ContainerError;
use thiserror::Error;

/// Errors from the filesystem backend.
#[derive(Debug, Error)]
pub enum FileError {
    /// No file is stored for the key.
    #[error("file does not exist: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists and the overwrite policy forbids replacing it.
    #[error("file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// The root directory is missing or is not a directory.
    #[error("invalid directory: {}", .0.display())]
    InvalidDirectory(PathBuf),

    /// The key cannot be used as a file name.
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: &'static str },

    /// The file's checksum does not match its payload (torn or foreign write).
    #[error("corrupt file {}", .path.display())]
    Corrupt { path: PathBuf },

    #[error("writing {} failed: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("reading {} failed: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Layout(#[from] ContainerError),
}

/// Errors from a credential vault.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The vault returned data in a shape that cannot be converted.
    #[error("data conversion error")]
    DataConversion,

    /// Any other vault failure, with the vault's own message.
    #[error("unhandled vault error: {message}")]
    Unhandled { message: String },

    #[error(transparent)]
    Layout(#[from] ContainerError),
}

/// Errors from the structured-document backend.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// An existing document was requested but is not on disk.
    #[error("document not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("document I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed document {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Layout(#[from] ContainerError),
}

/// Errors from the preferences backend.
#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("preferences I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed preferences file {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while opening a backend from configuration.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error(transparent)]
    File(#[from] FileError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Preferences(#[from] PreferencesError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error("invalid backend config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("config I/O error: {0}")]
    Io(#[from] io::Error),

    /// No platform data directory could be determined.
    #[error("could not determine a data directory")]
    NoDataDir,
}

pub type FileResult<T> = Result<T, FileError>;
pub type CredentialResult<T> = Result<T, CredentialError>;
pub type DocumentResult<T> = Result<T, DocumentError>;
pub type PreferencesResult<T> = Result<T, PreferencesError>;
pub type BackendResult<T> = Result<T, BackendError>;

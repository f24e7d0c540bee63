//! Filesystem backend: one file per key.
//!
//! On-disk format of each file:
//! ```text
//! [4 bytes: CRC32 of payload (little-endian u32)]
//! [N bytes: payload]
//! ```
//! The payload is the archived form produced by the container layer. A file
//! whose checksum does not match is reported as corrupt and reads as absent.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::atomic::write_atomic;
use crate::error::{FileError, FileResult};
use crate::medium::{ByteContainer, ByteMedium};

/// File extension used when none is configured.
pub const DEFAULT_EXTENSION: &str = "file";

const HEADER_SIZE: usize = 4;

/// What `save` does when a file already exists for the key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwritePolicy {
    /// Atomically replace the existing file.
    #[default]
    Replace,
    /// Create-only: refuse with [`FileError::AlreadyExists`].
    Reject,
}

/// Configuration for a file container.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    /// Directory holding one file per key.
    pub root: PathBuf,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default)]
    pub overwrite: OverwritePolicy,
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

impl FileConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: default_extension(),
            overwrite: OverwritePolicy::default(),
        }
    }
}

/// A directory of keyed files.
#[derive(Debug)]
pub struct FileStore {
    config: FileConfig,
}

impl FileStore {
    /// Open the root directory, creating it if needed.
    pub fn open(config: FileConfig) -> FileResult<Self> {
        if config.root.exists() && !config.root.is_dir() {
            return Err(FileError::InvalidDirectory(config.root));
        }
        fs::create_dir_all(&config.root)
            .map_err(|_| FileError::InvalidDirectory(config.root.clone()))?;
        debug!(root = %config.root.display(), "opened file store");
        Ok(Self { config })
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    pub fn config(&self) -> &FileConfig {
        &self.config
    }

    /// The file that holds `key`.
    pub fn path_for(&self, key: &str) -> FileResult<PathBuf> {
        validate_key(key)?;
        Ok(self
            .config
            .root
            .join(format!("{key}.{}", self.config.extension)))
    }

    /// Write `data` for `key`, honouring the overwrite policy.
    pub fn save(&self, key: &str, data: &[u8]) -> FileResult<()> {
        let path = self.path_for(key)?;
        if !self.config.root.is_dir() {
            return Err(FileError::InvalidDirectory(self.config.root.clone()));
        }
        if self.config.overwrite == OverwritePolicy::Reject && path.exists() {
            return Err(FileError::AlreadyExists(path));
        }

        let mut framed = Vec::with_capacity(HEADER_SIZE + data.len());
        framed.extend_from_slice(&crc32fast::hash(data).to_le_bytes());
        framed.extend_from_slice(data);

        write_atomic(&path, &framed).map_err(|source| FileError::WriteFailed { path, source })
    }

    /// Read the payload for `key`.
    pub fn read(&self, key: &str) -> FileResult<Vec<u8>> {
        let path = self.path_for(key)?;
        if !self.config.root.is_dir() {
            return Err(FileError::InvalidDirectory(self.config.root.clone()));
        }
        let framed = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(FileError::NotFound(path)),
            Err(source) => return Err(FileError::ReadFailed { path, source }),
        };
        if framed.len() < HEADER_SIZE {
            return Err(FileError::Corrupt { path });
        }
        let (header, payload) = framed.split_at(HEADER_SIZE);
        let expected = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        if crc32fast::hash(payload) != expected {
            warn!(path = %path.display(), "checksum mismatch");
            return Err(FileError::Corrupt { path });
        }
        Ok(payload.to_vec())
    }

    /// Delete the file for `key`. Returns `true` if it existed.
    pub fn delete(&self, key: &str) -> FileResult<bool> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(FileError::WriteFailed { path, source }),
        }
    }

    /// Whether a file exists for `key`.
    pub fn has(&self, key: &str) -> FileResult<bool> {
        Ok(self.path_for(key)?.is_file())
    }

    /// Sorted keys of every file with the configured extension.
    pub fn keys(&self) -> FileResult<Vec<String>> {
        let entries = fs::read_dir(&self.config.root).map_err(|source| FileError::ReadFailed {
            path: self.config.root.clone(),
            source,
        })?;
        let suffix = format!(".{}", self.config.extension);
        let mut keys: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                name.strip_suffix(&suffix).map(str::to_string)
            })
            .collect();
        keys.sort();
        Ok(keys)
    }

    /// Delete every keyed file under the root.
    pub fn delete_all(&self) -> FileResult<()> {
        for key in self.keys()? {
            self.delete(&key)?;
        }
        Ok(())
    }
}

/// Keys become file names, so they must not escape the root directory.
fn validate_key(key: &str) -> FileResult<()> {
    let invalid = |reason| {
        Err(FileError::InvalidKey {
            key: key.to_string(),
            reason,
        })
    };
    if key.is_empty() {
        return invalid("key must not be empty");
    }
    if key == "." || key == ".." {
        return invalid("key must not be a relative path component");
    }
    if key.contains(['/', '\\', '\0']) {
        return invalid("key must not contain path separators or NUL");
    }
    Ok(())
}

impl ByteMedium for FileStore {
    const NAME: &'static str = "file";
    type Error = FileError;

    fn load(&self, key: &str) -> FileResult<Option<Vec<u8>>> {
        match self.read(key) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(FileError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn store(&self, key: &str, bytes: &[u8]) -> FileResult<()> {
        self.save(key, bytes)
    }

    fn erase(&self, key: &str) -> FileResult<()> {
        self.delete(key).map(|_| ())
    }

    fn erase_all(&self) -> FileResult<()> {
        self.delete_all()
    }

    fn contains(&self, key: &str) -> FileResult<bool> {
        self.has(key)
    }
}

/// Directory of keyed files exposed as a [`Container`](stow_container::Container).
pub type FileContainer = ByteContainer<FileStore>;

impl ByteContainer<FileStore> {
    /// Open a file container rooted at `config.root`.
    pub fn open(config: FileConfig) -> FileResult<Self> {
        FileStore::open(config).map(Self::from_medium)
    }
}

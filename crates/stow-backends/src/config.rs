use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use stow_container::{MemoryContainer, SharedContainer};
use tracing::{debug, warn};

use crate::credential::{CredentialContainer, MemoryVault, VaultConfig};
use crate::document::{DocumentConfig, DocumentContainer};
use crate::error::{BackendError, BackendResult};
use crate::file::{FileConfig, FileContainer};
use crate::preferences::{PreferencesConfig, PreferencesContainer};

/// Selects and configures one backend.
///
/// In TOML the backend is named by a `kind` field:
/// ```toml
/// kind = "file"
/// root = "/var/lib/app/store"
/// overwrite = "reject"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    Memory,
    Preferences(PreferencesConfig),
    File(FileConfig),
    Document(DocumentConfig),
    /// Backed by an in-process [`MemoryVault`], so items do not outlive the
    /// process. Applications that integrate an OS keychain build a
    /// [`CredentialContainer`] over their own vault.
    Credential(VaultConfig),
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Preferences(PreferencesConfig::default())
    }
}

impl BackendConfig {
    /// Parse a backend description from TOML.
    pub fn from_toml_str(input: &str) -> BackendResult<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Load a backend description from a TOML file.
    pub fn load(path: &Path) -> BackendResult<Self> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), kind = config.kind(), "loaded backend config");
        Ok(config)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BackendConfig::Memory => "memory",
            BackendConfig::Preferences(_) => "preferences",
            BackendConfig::File(_) => "file",
            BackendConfig::Document(_) => "document",
            BackendConfig::Credential(_) => "credential",
        }
    }

    /// Whether values written through this backend survive the process.
    pub fn is_persistent(&self) -> bool {
        !matches!(self, BackendConfig::Memory | BackendConfig::Credential(_))
    }

    /// Open the configured backend as a shareable container.
    pub fn open(&self) -> BackendResult<SharedContainer> {
        let container: SharedContainer = match self {
            BackendConfig::Memory => Arc::new(MemoryContainer::new()),
            BackendConfig::Preferences(config) => Arc::new(PreferencesContainer::open(config)?),
            BackendConfig::File(config) => Arc::new(FileContainer::open(config.clone())?),
            BackendConfig::Document(config) => Arc::new(DocumentContainer::open(config)?),
            BackendConfig::Credential(scope) => Arc::new(CredentialContainer::new(
                scope.clone(),
                Arc::new(MemoryVault::new()),
            )),
        };
        if !self.is_persistent() {
            warn!(backend = container.name(), "backend is held in memory; values are lost at exit");
        }
        debug!(backend = container.name(), "opened backend");
        Ok(container)
    }
}

/// Per-user data directory for stow, e.g. `~/.local/share/stow` on Linux.
pub fn default_data_dir() -> BackendResult<PathBuf> {
    ProjectDirs::from("rs", "stow", "stow")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(BackendError::NoDataDir)
}

use std::fmt;
use std::sync::Arc;

use stow_backends::{BackendConfig, BackendResult, PreferencesContainer};
use stow_bridge::Storable;
use stow_container::SharedContainer;

use crate::bucket::BucketBuilder;
use crate::debug::DebugLog;

/// Defaults shared by every bucket a store declares.
#[derive(Clone)]
pub struct StoreConfig {
    /// Container for buckets that do not name their own.
    pub container: SharedContainer,
    /// Journal every bucket of the store writes to. Disabled by default.
    pub debug: Arc<DebugLog>,
}

impl Default for StoreConfig {
    /// The standard preferences suite, in memory.
    fn default() -> Self {
        Self::with_container(Arc::new(PreferencesContainer::in_memory()))
    }
}

impl StoreConfig {
    /// Use `container` as the default for every bucket.
    pub fn with_container(container: SharedContainer) -> Self {
        Self {
            container,
            debug: Arc::new(DebugLog::new()),
        }
    }

    /// Open the configured backend as the default container.
    pub fn from_backend(backend: &BackendConfig) -> BackendResult<Self> {
        Ok(Self::with_container(backend.open()?))
    }

    /// Share an existing debug log.
    pub fn with_debug(mut self, debug: Arc<DebugLog>) -> Self {
        self.debug = debug;
        self
    }

    /// Start a bucket declaration in the default container.
    pub fn bucket<T: Storable>(&self, key: impl Into<String>) -> BucketBuilder<T> {
        BucketBuilder::new(key, self.container.clone()).debug(self.debug.clone())
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("container", &self.container.name())
            .field("debug", &self.debug.is_enabled())
            .finish()
    }
}

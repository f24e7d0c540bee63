//! Preferences-style backend: small typed values in a named suite.
//!
//! Entries live in memory and, when the suite has a backing file, are
//! written through to it as one JSON object after every mutation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use stow_types::Value;
use tracing::debug;

use crate::atomic::write_atomic;
use crate::error::{PreferencesError, PreferencesResult};
use crate::medium::{ValueContainer, ValueMedium};

/// Name of the suite used when none is configured.
pub const STANDARD_SUITE: &str = "standard";

/// Configuration for a preferences suite.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesConfig {
    /// Suite name, used for diagnostics and the default file name.
    pub suite: String,
    /// Backing file. `None` keeps the suite in memory only.
    pub path: Option<PathBuf>,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            suite: STANDARD_SUITE.to_string(),
            path: None,
        }
    }
}

/// A preferences suite.
pub struct Preferences {
    suite: String,
    path: Option<PathBuf>,
    entries: RwLock<BTreeMap<String, Value>>,
}

impl Preferences {
    /// A suite held in memory only.
    pub fn in_memory(suite: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            path: None,
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Open a suite, loading its backing file if one exists.
    pub fn open(config: &PreferencesConfig) -> PreferencesResult<Self> {
        let entries = match &config.path {
            Some(path) if path.exists() => load_file(path)?,
            _ => BTreeMap::new(),
        };
        debug!(suite = %config.suite, entries = entries.len(), "opened preferences");
        Ok(Self {
            suite: config.suite.clone(),
            path: config.path.clone(),
            entries: RwLock::new(entries),
        })
    }

    /// The suite name.
    pub fn suite(&self) -> &str {
        &self.suite
    }

    /// The backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// A copy of every entry.
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.entries.read().expect("lock poisoned").clone()
    }

    /// Read one entry.
    pub fn object(&self, key: &str) -> Option<Value> {
        self.entries.read().expect("lock poisoned").get(key).cloned()
    }

    /// Write one entry and flush the suite.
    pub fn set(&self, key: &str, value: Value) -> PreferencesResult<()> {
        let mut map = self.entries.write().expect("lock poisoned");
        map.insert(key.to_string(), value);
        self.flush(&map)
    }

    /// Remove one entry and flush the suite. Removing a missing key is a no-op.
    pub fn remove_object(&self, key: &str) -> PreferencesResult<()> {
        let mut map = self.entries.write().expect("lock poisoned");
        if map.remove(key).is_some() {
            self.flush(&map)?;
        }
        Ok(())
    }

    /// Remove every entry and flush the suite.
    pub fn clear(&self) -> PreferencesResult<()> {
        let mut map = self.entries.write().expect("lock poisoned");
        map.clear();
        self.flush(&map)
    }

    fn flush(&self, map: &BTreeMap<String, Value>) -> PreferencesResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let bytes = serde_json::to_vec_pretty(map).map_err(|source| PreferencesError::Malformed {
            path: path.clone(),
            source,
        })?;
        write_atomic(path, &bytes)?;
        Ok(())
    }
}

fn load_file(path: &Path) -> PreferencesResult<BTreeMap<String, Value>> {
    let bytes = fs::read(path)?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(BTreeMap::new());
    }
    serde_json::from_slice(&bytes).map_err(|source| PreferencesError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

impl ValueMedium for Preferences {
    const NAME: &'static str = "preferences";
    type Error = PreferencesError;

    fn load(&self, key: &str) -> PreferencesResult<Option<Value>> {
        Ok(self.object(key))
    }

    fn store(&self, key: &str, value: Value) -> PreferencesResult<()> {
        self.set(key, value)
    }

    fn erase(&self, key: &str) -> PreferencesResult<()> {
        self.remove_object(key)
    }

    fn erase_all(&self) -> PreferencesResult<()> {
        self.clear()
    }

    fn contains(&self, key: &str) -> PreferencesResult<bool> {
        Ok(self.entries.read().expect("lock poisoned").contains_key(key))
    }
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences")
            .field("suite", &self.suite)
            .field("path", &self.path)
            .finish()
    }
}

/// Preferences suite exposed as a [`Container`](stow_container::Container).
pub type PreferencesContainer = ValueContainer<Preferences>;

impl ValueContainer<Preferences> {
    /// The standard suite, in memory.
    pub fn in_memory() -> Self {
        Self::from_medium(Preferences::in_memory(STANDARD_SUITE))
    }

    /// Open a configured suite.
    pub fn open(config: &PreferencesConfig) -> PreferencesResult<Self> {
        Preferences::open(config).map(Self::from_medium)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stow_container::Container;

    fn file_config(dir: &tempfile::TempDir) -> PreferencesConfig {
        PreferencesConfig {
            suite: "test".into(),
            path: Some(dir.path().join("prefs.json")),
        }
    }

    #[test]
    fn native_scalars_and_collections() {
        let prefs = PreferencesContainer::in_memory();
        prefs.set_scalar("age", Some(Value::Integer(28)));
        prefs.set_collection("phones", Some(vec![Value::String("1".into())]));

        assert_eq!(prefs.get_scalar("age"), Some(Value::Integer(28)));
        assert_eq!(
            prefs.get_collection("phones"),
            Some(vec![Value::String("1".into())])
        );
        // Collections are stored natively as arrays.
        assert_eq!(
            prefs.medium().object("phones"),
            Some(Value::Array(vec![Value::String("1".into())]))
        );
    }

    #[test]
    fn codable_is_json_data() {
        let prefs = PreferencesContainer::in_memory();
        let json = serde_json::json!({"first": "Jhon"});
        prefs.set_codable("name", Some(json.clone()));
        assert!(matches!(prefs.medium().object("name"), Some(Value::Data(_))));
        assert_eq!(prefs.get_codable("name"), Some(json));
    }

    #[test]
    fn writes_persist_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_config(&dir);
        {
            let prefs = PreferencesContainer::open(&config).unwrap();
            prefs.set_scalar("username", Some(Value::String("alice".into())));
            prefs.set_scalar("age", Some(Value::Integer(3)));
            prefs.remove("age");
        }
        let reopened = PreferencesContainer::open(&config).unwrap();
        assert_eq!(
            reopened.get_scalar("username"),
            Some(Value::String("alice".into()))
        );
        assert!(!reopened.exists("age"));
    }

    #[test]
    fn non_finite_float_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_config(&dir);
        {
            let prefs = PreferencesContainer::open(&config).unwrap();
            prefs.set_scalar("username", Some(Value::String("alice".into())));
            prefs.set_scalar("ratio", Some(Value::Float(f64::INFINITY)));
        }
        let reopened = PreferencesContainer::open(&config).unwrap();
        assert_eq!(
            reopened.get_scalar("username"),
            Some(Value::String("alice".into()))
        );
        assert_eq!(reopened.get_scalar("ratio"), Some(Value::Float(f64::INFINITY)));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_config(&dir);
        fs::write(config.path.as_ref().unwrap(), b"{ nope").unwrap();
        let err = Preferences::open(&config).unwrap_err();
        assert!(matches!(err, PreferencesError::Malformed { .. }));
    }

    #[test]
    fn empty_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_config(&dir);
        fs::write(config.path.as_ref().unwrap(), b"\n").unwrap();
        let prefs = Preferences::open(&config).unwrap();
        assert!(prefs.snapshot().is_empty());
    }

    #[test]
    fn remove_all_clears_suite() {
        let prefs = PreferencesContainer::in_memory();
        prefs.set_scalar("a", Some(Value::Bool(true)));
        prefs.remove_all();
        assert!(!prefs.exists("a"));
        assert_eq!(prefs.name(), "preferences");
        assert_eq!(prefs.medium().suite(), STANDARD_SUITE);
    }
}

//! Structured-document backend: every key is an entry in one shared file.
//!
//! The document is a JSON object mapping keys to [`Value`]s. Each operation
//! re-reads the file, and each mutation rewrites it in full, so several
//! containers (or processes) pointed at the same path see each other's
//! writes. Binary payloads are stored as hex strings.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use stow_types::Value;
use tracing::debug;

use crate::atomic::write_atomic;
use crate::error::{DocumentError, DocumentResult};
use crate::medium::{ValueContainer, ValueMedium};

/// Whether the document must already exist.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentOrigin {
    /// A shipped document; opening fails if it is missing.
    Existing,
    /// An application document, created empty on first open.
    #[default]
    New,
}

/// Configuration for a document container.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub origin: DocumentOrigin,
}

impl DocumentConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            origin: DocumentOrigin::default(),
        }
    }
}

type Entries = BTreeMap<String, Value>;

/// A single shared key-value document.
#[derive(Debug)]
pub struct Document {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_guard: Mutex<()>,
}

impl Document {
    /// Open (or, for [`DocumentOrigin::New`], create) the document.
    pub fn open(config: &DocumentConfig) -> DocumentResult<Self> {
        let path = config.path.clone();
        if !path.exists() {
            match config.origin {
                DocumentOrigin::Existing => return Err(DocumentError::NotFound(path)),
                DocumentOrigin::New => {
                    write_atomic(&path, b"{}")?;
                    debug!(path = %path.display(), "created empty document");
                }
            }
        }
        let document = Self {
            path,
            write_guard: Mutex::new(()),
        };
        // Fail fast on a malformed document instead of on first access.
        document.entries()?;
        Ok(document)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every entry, freshly read from disk.
    pub fn entries(&self) -> DocumentResult<Entries> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DocumentError::NotFound(self.path.clone()))
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&bytes).map_err(|source| DocumentError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    /// Sorted keys of every entry.
    pub fn keys(&self) -> DocumentResult<Vec<String>> {
        Ok(self.entries()?.into_keys().collect())
    }

    pub fn get_value(&self, key: &str) -> DocumentResult<Option<Value>> {
        Ok(self.entries()?.remove(key))
    }

    pub fn set_value(&self, key: &str, value: Value) -> DocumentResult<()> {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value);
            true
        })
    }

    pub fn key_already_exists(&self, key: &str) -> DocumentResult<bool> {
        Ok(self.entries()?.contains_key(key))
    }

    /// Remove one entry. The document is only rewritten if the key existed.
    pub fn remove_key_value_pair(&self, key: &str) -> DocumentResult<()> {
        self.mutate(|entries| entries.remove(key).is_some())
    }

    pub fn remove_all_key_value_pairs(&self) -> DocumentResult<()> {
        self.mutate(|entries| {
            let changed = !entries.is_empty();
            entries.clear();
            changed
        })
    }

    fn mutate(&self, apply: impl FnOnce(&mut Entries) -> bool) -> DocumentResult<()> {
        let _guard = self.write_guard.lock().expect("lock poisoned");
        let mut entries = self.entries()?;
        if apply(&mut entries) {
            let bytes = serde_json::to_vec_pretty(&entries).map_err(|source| {
                DocumentError::Malformed {
                    path: self.path.clone(),
                    source,
                }
            })?;
            write_atomic(&self.path, &bytes)?;
        }
        Ok(())
    }
}

impl ValueMedium for Document {
    const NAME: &'static str = "document";
    type Error = DocumentError;

    fn load(&self, key: &str) -> DocumentResult<Option<Value>> {
        self.get_value(key)
    }

    fn store(&self, key: &str, value: Value) -> DocumentResult<()> {
        self.set_value(key, value)
    }

    fn erase(&self, key: &str) -> DocumentResult<()> {
        self.remove_key_value_pair(key)
    }

    fn erase_all(&self) -> DocumentResult<()> {
        self.remove_all_key_value_pairs()
    }

    fn contains(&self, key: &str) -> DocumentResult<bool> {
        self.key_already_exists(key)
    }
}

/// Shared document exposed as a [`Container`](stow_container::Container).
pub type DocumentContainer = ValueContainer<Document>;

impl ValueContainer<Document> {
    pub fn open(config: &DocumentConfig) -> DocumentResult<Self> {
        Document::open(config).map(Self::from_medium)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stow_container::Container;

    fn temp_document() -> (tempfile::TempDir, DocumentContainer) {
        let dir = tempfile::tempdir().unwrap();
        let c = DocumentContainer::open(&DocumentConfig::new(dir.path().join("storage.json"))).unwrap();
        (dir, c)
    }

    #[test]
    fn new_document_is_created_empty() {
        let (dir, c) = temp_document();
        let raw = fs::read_to_string(dir.path().join("storage.json")).unwrap();
        assert_eq!(raw, "{}");
        assert!(c.medium().keys().unwrap().is_empty());
    }

    #[test]
    fn existing_document_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let config = DocumentConfig {
            path: dir.path().join("shipped.json"),
            origin: DocumentOrigin::Existing,
        };
        assert!(matches!(
            Document::open(&config),
            Err(DocumentError::NotFound(_))
        ));
    }

    #[test]
    fn malformed_document_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, b"[1, 2]").unwrap();
        let err = Document::open(&DocumentConfig::new(&path)).unwrap_err();
        assert!(matches!(err, DocumentError::Malformed { .. }));
    }

    #[test]
    fn entries_share_one_file() {
        let (dir, c) = temp_document();
        c.set_scalar("isValid", Some(Value::Bool(true)));
        c.set_archived("avatar", Some(vec![0xde, 0xad]));

        let raw = fs::read_to_string(dir.path().join("storage.json")).unwrap();
        assert!(raw.contains("isValid"));
        assert!(raw.contains("dead"));
        assert_eq!(c.get_archived("avatar"), Some(vec![0xde, 0xad]));
    }

    #[test]
    fn two_containers_see_each_others_writes() {
        let (dir, a) = temp_document();
        let b = DocumentContainer::open(&DocumentConfig::new(dir.path().join("storage.json"))).unwrap();
        a.set_scalar("username", Some(Value::String("alice".into())));
        assert_eq!(b.get_scalar("username"), Some(Value::String("alice".into())));
        b.remove("username");
        assert!(!a.exists("username"));
    }

    #[test]
    fn non_finite_float_keeps_document_readable() {
        let (dir, c) = temp_document();
        c.set_scalar("name", Some(Value::String("alice".into())));
        c.set_scalar("ratio", Some(Value::Float(f64::NAN)));
        c.set_scalar("limit", Some(Value::Float(f64::NEG_INFINITY)));

        let raw = fs::read_to_string(dir.path().join("storage.json")).unwrap();
        assert!(!raw.contains("null"));
        assert_eq!(c.get_scalar("name"), Some(Value::String("alice".into())));
        assert!(matches!(c.get_scalar("ratio"), Some(Value::Float(x)) if x.is_nan()));
        assert_eq!(c.get_scalar("limit"), Some(Value::Float(f64::NEG_INFINITY)));
    }

    #[test]
    fn remove_all_entries() {
        let (_dir, c) = temp_document();
        c.set_scalar("a", Some(Value::Integer(1)));
        c.set_codable("b", Some(serde_json::json!([1, 2])));
        c.remove_all();
        assert!(c.medium().keys().unwrap().is_empty());
    }

    #[test]
    fn document_deleted_underneath_reads_absent() {
        let (dir, c) = temp_document();
        c.set_scalar("a", Some(Value::Integer(1)));
        fs::remove_file(dir.path().join("storage.json")).unwrap();
        assert_eq!(c.get_scalar("a"), None);
        assert!(!c.exists("a"));
    }
}

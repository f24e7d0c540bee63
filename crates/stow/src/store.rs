//! Schemas of buckets and the adapter that reads and writes them by field.
//!
//! A schema is a plain struct of [`Bucket`]s declared once, plus a
//! [`Field`] constant per bucket that names it for the [`Adapter`]:
//!
//! ```
//! use stow::{Adapter, Bucket, Field, Store, StoreConfig};
//!
//! struct Profile {
//!     config: StoreConfig,
//!     age: Bucket<Option<i64>>,
//! }
//!
//! impl Profile {
//!     const AGE: Field<Self, Option<i64>> = Field::new("age", |s: &Self| &s.age);
//!
//!     fn new(config: StoreConfig) -> Self {
//!         Self { age: config.bucket("age").build(), config }
//!     }
//! }
//!
//! impl Store for Profile {
//!     fn config(&self) -> &StoreConfig {
//!         &self.config
//!     }
//! }
//!
//! let profile = Adapter::new(Profile::new(StoreConfig::default()));
//! assert_eq!(profile.get(Profile::AGE), None);
//! profile.set(Profile::AGE, Some(28));
//! assert_eq!(profile.get(Profile::AGE), Some(28));
//! ```

use std::fmt;

use stow_bridge::Storable;

use crate::bucket::{Bucket, BucketBuilder};
use crate::config::StoreConfig;

/// A schema of buckets.
pub trait Store {
    fn config(&self) -> &StoreConfig;

    /// Start declaring a bucket in the store's default container.
    fn bucket<T: Storable>(&self, key: &str) -> BucketBuilder<T> {
        self.config().bucket(key)
    }
}

/// Names one bucket of schema `S`.
pub struct Field<S, T: Storable> {
    name: &'static str,
    bucket: fn(&S) -> &Bucket<T>,
}

impl<S, T: Storable> Field<S, T> {
    pub const fn new(name: &'static str, bucket: fn(&S) -> &Bucket<T>) -> Self {
        Self { name, bucket }
    }

    /// Field name used in diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn resolve<'s>(&self, store: &'s S) -> &'s Bucket<T> {
        (self.bucket)(store)
    }
}

impl<S, T: Storable> Clone for Field<S, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, T: Storable> Copy for Field<S, T> {}

impl<S, T: Storable> fmt::Debug for Field<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field").field("name", &self.name).finish()
    }
}

/// Field-level access to a [`Store`].
///
/// Two adapters over stores that share a container see the same data; the
/// adapter itself holds no values. No locking spans a call: concurrent
/// writers to one field race, and the container decides the outcome.
pub struct Adapter<S: Store> {
    store: S,
}

impl<S: Store> Adapter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn bucket<T: Storable>(&self, field: Field<S, T>) -> &Bucket<T> {
        field.resolve(&self.store)
    }

    /// Read a field.
    ///
    /// An absent optional field reads as `None`.
    ///
    /// # Panics
    ///
    /// Panics, naming the field, if a mandatory field has no stored value.
    pub fn get<T: Storable>(&self, field: Field<S, T>) -> T {
        self.bucket(field)
            .read()
            .unwrap_or_else(|| T::on_missing(field.name()))
    }

    /// Write a field. Setting an optional field to `None` removes it.
    pub fn set<T: Storable>(&self, field: Field<S, T>, value: T) {
        self.bucket(field).set(&value);
    }

    /// Write a field, removing it when `value` is `None`.
    pub fn write<T: Storable>(&self, field: Field<S, T>, value: Option<&T>) {
        self.bucket(field).write(value);
    }

    /// Whether a value is stored for the field. Expiry is not checked.
    pub fn has<T: Storable>(&self, field: Field<S, T>) -> bool {
        self.bucket(field).exists()
    }

    pub fn remove<T: Storable>(&self, field: Field<S, T>) {
        self.bucket(field).remove();
    }

    /// The store's debug log, one write per line.
    pub fn debug_report(&self) -> String {
        self.store.config().debug.report()
    }
}

impl<S: Store> fmt::Debug for Adapter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("config", self.store.config())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use stow_container::{MemoryContainer, SharedContainer};

    struct Account {
        config: StoreConfig,
        name: Bucket<String>,
        age: Bucket<Option<i64>>,
        tags: Bucket<Option<Vec<String>>>,
        nickname: Bucket<String>,
    }

    impl Account {
        const NAME: Field<Self, String> = Field::new("name", |s: &Self| &s.name);
        const AGE: Field<Self, Option<i64>> = Field::new("age", |s: &Self| &s.age);
        const TAGS: Field<Self, Option<Vec<String>>> = Field::new("tags", |s: &Self| &s.tags);
        const NICKNAME: Field<Self, String> = Field::new("nickname", |s: &Self| &s.nickname);

        fn new(config: StoreConfig) -> Self {
            Self {
                name: config.bucket("name").value("Jhon Doe".to_string()).build(),
                age: config.bucket("age").build(),
                tags: config.bucket("tags").build(),
                nickname: config.bucket("nickname").build(),
                config,
            }
        }
    }

    impl Store for Account {
        fn config(&self) -> &StoreConfig {
            &self.config
        }
    }

    fn shared() -> SharedContainer {
        Arc::new(MemoryContainer::new())
    }

    #[test]
    fn mandatory_field_reads_seed() {
        let adapter = Adapter::new(Account::new(StoreConfig::with_container(shared())));
        assert_eq!(adapter.get(Account::NAME), "Jhon Doe");
        adapter.set(Account::NAME, "alice".to_string());
        assert_eq!(adapter.get(Account::NAME), "alice");
    }

    #[test]
    fn optional_fields_read_none_when_absent() {
        let adapter = Adapter::new(Account::new(StoreConfig::with_container(shared())));
        assert_eq!(adapter.get(Account::AGE), None);
        assert_eq!(adapter.get(Account::TAGS), None);

        adapter.set(Account::AGE, Some(28));
        assert!(adapter.has(Account::AGE));
        adapter.set(Account::AGE, None);
        assert!(!adapter.has(Account::AGE));
    }

    #[test]
    #[should_panic(expected = "mandatory field `nickname`")]
    fn mandatory_field_without_value_panics() {
        let adapter = Adapter::new(Account::new(StoreConfig::with_container(shared())));
        adapter.get(Account::NICKNAME);
    }

    #[test]
    fn adapters_share_a_container() {
        let container = shared();
        let a = Adapter::new(Account::new(StoreConfig::with_container(container.clone())));
        let b = Adapter::new(Account::new(StoreConfig::with_container(container)));
        a.set(Account::TAGS, Some(vec!["x".to_string()]));
        assert_eq!(b.get(Account::TAGS), Some(vec!["x".to_string()]));
        b.remove(Account::TAGS);
        assert!(!a.has(Account::TAGS));
    }

    #[test]
    fn write_none_removes() {
        let adapter = Adapter::new(Account::new(StoreConfig::with_container(shared())));
        adapter.write(Account::NAME, None);
        assert!(!adapter.has(Account::NAME));
    }

    #[test]
    fn debug_report_lists_writes() {
        let config = StoreConfig::with_container(shared());
        config.debug.enable();
        let adapter = Adapter::new(Account::new(config));
        adapter.set(Account::AGE, Some(28));
        let report = adapter.debug_report();
        // The seeded name is written during declaration.
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("name : \"Jhon Doe\" @ "));
        assert!(lines[1].starts_with("age : 28 @ "));
    }

    #[test]
    fn field_names() {
        assert_eq!(Account::AGE.name(), "age");
        assert_eq!(format!("{:?}", Account::NAME), "Field { name: \"name\" }");
    }
}

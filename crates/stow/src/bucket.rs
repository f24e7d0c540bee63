//! A typed value under one key, with freshness and expiry metadata.
//!
//! A bucket owns three entries in its container:
//!
//! | key          | content                                   |
//! |--------------|-------------------------------------------|
//! | `key`        | the value, in the form its bridge picks   |
//! | `key-update` | `Date` of the last successful write       |
//! | `key-expire` | `Date` after which the value is gone      |
//!
//! Expiry is enforced lazily: [`Bucket::read`] checks the expiration instant
//! and removes all three entries once it has been reached. Nothing sweeps
//! in the background, and [`Bucket::exists`] does not look at expiry.
//!
//! The bucket also keeps its declared instant in memory. Every successful
//! write persists it again, so a bucket that was removed and then written
//! still expires at the instant it was declared with.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{Duration, SecondsFormat};
use stow_bridge::{is_supported, Bridge, Storable};
use stow_container::{Container, SharedContainer};
use stow_types::temporal::{self, Timestamp};
use stow_types::{expire_key, update_key, Value};
use tracing::{debug, trace};

use crate::debug::DebugLog;

/// A typed value stored under one key.
///
/// Buckets hold no value in memory: every read and write goes to the
/// container, so two buckets over the same container and key always agree.
pub struct Bucket<T: Storable> {
    key: String,
    container: SharedContainer,
    expire_at: Option<Timestamp>,
    debug: Option<Arc<DebugLog>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Storable> Bucket<T> {
    /// Start declaring a bucket for `key` in `container`.
    pub fn builder(key: impl Into<String>, container: SharedContainer) -> BucketBuilder<T> {
        BucketBuilder::new(key, container)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn container(&self) -> &SharedContainer {
        &self.container
    }

    /// Instant of the last successful write, if any.
    pub fn updated_at(&self) -> Option<Timestamp> {
        self.timestamp(&update_key(&self.key))
    }

    /// The declared expiration instant, or else the persisted one.
    pub fn expires_at(&self) -> Option<Timestamp> {
        self.expire_at.or_else(|| self.timestamp(&expire_key(&self.key)))
    }

    /// Whether the expiration instant has been reached at `at`.
    pub fn is_expired_at(&self, at: Timestamp) -> bool {
        self.expires_at()
            .is_some_and(|expires_at| temporal::is_expired(expires_at, at))
    }

    /// Read the value, removing it first if it has expired.
    pub fn read(&self) -> Option<T> {
        if self.is_expired_at(temporal::now()) {
            debug!(key = %self.key, "bucket expired, removing");
            self.remove();
            return None;
        }
        T::Bridge::read(&self.key, self.container.as_ref())
    }

    /// Write a value and stamp `key-update`. An absent value removes the
    /// bucket instead, clearing both metadata entries.
    ///
    /// A write the container drops leaves the metadata untouched. A
    /// persisted write also persists the declared expiration instant.
    pub fn write(&self, value: Option<&T>) {
        let Some(value) = value.filter(|value| !value.is_absent()) else {
            self.remove();
            return;
        };
        if !T::Bridge::write(&self.key, Some(value), self.container.as_ref()) {
            debug!(key = %self.key, "write not persisted, metadata unchanged");
            return;
        }

        if let Some(instant) = self.expire_at {
            self.container
                .set_scalar(&expire_key(&self.key), Some(Value::Date(instant)));
        }
        let now = temporal::now();
        self.container
            .set_scalar(&update_key(&self.key), Some(Value::Date(now)));
        trace!(key = %self.key, bridge = <T::Bridge as Bridge>::NAME, "bucket written");

        if let Some(log) = &self.debug {
            log.record(format!("{} : {} @ {}", self.key, value.describe(), format_instant(now)));
        }
    }

    /// Shorthand for `write(Some(value))`.
    pub fn set(&self, value: &T) {
        self.write(Some(value));
    }

    /// Whether the container holds an entry for the key. Expiry is not
    /// checked; use [`Bucket::read`] for an expiry-aware answer.
    pub fn exists(&self) -> bool {
        self.container.exists(&self.key)
    }

    /// Remove the value and both metadata entries. Idempotent.
    pub fn remove(&self) {
        self.container.remove(&self.key);
        self.container.remove(&update_key(&self.key));
        self.container.remove(&expire_key(&self.key));
    }

    fn timestamp(&self, key: &str) -> Option<Timestamp> {
        match self.container.get_scalar(key)? {
            Value::Date(instant) => Some(instant),
            _ => None,
        }
    }
}

fn format_instant(instant: Timestamp) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `key : value @ updated`, `key : NA @ updated`, or `key : NA @ NA`.
///
/// Rendering reads the bucket, so an expired bucket is removed and renders
/// as `key : NA @ NA`.
impl<T: Storable> fmt::Display for Bucket<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.read();
        let Some(updated) = self.updated_at() else {
            return write!(f, "{} : NA @ NA", self.key);
        };
        match value {
            Some(value) => write!(f, "{} : {} @ {}", self.key, value.describe(), format_instant(updated)),
            None => write!(f, "{} : NA @ {}", self.key, format_instant(updated)),
        }
    }
}

impl<T: Storable> fmt::Debug for Bucket<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bucket")
            .field("key", &self.key)
            .field("container", &self.container.name())
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

/// Declares a [`Bucket`].
pub struct BucketBuilder<T: Storable> {
    key: String,
    container: SharedContainer,
    expire_at: Option<Timestamp>,
    value: Option<T>,
    debug: Option<Arc<DebugLog>>,
}

impl<T: Storable> BucketBuilder<T> {
    pub fn new(key: impl Into<String>, container: SharedContainer) -> Self {
        Self {
            key: key.into(),
            container,
            expire_at: None,
            value: None,
            debug: None,
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn container(mut self, container: SharedContainer) -> Self {
        self.container = container;
        self
    }

    /// Expire the value at a fixed instant.
    pub fn expire_at(mut self, instant: Timestamp) -> Self {
        self.expire_at = Some(instant);
        self
    }

    /// Expire the value `ttl` from now. The instant is fixed when the bucket
    /// is built; later writes do not extend it. A `ttl` too large to
    /// represent means no expiry.
    pub fn expire_after(mut self, ttl: Duration) -> Self {
        self.expire_at = temporal::now().checked_add_signed(ttl);
        self
    }

    /// Initial value, written only if nothing is stored under the key yet.
    pub fn value(mut self, value: T) -> Self {
        self.value = Some(value);
        self
    }

    pub fn debug(mut self, log: Arc<DebugLog>) -> Self {
        self.debug = Some(log);
        self
    }

    /// Build the bucket, persisting its expiration instant and seeding its
    /// initial value.
    ///
    /// # Panics
    ///
    /// Panics if `T` cannot be stored, i.e. it nests one collection in
    /// another (`Vec<Vec<_>>`, `Vec<Option<_>>`).
    pub fn build(self) -> Bucket<T> {
        assert!(
            is_supported::<T>(),
            "bucket `{}`: `{}` cannot be stored; multi-dimensional collections are unsupported",
            self.key,
            std::any::type_name::<T>(),
        );

        let bucket = Bucket {
            key: self.key,
            container: self.container,
            expire_at: self.expire_at,
            debug: self.debug,
            _marker: PhantomData,
        };

        if let Some(instant) = self.expire_at {
            bucket
                .container
                .set_scalar(&expire_key(&bucket.key), Some(Value::Date(instant)));
        }

        if let Some(value) = self.value.filter(|value| !value.is_absent()) {
            if !bucket.exists() {
                bucket.set(&value);
            }
        }

        debug!(
            key = %bucket.key,
            container = bucket.container.name(),
            bridge = <T::Bridge as Bridge>::NAME,
            "bucket declared"
        );
        bucket
    }
}

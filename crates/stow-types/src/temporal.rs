//! Instants and the metadata keys that record them.
//!
//! Every bucket persists up to three entries in its container: the value
//! itself under `key`, the instant of the last write under `key-update`,
//! and the fixed expiration instant under `key-expire`.

use chrono::{DateTime, Utc};

/// A wall-clock instant, always UTC.
pub type Timestamp = DateTime<Utc>;

/// Suffix of the last-write metadata entry.
pub const UPDATE_SUFFIX: &str = "-update";

/// Suffix of the expiration metadata entry.
pub const EXPIRE_SUFFIX: &str = "-expire";

/// The current instant.
pub fn now() -> Timestamp {
    Utc::now()
}

/// Metadata key holding the last-write instant of `key`.
pub fn update_key(key: &str) -> String {
    format!("{key}{UPDATE_SUFFIX}")
}

/// Metadata key holding the expiration instant of `key`.
pub fn expire_key(key: &str) -> String {
    format!("{key}{EXPIRE_SUFFIX}")
}

/// Returns `true` if `expires_at` has been reached at `at`.
///
/// Expiry is inclusive: a value is already gone at its expiration instant.
pub fn is_expired(expires_at: Timestamp, at: Timestamp) -> bool {
    at >= expires_at
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn metadata_keys() {
        assert_eq!(update_key("age"), "age-update");
        assert_eq!(expire_key("session"), "session-expire");
    }

    #[test]
    fn expiry_is_inclusive() {
        let t = now();
        assert!(is_expired(t, t));
        assert!(is_expired(t - Duration::seconds(1), t));
        assert!(!is_expired(t + Duration::seconds(1), t));
    }
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Opt-in journal of bucket writes.
///
/// Each record is the bucket description at write time,
/// `"key : value @ timestamp"`. Disabled logs drop records.
#[derive(Debug, Default)]
pub struct DebugLog {
    enabled: AtomicBool,
    records: Mutex<Vec<String>>,
}

impl DebugLog {
    /// A disabled, empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// An enabled, empty log.
    pub fn enabled() -> Self {
        let log = Self::new();
        log.enable();
        log
    }

    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Relaxed);
    }

    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Append a record if the log is enabled.
    pub fn record(&self, line: impl Into<String>) {
        if self.is_enabled() {
            self.records.lock().expect("lock poisoned").push(line.into());
        }
    }

    pub fn records(&self) -> Vec<String> {
        self.records.lock().expect("lock poisoned").clone()
    }

    /// Every record, one per line, oldest first.
    pub fn report(&self) -> String {
        self.records.lock().expect("lock poisoned").join("\n")
    }

    pub fn clear(&self) {
        self.records.lock().expect("lock poisoned").clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_log_drops_records() {
        let log = DebugLog::new();
        log.record("age : 28 @ now");
        assert!(log.records().is_empty());
    }

    #[test]
    fn report_joins_records_in_order() {
        let log = DebugLog::enabled();
        log.record("a : 1 @ t0");
        log.record("b : 2 @ t1");
        assert_eq!(log.report(), "a : 1 @ t0\nb : 2 @ t1");
        log.disable();
        log.record("c : 3 @ t2");
        assert_eq!(log.records().len(), 2);
        log.clear();
        assert_eq!(log.report(), "");
    }
}

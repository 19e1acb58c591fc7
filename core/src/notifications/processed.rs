//! Timestamps of level-ups whose side effects already fired.

use std::collections::HashSet;

/// Set of dispatched event timestamps with a retention window.
///
/// Membership is the at-most-once guarantee for side effects. Purging only
/// bounds memory: once an entry is purged, a re-delivered event with that
/// timestamp is treated as new and dispatches again.
#[derive(Debug, Clone)]
pub struct ProcessedSet {
    entries: HashSet<i64>,
    retention_ms: i64,
}

impl ProcessedSet {
    pub fn new(retention_ms: i64) -> Self {
        Self {
            entries: HashSet::new(),
            retention_ms,
        }
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        self.entries.contains(&timestamp)
    }

    /// Record a timestamp. Returns `false` if it was already present.
    pub fn insert(&mut self, timestamp: i64) -> bool {
        self.entries.insert(timestamp)
    }

    /// Drop entries older than the retention window relative to `now_ms`.
    /// Returns the number of entries removed.
    pub fn purge(&mut self, now_ms: i64) -> usize {
        let before = self.entries.len();
        let cutoff = now_ms.saturating_sub(self.retention_ms);
        self.entries.retain(|&ts| ts >= cutoff);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn retention_ms(&self) -> i64 {
        self.retention_ms
    }

    /// Change the window; takes effect at the next purge.
    pub fn set_retention_ms(&mut self, retention_ms: i64) {
        self.retention_ms = retention_ms;
    }
}

impl Default for ProcessedSet {
    fn default() -> Self {
        Self::new(skillhud_types::NotificationConfig::default().retention_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_reports_duplicates() {
        let mut set = ProcessedSet::new(60_000);
        assert!(set.insert(1000));
        assert!(!set.insert(1000));
        assert!(set.contains(1000));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn purge_keeps_entries_inside_window() {
        let mut set = ProcessedSet::new(60_000);
        set.insert(0);
        set.insert(30_000);
        set.insert(59_000);

        // cutoff = 90_000 - 60_000 = 30_000
        assert_eq!(set.purge(90_000), 1);
        assert!(!set.contains(0));
        assert!(set.contains(30_000));
        assert!(set.contains(59_000));
    }

    #[test]
    fn purge_on_empty_set() {
        let mut set = ProcessedSet::default();
        assert_eq!(set.purge(i64::MAX), 0);
        assert!(set.is_empty());
        assert_eq!(set.retention_ms(), 60_000);
    }

    #[test]
    fn shorter_window_applies_at_next_purge() {
        let mut set = ProcessedSet::new(60_000);
        set.insert(0);
        set.set_retention_ms(1_000);
        assert_eq!(set.retention_ms(), 1_000);
        assert_eq!(set.purge(5_000), 1);
        assert!(set.is_empty());
    }

    #[test]
    fn purge_does_not_overflow_near_min() {
        let mut set = ProcessedSet::new(60_000);
        set.insert(i64::MIN);
        assert_eq!(set.purge(i64::MIN + 10), 0);
    }
}

//! Cancellable deferred deselection for highlighted rows.
//!
//! Entries are keyed by what the row shows, not by row index, so a callback
//! never fires against a row that has since been reused for another task.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Delay between a highlight change and the automatic deselection.
pub const DESELECT_DELAY: Duration = Duration::from_secs(5);
/// Longest delay a scheduler accepts; longer requests are clamped.
pub const MAX_DESELECT_DELAY: Duration = Duration::from_secs(60);

/// Deadline queue driven by the host's clock.
#[derive(Debug, Clone)]
pub struct DeselectScheduler<K: Ord + Copy> {
    delay: Duration,
    pending: BTreeMap<K, Instant>,
}

impl<K: Ord + Copy> DeselectScheduler<K> {
    /// `delay` is clamped to `MAX_DESELECT_DELAY`.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay: delay.min(MAX_DESELECT_DELAY),
            pending: BTreeMap::new(),
        }
    }

    /// Arms a deselection for `key`, replacing any pending one.
    ///
    /// A deadline past the clock's range leaves `key` unscheduled.
    pub fn schedule(&mut self, key: K, now: Instant) {
        match now.checked_add(self.delay) {
            Some(deadline) => {
                self.pending.insert(key, deadline);
            }
            None => {
                self.pending.remove(&key);
            }
        }
    }

    /// Drops the pending deselection for `key`. Returns whether one existed.
    pub fn cancel(&mut self, key: &K) -> bool {
        self.pending.remove(key).is_some()
    }

    /// Drops pending deselections whose key fails `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&K) -> bool) {
        self.pending.retain(|key, _| keep(key));
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Removes and returns every key whose deadline is at or before `now`.
    pub fn take_due(&mut self, now: Instant) -> Vec<K> {
        let due: Vec<K> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(key, _)| *key)
            .collect();
        for key in &due {
            self.pending.remove(key);
        }
        due
    }
}

impl<K: Ord + Copy> Default for DeselectScheduler<K> {
    fn default() -> Self {
        Self::new(DESELECT_DELAY)
    }
}

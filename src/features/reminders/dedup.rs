//! # Feature: Reminder Dedup Tracker
//!
//! Remembers which (medication, minute) reminders already fired so the poller
//! announces each one at most once per minute. Marks expire on their own: every
//! `mark` spawns a deferred removal that runs `ttl` later, whether or not the
//! mark was read in between. Nothing is persisted.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Generation-tagged marks so a stale expiry never removes a fresh mark
//! - 1.0.0: Initial release with per-key expiry tasks

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Default lifetime of a mark
pub const DEFAULT_TTL: Duration = Duration::from_secs(55);

/// Clonable handle; clones share the same marks.
///
/// Must be used from inside a Tokio runtime, since marking spawns the expiry task.
#[derive(Clone)]
pub struct DedupTracker {
    marks: Arc<DashMap<String, u64>>,
    generation: Arc<AtomicU64>,
    ttl: Duration,
}

impl Default for DedupTracker {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl DedupTracker {
    pub fn new(ttl: Duration) -> Self {
        DedupTracker {
            marks: Arc::new(DashMap::new()),
            generation: Arc::new(AtomicU64::new(0)),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Record `key`; it disappears `ttl` from now.
    ///
    /// Re-marking a live key restarts its lifetime.
    pub fn mark(&self, key: &str) {
        let generation = self.next_generation();
        self.marks.insert(key.to_string(), generation);
        self.schedule_expiry(key.to_string(), generation);
    }

    pub fn has_mark(&self, key: &str) -> bool {
        self.marks.contains_key(key)
    }

    /// Mark `key` unless it is already marked.
    ///
    /// Returns `true` when this call created the mark. Check and insert happen
    /// under one shard lock, so two callers racing on the same key cannot both win.
    pub fn try_mark(&self, key: &str) -> bool {
        let generation = match self.marks.entry(key.to_string()) {
            Entry::Occupied(_) => return false,
            Entry::Vacant(slot) => {
                let generation = self.next_generation();
                slot.insert(generation);
                generation
            }
        };
        self.schedule_expiry(key.to_string(), generation);
        true
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::Relaxed)
    }

    fn schedule_expiry(&self, key: String, generation: u64) {
        let marks = Arc::clone(&self.marks);
        let ttl = self.ttl;
        tokio::spawn(async move {
            sleep(ttl).await;
            if marks.remove_if(&key, |_, g| *g == generation).is_some() {
                debug!("Dedup mark {key} expired");
            }
        });
    }
}

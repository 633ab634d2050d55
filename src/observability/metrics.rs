//! Store metrics
//!
//! - Counters only
//! - Monotonic increase for the lifetime of the store
//! - Thread-safe, lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters of one store
///
/// Uses Relaxed ordering; counters are independent of each other.
#[derive(Debug, Default)]
pub struct StoreMetrics {
    /// Successful add operations (including silent no-ops)
    adds: AtomicU64,
    /// Successful edit operations
    edits: AtomicU64,
    /// Edits that re-keyed a property
    renames: AtomicU64,
    /// Successful delete operations
    deletes: AtomicU64,
    /// Whole-tree replacements
    seeds: AtomicU64,
    /// Operations that returned an error
    rejections: AtomicU64,
    /// Listener invocations
    notifications: AtomicU64,
}

impl StoreMetrics {
    /// Create a registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_adds(&self) {
        self.adds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_edits(&self) {
        self.edits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_renames(&self) {
        self.renames.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_deletes(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_seeds(&self) {
        self.seeds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rejections(&self) {
        self.rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_notifications(&self, count: u64) {
        self.notifications.fetch_add(count, Ordering::Relaxed);
    }

    /// Take a point-in-time copy of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            adds: self.adds.load(Ordering::Relaxed),
            edits: self.edits.load(Ordering::Relaxed),
            renames: self.renames.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            seeds: self.seeds.load(Ordering::Relaxed),
            rejections: self.rejections.load(Ordering::Relaxed),
            notifications: self.notifications.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`StoreMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub adds: u64,
    pub edits: u64,
    pub renames: u64,
    pub deletes: u64,
    pub seeds: u64,
    pub rejections: u64,
    pub notifications: u64,
}

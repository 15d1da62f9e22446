//! Metrics registry for the store pipeline
//!
//! - Counters only, monotonic, reset only on process start
//! - Thread-safe, lock-free increments
//!
//! The `blob_decodes` counter is the instrument behind the laziness
//! contract: a projected read must not move it.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics registry containing all pipeline counters
///
/// # Thread Safety
///
/// All counters use atomic operations with Relaxed ordering; eventual
/// consistency is fine for metrics.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Full blob decodes (tree construction, not version peeks)
    blob_decodes: AtomicU64,
    /// Blob encodes on the write path
    blob_encodes: AtomicU64,
    /// Documents migrated upward on read
    migrations_run: AtomicU64,
    /// Individual migration steps applied
    migration_steps_applied: AtomicU64,
    /// Projected instances materialized
    promotions: AtomicU64,
    /// read_by_id calls served
    reads_by_id: AtomicU64,
    /// Projected instances yielded by queries
    query_rows_projected: AtomicU64,
    /// Rows persisted
    writes: AtomicU64,
    /// Reads rejected for version incompatibility
    incompatible_rejected: AtomicU64,
    /// Reads rejected for malformed blobs
    malformed_rejected: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_blob_decodes(&self) {
        self.blob_decodes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_blob_encodes(&self) {
        self.blob_encodes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_migrations_run(&self) {
        self.migrations_run.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_migration_steps(&self, steps: u64) {
        self.migration_steps_applied.fetch_add(steps, Ordering::Relaxed);
    }

    pub fn increment_promotions(&self) {
        self.promotions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_reads_by_id(&self) {
        self.reads_by_id.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_query_rows_projected(&self) {
        self.query_rows_projected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_writes(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_incompatible_rejected(&self) {
        self.incompatible_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_malformed_rejected(&self) {
        self.malformed_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn blob_decodes(&self) -> u64 {
        self.blob_decodes.load(Ordering::Relaxed)
    }

    pub fn promotions(&self) -> u64 {
        self.promotions.load(Ordering::Relaxed)
    }

    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Take a point-in-time snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            blob_decodes: self.blob_decodes.load(Ordering::Relaxed),
            blob_encodes: self.blob_encodes.load(Ordering::Relaxed),
            migrations_run: self.migrations_run.load(Ordering::Relaxed),
            migration_steps_applied: self.migration_steps_applied.load(Ordering::Relaxed),
            promotions: self.promotions.load(Ordering::Relaxed),
            reads_by_id: self.reads_by_id.load(Ordering::Relaxed),
            query_rows_projected: self.query_rows_projected.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            incompatible_rejected: self.incompatible_rejected.load(Ordering::Relaxed),
            malformed_rejected: self.malformed_rejected.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of every counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub blob_decodes: u64,
    pub blob_encodes: u64,
    pub migrations_run: u64,
    pub migration_steps_applied: u64,
    pub promotions: u64,
    pub reads_by_id: u64,
    pub query_rows_projected: u64,
    pub writes: u64,
    pub incompatible_rejected: u64,
    pub malformed_rejected: u64,
}

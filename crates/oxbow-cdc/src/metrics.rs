//! Throughput instrumentation
//!
//! Lock-free counters for decode throughput and error rates. Entirely
//! orthogonal to decode/diff/present correctness: the engine stays a pure
//! function of its input and the counters only observe it.
//!
//! ## Usage
//!
//! ```
//! use oxbow_cdc::metrics::InspectorMetrics;
//! use oxbow_cdc::CdcOp;
//!
//! let metrics = InspectorMetrics::new();
//! metrics.record_event(&CdcOp::Create, 128);
//!
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.events_total, 1);
//! assert_eq!(snapshot.creates, 1);
//! ```

use crate::event::CdcOp;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Metrics collector with atomic counters for lock-free updates.
///
/// Shared via `Arc` across worker threads; all methods take `&self`.
#[derive(Debug)]
pub struct InspectorMetrics {
    /// Start time for rate calculation
    start_time: Instant,
    /// Total events decoded
    events_total: AtomicU64,
    /// Total payload bytes seen (including malformed payloads)
    bytes_total: AtomicU64,
    /// Create operations
    creates: AtomicU64,
    /// Update operations
    updates: AtomicU64,
    /// Delete operations
    deletes: AtomicU64,
    /// Snapshot reads
    snapshots: AtomicU64,
    /// Unrecognized operation codes
    unknown_ops: AtomicU64,
    /// Payloads that failed to decode
    decode_errors: AtomicU64,
}

impl InspectorMetrics {
    /// Create a collector with all counters at zero.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            events_total: AtomicU64::new(0),
            bytes_total: AtomicU64::new(0),
            creates: AtomicU64::new(0),
            updates: AtomicU64::new(0),
            deletes: AtomicU64::new(0),
            snapshots: AtomicU64::new(0),
            unknown_ops: AtomicU64::new(0),
            decode_errors: AtomicU64::new(0),
        }
    }

    /// Record one successfully decoded event and its payload size.
    pub fn record_event(&self, op: &CdcOp, payload_bytes: usize) {
        self.events_total.fetch_add(1, Ordering::Relaxed);
        self.bytes_total
            .fetch_add(payload_bytes as u64, Ordering::Relaxed);

        let counter = match op {
            CdcOp::Create => &self.creates,
            CdcOp::Update => &self.updates,
            CdcOp::Delete => &self.deletes,
            CdcOp::Snapshot => &self.snapshots,
            CdcOp::Unknown(_) => &self.unknown_ops,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one payload that failed to decode.
    pub fn record_decode_error(&self, payload_bytes: usize) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
        self.bytes_total
            .fetch_add(payload_bytes as u64, Ordering::Relaxed);
    }

    /// Take a point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let events_total = self.events_total.load(Ordering::Relaxed);

        MetricsSnapshot {
            events_total,
            bytes_total: self.bytes_total.load(Ordering::Relaxed),
            creates: self.creates.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            snapshots: self.snapshots.load(Ordering::Relaxed),
            unknown_ops: self.unknown_ops.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            events_per_second: if elapsed > 0.0 {
                events_total as f64 / elapsed
            } else {
                0.0
            },
        }
    }
}

impl Default for InspectorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of the collector's counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    /// Total events decoded
    pub events_total: u64,
    /// Total payload bytes seen
    pub bytes_total: u64,
    /// Create operations
    pub creates: u64,
    /// Update operations
    pub updates: u64,
    /// Delete operations
    pub deletes: u64,
    /// Snapshot reads
    pub snapshots: u64,
    /// Unrecognized operation codes
    pub unknown_ops: u64,
    /// Payloads that failed to decode
    pub decode_errors: u64,
    /// Decode rate since collector creation
    pub events_per_second: f64,
}

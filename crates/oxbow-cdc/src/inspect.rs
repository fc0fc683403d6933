//! One-call engine facade
//!
//! Ties decode, diff and present together for one already-dequeued
//! message. The surrounding consumption loop owns topics, offsets,
//! commits, retries and ordering; the facade only guarantees that one
//! bad payload can never stop the stream.

use crate::decode::decode_envelope;
use crate::diff::{diff_rows, DiffPolicy};
use crate::error::DecodeError;
use crate::event::{CdcOp, Origin};
use crate::metrics::InspectorMetrics;
use crate::present::{present, DisplayRecord};
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of inspecting one raw message.
#[derive(Debug)]
pub enum Rendered {
    /// The payload decoded; ready for an external renderer.
    Event(DisplayRecord),
    /// The payload was not a JSON object. A distinct diagnostic entry;
    /// the raw bytes stay available via [`DecodeError::raw`].
    Malformed {
        /// What went wrong, carrying the raw payload
        error: DecodeError,
        /// Broker coordinates of the bad message
        origin: Origin,
    },
}

/// Stateless decode → diff → present engine.
///
/// Holds no per-event state, so a single instance is safe to share
/// across worker threads, one [`inspect`](Inspector::inspect) call per
/// inbound message. Duplicate or out-of-order delivery from the broker
/// cannot corrupt anything: each call is a pure function of its payload
/// (the metrics counters only accumulate totals).
#[derive(Debug, Clone)]
pub struct Inspector {
    diff_policy: DiffPolicy,
    metrics: Arc<InspectorMetrics>,
}

impl Inspector {
    /// Create an engine with the default diff policy.
    pub fn new() -> Self {
        Self {
            diff_policy: DiffPolicy::default(),
            metrics: Arc::new(InspectorMetrics::new()),
        }
    }

    /// Set the diff policy applied to update events.
    pub fn with_diff_policy(mut self, policy: DiffPolicy) -> Self {
        self.diff_policy = policy;
        self
    }

    /// Handle to the shared throughput counters.
    pub fn metrics(&self) -> Arc<InspectorMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Decode one payload and map it to a renderable outcome.
    ///
    /// Total: a malformed payload yields [`Rendered::Malformed`] instead
    /// of an error, so callers never need to special-case the stream.
    /// Calling twice on the same payload yields identical records.
    ///
    /// # Example
    ///
    /// ```
    /// use oxbow_cdc::{Inspector, Origin, Rendered};
    ///
    /// let inspector = Inspector::new();
    /// let raw = br#"{"op":"c","source":{"table":"users"},"after":{"id":1}}"#;
    /// match inspector.inspect(raw, Origin::new("cdc.public.users", 0, 7)) {
    ///     Rendered::Event(record) => assert_eq!(record.label, "CREATE"),
    ///     Rendered::Malformed { .. } => unreachable!(),
    /// }
    /// ```
    pub fn inspect(&self, raw: &[u8], origin: Origin) -> Rendered {
        match decode_envelope(raw, origin.clone()) {
            Ok(event) => {
                self.metrics.record_event(&event.op, raw.len());
                debug!(
                    op = %event.op,
                    table = %event.table,
                    origin = %event.origin,
                    "decoded CDC event"
                );

                // The diff is only meaningful for updates; other kinds
                // render their single image directly.
                let diffs = matches!(event.op, CdcOp::Update).then(|| {
                    diff_rows(event.before.as_ref(), event.after.as_ref(), self.diff_policy)
                });
                Rendered::Event(present(&event, diffs.as_deref()))
            }
            Err(error) => {
                self.metrics.record_decode_error(raw.len());
                warn!(
                    %origin,
                    payload_len = raw.len(),
                    %error,
                    "failed to decode CDC envelope"
                );
                Rendered::Malformed { error, origin }
            }
        }
    }
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

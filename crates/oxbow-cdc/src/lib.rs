//! # oxbow-cdc - CDC envelope decode-and-diff engine
//!
//! Decodes change-data-capture (CDC) event envelopes emitted by a
//! database-replication pipeline and renders each event's operation,
//! metadata and row-level content, including a before/after field diff
//! for updates.
//!
//! The engine is deliberately small and pure: it receives one
//! already-dequeued `(payload, topic, partition, offset)` unit per call
//! and hands back one display-ready record. Broker subscription, offset
//! commits and literal console rendering are the caller's concerns.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐    ┌───────────┐    ┌───────────────┐
//! │ raw bytes │───▶│  decode   │───▶│   CdcEvent    │
//! └───────────┘    └───────────┘    └───────┬───────┘
//!                                           │ (updates only)
//!                                           ▼
//!                                   ┌───────────────┐
//!                                   │  diff_rows    │
//!                                   └───────┬───────┘
//!                                           ▼
//!                                   ┌───────────────┐    ┌───────────┐
//!                                   │   present     │───▶│ renderer  │
//!                                   └───────────────┘    └───────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use oxbow_cdc::{Inspector, Origin, Rendered};
//!
//! let inspector = Inspector::new();
//! let raw = br#"{"op":"u","source":{"table":"orders"},
//!                "before":{"status":"pending"},
//!                "after":{"status":"shipped"}}"#;
//!
//! match inspector.inspect(raw, Origin::new("cdc.public.orders", 0, 42)) {
//!     Rendered::Event(record) => {
//!         assert_eq!(record.label, "UPDATE");
//!         assert_eq!(record.table, "orders");
//!     }
//!     Rendered::Malformed { error, .. } => {
//!         // raw bytes stay available for postmortem display
//!         eprintln!("bad payload: {error}");
//!     }
//! }
//! ```
//!
//! ## Guarantees
//!
//! - **Tolerant decode**: every envelope field is optional; absence maps
//!   to a default, never to a failure. Only non-JSON / non-object
//!   payloads fail, and the error keeps the raw bytes.
//! - **Total presentation**: every operation kind and image combination
//!   produces a well-formed [`DisplayRecord`].
//! - **Stateless**: one call per message, no retained state, safe to
//!   invoke concurrently from multiple workers.

pub mod decode;
pub mod diff;
pub mod error;
pub mod event;
pub mod inspect;
pub mod metrics;
pub mod present;

pub use decode::decode_envelope;
pub use diff::{diff_rows, DiffPolicy, FieldChange, FieldDiff};
pub use error::{DecodeError, Result};
pub use event::{CdcEvent, CdcOp, Origin, RowImage, UNKNOWN_TABLE};
pub use inspect::{Inspector, Rendered};
pub use metrics::{InspectorMetrics, MetricsSnapshot};
pub use present::{
    format_timestamp, present, DisplayRecord, RowLine, RowSection, RowTag, SectionKind,
    TIMESTAMP_ABSENT,
};

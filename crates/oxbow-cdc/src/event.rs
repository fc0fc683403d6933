//! CDC event representation
//!
//! Unified, fully-typed view of one decoded change envelope. The decoder
//! ([`crate::decode`]) validates-and-defaults at the boundary so everything
//! downstream works over these types instead of raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered mapping from field name to JSON value for one row snapshot.
///
/// Iteration order is the order fields appeared in the envelope
/// (serde_json's `preserve_order` feature); the diff engine relies on it.
pub type RowImage = serde_json::Map<String, Value>;

/// Sentinel table name used when the envelope carries no `source.table`.
pub const UNKNOWN_TABLE: &str = "unknown";

/// Broker coordinates of the message an event was decoded from.
///
/// Carried through for display only; the engine never interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    /// Topic the message was consumed from
    pub topic: String,
    /// Partition index within the topic
    pub partition: i32,
    /// Offset within the partition
    pub offset: i64,
}

impl Origin {
    /// Create broker coordinates for one dequeued message.
    pub fn new(topic: impl Into<String>, partition: i32, offset: i64) -> Self {
        Self {
            topic: topic.into(),
            partition,
            offset,
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]@{}", self.topic, self.partition, self.offset)
    }
}

/// CDC operation type, derived from the envelope's single-character code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CdcOp {
    /// Row inserted (`c`)
    Create,
    /// Row updated (`u`)
    Update,
    /// Row deleted (`d`)
    Delete,
    /// Initial bulk-load read of an existing row (`r`), not a live change
    Snapshot,
    /// Unrecognized operation code, preserved verbatim for diagnostics.
    /// An empty string means the envelope carried no `op` field at all.
    Unknown(String),
}

impl CdcOp {
    /// Classify a wire operation code.
    pub fn from_code(code: &str) -> Self {
        match code {
            "c" => Self::Create,
            "u" => Self::Update,
            "d" => Self::Delete,
            "r" => Self::Snapshot,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The wire code this operation was derived from.
    pub fn code(&self) -> &str {
        match self {
            Self::Create => "c",
            Self::Update => "u",
            Self::Delete => "d",
            Self::Snapshot => "r",
            Self::Unknown(raw) => raw,
        }
    }

    /// Check if this is a recognized data-change operation.
    pub fn is_dml(&self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::Delete)
    }
}

impl std::fmt::Display for CdcOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CdcOp::Create => write!(f, "CREATE"),
            CdcOp::Update => write!(f, "UPDATE"),
            CdcOp::Delete => write!(f, "DELETE"),
            CdcOp::Snapshot => write!(f, "READ (snapshot)"),
            CdcOp::Unknown(raw) if raw.is_empty() => write!(f, "UNKNOWN (<missing>)"),
            CdcOp::Unknown(raw) => write!(f, "UNKNOWN ({raw})"),
        }
    }
}

/// One decoded change envelope.
///
/// Constructed fresh per message and discarded after presentation; the
/// engine retains no state across events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdcEvent {
    /// Operation type
    pub op: CdcOp,
    /// Source table name, [`UNKNOWN_TABLE`] when absent
    pub table: String,
    /// Event timestamp in epoch milliseconds; absent is a valid state
    pub ts_ms: Option<i64>,
    /// Prior row state (UPDATE/DELETE)
    pub before: Option<RowImage>,
    /// Current row state (CREATE/UPDATE/snapshot read)
    pub after: Option<RowImage>,
    /// Broker coordinates of the underlying message
    pub origin: Origin,
}

impl CdcEvent {
    /// Create an event with defaulted metadata and no row images.
    pub fn new(op: CdcOp, origin: Origin) -> Self {
        Self {
            op,
            table: UNKNOWN_TABLE.to_string(),
            ts_ms: None,
            before: None,
            after: None,
            origin,
        }
    }

    /// Set the source table name.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Set the event timestamp (epoch millis).
    pub fn with_ts_ms(mut self, ts_ms: i64) -> Self {
        self.ts_ms = Some(ts_ms);
        self
    }

    /// Set the prior row image.
    pub fn with_before(mut self, before: RowImage) -> Self {
        self.before = Some(before);
        self
    }

    /// Set the current row image.
    pub fn with_after(mut self, after: RowImage) -> Self {
        self.after = Some(after);
        self
    }
}

//! Mapping decoded events to display-ready records
//!
//! A [`DisplayRecord`] is the value contract between the engine and an
//! external renderer (console, log sink, UI). It carries no literal
//! formatting beyond the timestamp string; symbols, colors and layout are
//! the renderer's concern.

use crate::diff::{diff_rows, DiffPolicy, FieldChange, FieldDiff};
use crate::event::{CdcEvent, CdcOp, Origin, RowImage};
use chrono::DateTime;
use serde::Serialize;
use serde_json::Value;

/// Sentinel rendered for an absent timestamp.
pub const TIMESTAMP_ABSENT: &str = "N/A";

/// Tag attached to a rendered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowTag {
    /// Untagged row
    Plain,
    /// Field value changed relative to the prior image
    Changed,
    /// Field was dropped by the update (opt-in, see [`DiffPolicy`])
    Removed,
}

/// One rendering-ready `(field, value)` pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowLine {
    /// Field name
    pub field: String,
    /// Field value
    pub value: Value,
    /// Change tag for the renderer
    pub tag: RowTag,
}

/// Which part of the row images a section shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// `after` image of a create or snapshot read
    Data,
    /// `before` image of an update
    Before,
    /// `after` image of an update, tagged per the diff
    After,
    /// `before` image of a delete
    Deleted,
}

/// One titled group of rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowSection {
    /// Section kind, doubles as the renderer's title key
    pub kind: SectionKind,
    /// Rows in image order
    pub rows: Vec<RowLine>,
}

/// Display-ready projection of one decoded event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRecord {
    /// Operation label; the unknown fallback carries the raw op code
    pub label: String,
    /// Source table name
    pub table: String,
    /// Formatted timestamp, or [`TIMESTAMP_ABSENT`]
    pub timestamp: String,
    /// Broker coordinates of the underlying message
    pub origin: Origin,
    /// Row sections, empty for unknown operations
    pub sections: Vec<RowSection>,
}

/// Map an event (and, for updates, its diff) to a display record.
///
/// Total over every operation kind and image combination; never fails.
/// For updates, `diffs` is used when supplied and computed with the
/// default [`DiffPolicy`] otherwise.
pub fn present(event: &CdcEvent, diffs: Option<&[FieldDiff]>) -> DisplayRecord {
    let sections = match &event.op {
        CdcOp::Create | CdcOp::Snapshot => vec![RowSection {
            kind: SectionKind::Data,
            rows: plain_rows(event.after.as_ref()),
        }],
        CdcOp::Update => vec![
            RowSection {
                kind: SectionKind::Before,
                rows: plain_rows(event.before.as_ref()),
            },
            RowSection {
                kind: SectionKind::After,
                rows: match diffs {
                    Some(diffs) => diffs.iter().map(tagged_row).collect(),
                    None => {
                        diff_rows(event.before.as_ref(), event.after.as_ref(), DiffPolicy::default())
                            .iter()
                            .map(tagged_row)
                            .collect()
                    }
                },
            },
        ],
        CdcOp::Delete => vec![RowSection {
            kind: SectionKind::Deleted,
            rows: plain_rows(event.before.as_ref()),
        }],
        CdcOp::Unknown(_) => Vec::new(),
    };

    DisplayRecord {
        label: event.op.to_string(),
        table: event.table.clone(),
        timestamp: format_timestamp(event.ts_ms),
        origin: event.origin.clone(),
        sections,
    }
}

/// Format epoch milliseconds as `YYYY-MM-DD HH:MM:SS` (UTC).
///
/// Absent maps to [`TIMESTAMP_ABSENT`]; zero is a legitimate timestamp
/// (epoch start) and formats normally. Millis outside chrono's
/// representable range render as the raw integer rather than failing.
pub fn format_timestamp(ts_ms: Option<i64>) -> String {
    match ts_ms {
        None => TIMESTAMP_ABSENT.to_string(),
        Some(ms) => match DateTime::from_timestamp_millis(ms) {
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => ms.to_string(),
        },
    }
}

fn plain_rows(image: Option<&RowImage>) -> Vec<RowLine> {
    image
        .into_iter()
        .flatten()
        .map(|(field, value)| RowLine {
            field: field.clone(),
            value: value.clone(),
            tag: RowTag::Plain,
        })
        .collect()
}

fn tagged_row(diff: &FieldDiff) -> RowLine {
    RowLine {
        field: diff.name.clone(),
        value: diff.value.clone(),
        tag: match diff.change {
            FieldChange::Unchanged => RowTag::Plain,
            FieldChange::Changed => RowTag::Changed,
            FieldChange::Removed => RowTag::Removed,
        },
    }
}

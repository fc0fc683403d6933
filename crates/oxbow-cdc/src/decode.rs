//! Envelope decoding
//!
//! Parses a raw Debezium-style JSON envelope into a [`CdcEvent`]. The
//! envelope fields consumed are `op`, `source.table`, `ts_ms`, `before`
//! and `after`; all of them are optional. Decoding is tolerant by design:
//! an absent or mis-typed field maps to its documented default, never to
//! a failure. The only failure mode is a payload that is not a JSON
//! object at the top level.

use crate::error::{DecodeError, Result};
use crate::event::{CdcEvent, CdcOp, Origin, RowImage, UNKNOWN_TABLE};
use bytes::Bytes;
use serde_json::Value;

/// Decode one raw envelope payload into a structured event.
///
/// Pure transformation, no side effects. On failure the returned
/// [`DecodeError`] retains the raw payload for diagnostic display.
///
/// # Example
///
/// ```
/// use oxbow_cdc::{decode_envelope, CdcOp, Origin};
///
/// let raw = br#"{"op":"c","source":{"table":"users"},"after":{"id":1}}"#;
/// let event = decode_envelope(raw, Origin::new("cdc.public.users", 0, 7)).unwrap();
/// assert_eq!(event.op, CdcOp::Create);
/// assert_eq!(event.table, "users");
/// ```
pub fn decode_envelope(raw: &[u8], origin: Origin) -> Result<CdcEvent> {
    let value: Value = serde_json::from_slice(raw).map_err(|source| DecodeError::InvalidJson {
        source,
        raw: Bytes::copy_from_slice(raw),
    })?;

    let Value::Object(mut envelope) = value else {
        return Err(DecodeError::NotAnObject {
            raw: Bytes::copy_from_slice(raw),
        });
    };

    // An absent (or non-string) op is still a decodable event; the raw
    // code for "absent" is the empty string.
    let op = match envelope.get("op").and_then(Value::as_str) {
        Some(code) => CdcOp::from_code(code),
        None => CdcOp::Unknown(String::new()),
    };

    let table = envelope
        .get("source")
        .and_then(|source| source.get("table"))
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_TABLE)
        .to_string();

    // ts_ms: null and ts_ms absent are the same valid state; zero is a
    // legitimate timestamp (epoch start), not absence.
    let ts_ms = envelope.get("ts_ms").and_then(Value::as_i64);

    let before = take_image(&mut envelope, "before");
    let after = take_image(&mut envelope, "after");

    Ok(CdcEvent {
        op,
        table,
        ts_ms,
        before,
        after,
        origin,
    })
}

/// Extract a row image, treating null or non-object values as absent.
fn take_image(envelope: &mut serde_json::Map<String, Value>, key: &str) -> Option<RowImage> {
    match envelope.remove(key) {
        Some(Value::Object(image)) => Some(image),
        _ => None,
    }
}

//! Error types for envelope decoding
//!
//! Decoding fails only when a payload is not a JSON object; every missing
//! or mis-typed envelope field defaults instead (see [`crate::decode`]).
//! The failing payload is retained on the error so callers can surface it
//! in a diagnostic entry without re-reading the message.

use bytes::Bytes;
use thiserror::Error;

/// Errors raised at the decode boundary.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Payload is not parseable JSON
    #[error("payload is not valid JSON: {source}")]
    InvalidJson {
        /// Underlying parser error
        #[source]
        source: serde_json::Error,
        /// The raw payload, kept for postmortem inspection
        raw: Bytes,
    },

    /// Payload parsed, but the top level is not a JSON object
    #[error("payload is not a JSON object")]
    NotAnObject {
        /// The raw payload, kept for postmortem inspection
        raw: Bytes,
    },
}

impl DecodeError {
    /// The raw payload that failed to decode.
    pub fn raw(&self) -> &Bytes {
        match self {
            Self::InvalidJson { raw, .. } => raw,
            Self::NotAnObject { raw } => raw,
        }
    }
}

/// Result type for decode operations
pub type Result<T> = std::result::Result<T, DecodeError>;

//! Message-bus ingress (§6a): decodes a Pub/Sub-style envelope whose
//! `data` field is a base64-encoded JSON `InstanceSnapshot`.
//!
//! There is no real message bus client in scope; this module only
//! covers deserialization of the wire envelope, not transport.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use thiserror::Error;

use autoscale_core::types::InstanceSnapshot;

#[derive(Debug, Deserialize)]
struct Envelope {
    data: String,
}

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("envelope is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("envelope data is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("decoded envelope payload is not valid UTF-8")]
    InvalidUtf8,
}

/// Decode one `{ "data": "<base64 JSON InstanceSnapshot>" }` line into a
/// snapshot.
pub fn decode_envelope(line: &str) -> Result<InstanceSnapshot, EnvelopeError> {
    let envelope: Envelope = serde_json::from_str(line)?;
    let decoded = STANDARD.decode(envelope.data)?;
    let text = String::from_utf8(decoded).map_err(|_| EnvelopeError::InvalidUtf8)?;
    Ok(serde_json::from_str(&text)?)
}

//! Webhook payload decoding.
//!
//! The body of an authenticated request must parse as a JSON object. The
//! payload is treated as an opaque document; this module never interprets
//! its contents.

use serde_json::{Map, Value};

/// Parse the raw body as a JSON object.
///
/// A syntax error, or a body whose top-level value is not an object (array,
/// string, number), is a decode error in the client bad-request class, never
/// an internal error. The event-type name is not read from the body; it
/// comes from a dedicated header handled by the pipeline.
pub fn decode(body: &[u8]) -> Result<Map<String, Value>, serde_json::Error> {
    serde_json::from_slice(body)
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;

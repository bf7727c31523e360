//! Tests for payload decoding.

use super::*;

/// A JSON object decodes into its key/value document form.
#[test]
fn test_object_body_decodes() {
    let document = decode(br#"{"a":1,"nested":{"b":[true,null]}}"#).unwrap();

    assert_eq!(document.get("a"), Some(&serde_json::json!(1)));
    assert_eq!(
        document.get("nested"),
        Some(&serde_json::json!({"b": [true, null]}))
    );
}

/// An empty object is a valid (if useless) payload.
#[test]
fn test_empty_object_decodes() {
    let document = decode(b"{}").unwrap();
    assert!(document.is_empty());
}

/// A syntax error is a decode error, not a panic or internal failure.
#[test]
fn test_syntax_error_is_decode_error() {
    assert!(decode(b"{not json").is_err());
    assert!(decode(b"").is_err());
}

/// The top-level value must be an object; arrays and scalars are rejected.
#[test]
fn test_non_object_top_level_rejected() {
    assert!(decode(b"[1,2,3]").is_err());
    assert!(decode(b"\"string\"").is_err());
    assert!(decode(b"42").is_err());
    assert!(decode(b"null").is_err());
}

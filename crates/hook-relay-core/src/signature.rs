//! HMAC-SHA256 webhook signature verification.
//!
//! The security-critical piece of the pipeline. Verification distinguishes
//! three outcomes:
//!
//! - `Ok(true)`: the signature matches the payload under the current secret;
//! - `Ok(false)`: the signature lacks a supported scheme prefix, is not
//!   valid hex, or does not match; all are client authentication failures;
//! - `Err(_)`: the HMAC primitive itself failed, which is an environment
//!   problem and must not be reported as unauthorized.
//!
//! The digest comparison is constant-time (`subtle`), so execution time does
//! not depend on where the first differing byte occurs.

use crate::credentials::WebhookSecret;
use crate::error::SignatureError;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Scheme prefix identifying an HMAC-SHA256 signature header value.
pub const SIGNATURE_SCHEME_PREFIX: &str = "sha256=";

/// Verify a `sha256=<hex>` signature header against the raw body bytes.
///
/// The HMAC is computed over exactly the bytes as received; no text
/// decoding or re-encoding is involved.
pub fn verify(
    signature_header: &str,
    payload: &[u8],
    secret: &WebhookSecret,
) -> Result<bool, SignatureError> {
    let hex_digest = match signature_header.strip_prefix(SIGNATURE_SCHEME_PREFIX) {
        Some(rest) => rest,
        None => {
            debug!("unsupported webhook signature scheme");
            return Ok(false);
        }
    };

    let claimed = match hex::decode(hex_digest) {
        Ok(bytes) => bytes,
        Err(_) => {
            debug!("signature is not valid hex");
            return Ok(false);
        }
    };

    let expected = expected_digest(payload, secret)?;

    Ok(constant_time_compare(&claimed, &expected))
}

/// Compute the expected HMAC-SHA256 digest of `payload` keyed by the secret.
///
/// A key the primitive cannot accept is a fatal environment error for the
/// request, not a validation failure.
fn expected_digest(payload: &[u8], secret: &WebhookSecret) -> Result<Vec<u8>, SignatureError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| SignatureError::Hmac {
            message: e.to_string(),
        })?;
    mac.update(payload);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Constant-time byte comparison.
///
/// The length check itself is not secret-dependent, so short-circuiting on
/// mismatched lengths leaks nothing about the digest contents.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
#[path = "signature_tests.rs"]
mod tests;

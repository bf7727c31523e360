//! # Hook-Relay Core
//!
//! Authentication and validation pipeline for inbound CI webhook callbacks.
//!
//! The pipeline accepts a raw HTTP request (headers plus body bytes), rejects
//! anything malformed, oversized, or unauthenticated, verifies the
//! HMAC-SHA256 signature supplied by the sender, decodes the JSON payload,
//! and hands a typed [`WebhookEvent`] to a downstream [`EventDispatcher`].
//!
//! ## Architecture
//!
//! The core depends only on trait abstractions:
//! - [`SecretStore`] supplies the current shared webhook secret and may be
//!   rotated out-of-band while requests are in flight.
//! - [`EventDispatcher`] receives validated events; everything downstream of
//!   it (fan-out, persistence, consumers) is outside the core.
//!
//! The HTTP framework lives in the service crate; this crate never touches a
//! socket.
//!
//! ## Request flow
//!
//! ```text
//! RequestHead ──> gate ──> read body ──> verify signature ──> event header
//!                                           ──> decode JSON ──> dispatch
//! ```
//!
//! Every failure short-circuits into a [`HandleError`] that maps 1:1 onto an
//! HTTP status code.

pub mod credentials;
pub mod error;
pub mod event;
pub mod gate;
pub mod payload;
pub mod pipeline;
pub mod signature;

pub use credentials::{RotatingCredentials, SecretStore, WebhookSecret};
pub use error::{HandleError, SignatureError};
pub use event::{DispatchError, EventDispatcher, WebhookEvent};
pub use gate::{RequestGate, RequestHead, MAX_REQUEST_BODY_BYTES, SIGNATURE_HEADER};
pub use pipeline::{WebhookPipeline, EVENT_TYPE_HEADER};

//! # Hook-Relay HTTP Service
//!
//! Single-route HTTP front end for the webhook pipeline in
//! `hook-relay-core`:
//!
//! - `POST {webhook.endpoint_path}`: gate, authenticate, decode, and
//!   dispatch an inbound webhook callback
//! - `GET /health`: liveness
//!
//! The webhook handler is split around the body read: the gate runs against
//! the request head first, so a misconfigured server, a missing signature,
//! or an oversize declared length rejects the request *before* any body
//! bytes are pulled off the wire.

pub mod dispatcher;

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use hook_relay_core::{HandleError, RequestHead, WebhookPipeline, MAX_REQUEST_BODY_BYTES};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state, wired once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: ServiceConfig,
    pub pipeline: Arc<WebhookPipeline>,
}

impl AppState {
    pub fn new(config: ServiceConfig, pipeline: Arc<WebhookPipeline>) -> Self {
        Self { config, pipeline }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Service configuration.
///
/// Every field carries a serde default, so an absent file or an entirely
/// unconfigured environment still produces a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub webhook: WebhookConfig,
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Reject configurations that are deliberately set but unusable.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if !self.webhook.endpoint_path.starts_with('/') {
            return Err(ServiceError::Configuration {
                message: format!(
                    "webhook.endpoint_path must start with '/', got '{}'",
                    self.webhook.endpoint_path
                ),
            });
        }
        Ok(())
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,

    /// Port to listen on.
    pub port: u16,

    /// Graceful shutdown timeout in seconds.
    pub shutdown_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout_seconds: 30,
        }
    }
}

/// Webhook endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Route the webhook endpoint is served on.
    pub endpoint_path: String,

    /// The shared webhook secret. Absent means unconfigured: the service
    /// starts, warns, and rejects every webhook with 500 until a secret is
    /// provided.
    pub secret: Option<String>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            endpoint_path: "/webhook".to_string(),
            secret: None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level when `RUST_LOG` is unset.
    pub level: String,

    /// Emit JSON-structured log lines.
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Service-level errors.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("failed to bind to address {address}: {message}")]
    BindFailed { address: String, message: String },

    #[error("server failed: {message}")]
    ServerFailed { message: String },

    #[error("configuration error: {message}")]
    Configuration { message: String },
}

/// Webhook handler failure, mapped onto an HTTP response.
///
/// Client-class failures return their own message; server-class failures
/// are logged in full and answered with a generic message so internal
/// detail never reaches the caller.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Handle(#[from] HandleError),

    /// The body could not be read within the size cap: either the
    /// connection broke or the sender understated its content length.
    #[error("request body unreadable or exceeds the size cap")]
    BodyRead,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Handle(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::BodyRead => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status.is_server_error() {
            error!(error = %self, "webhook request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

// ============================================================================
// HTTP Server
// ============================================================================

/// Create the HTTP router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(&state.config.webhook.endpoint_path, post(handle_webhook))
        .route("/health", get(handle_health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server and run it until SIGINT/SIGTERM.
pub async fn start_server(
    config: ServiceConfig,
    pipeline: Arc<WebhookPipeline>,
) -> Result<(), ServiceError> {
    let address = format!("{}:{}", config.server.host, config.server.port);
    let shutdown_timeout =
        std::time::Duration::from_secs(config.server.shutdown_timeout_seconds);

    let state = AppState::new(config, pipeline);
    let app = create_router(state);

    let listener =
        tokio::net::TcpListener::bind(&address)
            .await
            .map_err(|e| ServiceError::BindFailed {
                address: address.clone(),
                message: e.to_string(),
            })?;

    info!(address = %address, "starting HTTP server");

    let shutdown_signal = async move {
        let ctrl_c = async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install Ctrl+C signal handler");
        };

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!(timeout_secs = shutdown_timeout.as_secs(), "received SIGINT, shutting down");
            },
            _ = terminate => {
                info!(timeout_secs = shutdown_timeout.as_secs(), "received SIGTERM, shutting down");
            },
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| ServiceError::ServerFailed {
            message: e.to_string(),
        })?;

    info!("HTTP server shutdown complete");
    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

/// Acknowledgement body for an accepted webhook.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub status: &'static str,
    pub event: String,
}

/// Handle an inbound webhook callback.
///
/// Runs the pipeline's gate against the request head, then reads the body
/// (bounded by the size cap) and completes verification, decoding, and
/// dispatch. The body of a gated request is never read.
pub async fn handle_webhook(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<WebhookAck>, ApiError> {
    let (parts, body) = request.into_parts();

    let header_map: HashMap<String, String> = parts
        .headers
        .iter()
        .map(|(k, v)| {
            (
                k.as_str().to_lowercase(),
                v.to_str().unwrap_or("").to_string(),
            )
        })
        .collect();

    let content_length = parts
        .headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    let head = RequestHead::new(header_map, content_length);

    let secret = state.pipeline.gate(&head).await?;

    let bytes = read_body(body).await?;

    let event_type = state.pipeline.process(&head, &bytes, &secret).await?;

    Ok(Json(WebhookAck {
        status: "ok",
        event: event_type,
    }))
}

/// Read the request body, enforcing the size cap even when the declared
/// content length understated the real size.
async fn read_body(body: Body) -> Result<bytes::Bytes, ApiError> {
    to_bytes(body, MAX_REQUEST_BODY_BYTES as usize)
        .await
        .map_err(|_| ApiError::BodyRead)
}

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: String,
}

/// Basic liveness check.
async fn handle_health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

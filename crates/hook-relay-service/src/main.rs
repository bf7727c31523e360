//! # Hook-Relay Service
//!
//! Binary entry point for the webhook relay HTTP service.
//!
//! This executable:
//! - loads configuration from files and environment,
//! - initializes logging,
//! - wires credentials, event stream, and pipeline,
//! - starts the HTTP server.

use hook_relay_service::dispatcher::StreamDispatcher;
use hook_relay_service::{start_server, ServiceConfig, ServiceError};
use hook_relay_core::{RotatingCredentials, WebhookPipeline};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "hook_relay_service=info,hook_relay_core=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("starting hook-relay service");

    // -------------------------------------------------------------------------
    // Load configuration
    //
    // Sources (applied in order — later sources override earlier ones):
    //  1. /etc/hook-relay/service.yaml          — system-wide defaults
    //  2. ./config/service.yaml                 — deployment-local override
    //  3. Path given by HOOK_RELAY_CONFIG_FILE  — operator-specified file
    //  4. Environment variables prefixed HR__ (double-underscore separator)
    //     e.g. HR__WEBHOOK__SECRET=... sets webhook.secret
    //
    // All fields carry serde defaults, so absent files or an unconfigured
    // environment produce a valid config. A malformed file or an
    // uncoercible environment variable IS a hard error because it indicates
    // deliberate-but-broken operator configuration.
    // -------------------------------------------------------------------------
    let mut config_builder = config::Config::builder()
        .add_source(
            config::File::with_name("/etc/hook-relay/service")
                .required(false)
                .format(config::FileFormat::Yaml),
        )
        .add_source(
            config::File::with_name("config/service")
                .required(false)
                .format(config::FileFormat::Yaml),
        );

    if let Ok(explicit_path) = std::env::var("HOOK_RELAY_CONFIG_FILE") {
        if !explicit_path.is_empty() {
            config_builder = config_builder.add_source(
                config::File::with_name(&explicit_path)
                    .required(true)
                    .format(config::FileFormat::Yaml),
            );
            info!(path = %explicit_path, "loading configuration from explicit path");
        }
    }

    let config = match config_builder
        .add_source(config::Environment::with_prefix("HR").separator("__"))
        .build()
    {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "failed to build configuration; aborting");
            std::process::exit(3);
        }
    };

    let service_config: ServiceConfig = match config.try_deserialize() {
        Ok(sc) => sc,
        Err(e) => {
            error!(
                error = %e,
                "could not deserialize service configuration; aborting. \
                 Fix the configuration and restart."
            );
            std::process::exit(3);
        }
    };

    if let Err(e) = service_config.validate() {
        error!(error = %e, "service configuration is invalid; aborting");
        std::process::exit(3);
    }

    // -------------------------------------------------------------------------
    // Wire the pipeline
    //
    // Credentials come from configuration and may be rotated by a reload
    // path; the service keeps running with an unconfigured secret but
    // rejects every webhook until one is installed.
    // -------------------------------------------------------------------------
    if service_config
        .webhook
        .secret
        .as_deref()
        .map_or(true, |s| s.is_empty())
    {
        warn!("webhook secret not configured; all webhook requests will be rejected");
    }

    let credentials = Arc::new(RotatingCredentials::new(
        service_config.webhook.secret.clone(),
    ));
    let dispatcher = Arc::new(StreamDispatcher::new());

    // Keep a logging consumer on the stream so dispatched events are
    // observable even with no application consumer attached yet.
    let mut log_subscriber = dispatcher.subscribe();
    tokio::spawn(async move {
        use tokio::sync::broadcast::error::RecvError;
        loop {
            match log_subscriber.recv().await {
                Ok(event) => debug!(event_type = %event.event_type, "event on stream"),
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "logging consumer lagged behind the stream")
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let pipeline = Arc::new(WebhookPipeline::new(credentials, dispatcher));

    info!(
        host = %service_config.server.host,
        port = service_config.server.port,
        endpoint = %service_config.webhook.endpoint_path,
        "starting HTTP server"
    );

    if let Err(e) = start_server(service_config, pipeline).await {
        error!("failed to start server: {}", e);

        let exit_code = match e {
            ServiceError::BindFailed { .. } => 1,
            ServiceError::ServerFailed { .. } => 2,
            ServiceError::Configuration { .. } => 3,
        };

        std::process::exit(exit_code);
    }

    Ok(())
}

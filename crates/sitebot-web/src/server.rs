//! Webhook server setup and the `/callback` handler.
//!
//! [`WebServer`] composes the axum router and starts the HTTP listener.
//! Each webhook delivery is verified against the channel secret, then every
//! contained event is processed synchronously before the acknowledgment is
//! returned to the platform.

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use tracing::{error, info, warn};

use sitebot_line::{WebhookEnvelope, validate_signature};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Webhook server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The address to bind the HTTP server to.
    pub bind_addr: String,
    /// The port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".into(),
            port: 10000,
        }
    }
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// The sitebot webhook server.
pub struct WebServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl WebServer {
    /// Create a new server around the shared state.
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// Return the `host:port` string this server will bind to.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.bind_addr, self.config.port)
    }

    /// Build the axum router with all routes registered.
    fn router(&self) -> Router {
        Router::new()
            .route("/healthz", get(healthz))
            .route("/callback", post(callback))
            .with_state(self.state.clone())
    }

    /// Bind the listener and serve until the process is stopped.
    pub async fn run(self) -> std::io::Result<()> {
        let addr = self.addr();
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!(addr = %addr, "webhook server listening");
        axum::serve(listener, self.router()).await
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Liveness probe.
async fn healthz() -> &'static str {
    "ok"
}

/// `POST /callback` — the webhook endpoint.
///
/// Signature mismatch rejects the delivery with 400 and no reply.  A valid
/// delivery is processed event-by-event; an unrecovered workflow failure
/// (sheet access, reply delivery) answers 500 so the platform sees the
/// failure instead of getting a reply.
async fn callback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, StatusCode> {
    let signature = headers
        .get("x-line-signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if !validate_signature(&state.channel_secret, &body, signature) {
        warn!("webhook signature mismatch");
        return Err(StatusCode::BAD_REQUEST);
    }

    let envelope = WebhookEnvelope::from_body(&body).map_err(|e| {
        warn!(error = %e, "undecodable webhook payload");
        StatusCode::BAD_REQUEST
    })?;

    for event in envelope.events {
        let Some(msg) = event.into_incoming() else {
            continue;
        };
        if let Err(e) = state.workflow.handle(msg).await {
            error!(error = %e, "workflow failed");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    Ok("OK")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

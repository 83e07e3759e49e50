//! Shared application state for the webhook server.
//!
//! [`AppState`] is wrapped in an `Arc` and shared across all request
//! handlers.  It holds the channel secret for signature verification and the
//! assembled workflow with its injected collaborators.

use crate::workflow::Workflow;

/// Shared state accessible from every axum handler.
pub struct AppState {
    /// Channel secret used to verify webhook signatures.
    pub channel_secret: String,

    /// The message-handling workflow.
    pub workflow: Workflow,
}

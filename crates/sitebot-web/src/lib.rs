//! Webhook server and end-to-end workflow for sitebot.
//!
//! This crate composes the pieces: an axum server receives signed webhook
//! deliveries on `POST /callback`, and the [`Workflow`] runs each text
//! message through the trigger filter, the intent extractor, and the record
//! updater, then sends exactly one reply.

pub mod server;
pub mod state;
pub mod workflow;

pub use server::{ServerConfig, WebServer};
pub use state::AppState;
pub use workflow::{ApplyUpdate, Extract, Handled, Reply, Workflow, WorkflowError};

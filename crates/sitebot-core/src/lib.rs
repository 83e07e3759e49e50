//! Core domain types and configuration for sitebot.
//!
//! This crate defines the data that flows through the bridge: the incoming
//! chat message, the structured record extracted from it, and the outcome of
//! applying that record to the compliance sheet.  It also provides the
//! environment-backed [`Config`] the binary resolves at startup.

pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, env_non_empty};
pub use error::{ConfigError, Result};
pub use types::{Action, ExtractionRecord, IncomingMessage, SourceType, UpdateOutcome};

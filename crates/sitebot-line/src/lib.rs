//! LINE Messaging API adapter for sitebot.
//!
//! Covers the three things the bridge needs from the platform: verifying the
//! webhook signature, decoding webhook events (mention metadata is an
//! explicit optional field, pattern-matched rather than probed), and sending
//! reply messages.

pub mod client;
pub mod error;
pub mod events;
pub mod messages;
pub mod signature;

pub use client::LineClient;
pub use error::{LineError, Result};
pub use events::{Event, WebhookEnvelope};
pub use signature::validate_signature;

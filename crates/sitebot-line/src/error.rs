//! LINE adapter error types.

/// Unified error type for the LINE adapter.
#[derive(Debug, thiserror::Error)]
pub enum LineError {
    /// An HTTP request to the Messaging API failed at the transport level.
    #[error("line request failed: {reason}")]
    RequestFailed { reason: String },

    /// The Messaging API answered with a non-success status.
    #[error("line api error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The webhook payload could not be decoded.
    #[error("invalid webhook payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

/// Convenience alias used throughout the line crate.
pub type Result<T> = std::result::Result<T, LineError>;

impl From<reqwest::Error> for LineError {
    fn from(err: reqwest::Error) -> Self {
        Self::RequestFailed {
            reason: err.to_string(),
        }
    }
}

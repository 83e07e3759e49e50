//! LLM client error types.

/// Unified error type for the chat-completions client.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The API key is missing.
    #[error("missing api key")]
    MissingApiKey,

    /// An HTTP request to the provider failed, or the provider returned a
    /// non-success status.
    #[error("llm request failed: {reason}")]
    RequestFailed { reason: String },

    /// The provider response could not be parsed into the expected format.
    #[error("llm response parse error: {reason}")]
    ParseFailed { reason: String },
}

/// Convenience alias used throughout the llm crate.
pub type Result<T> = std::result::Result<T, LlmError>;

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        Self::RequestFailed {
            reason: err.to_string(),
        }
    }
}

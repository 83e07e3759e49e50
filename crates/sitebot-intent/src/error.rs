//! Intent extraction error types.
//!
//! The three variants map one-to-one onto the user-facing reply chosen by
//! the workflow: a model-call failure gets its own warning, everything else
//! is reported as a sentence the bot could not understand.

use sitebot_llm::LlmError;

/// Unified error type for intent extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The chat call itself failed (network, auth, quota).
    #[error("model call failed: {reason}")]
    ModelCall { reason: String },

    /// The model's response was not valid JSON.
    #[error("unparseable model response: {reason}")]
    Unparseable { reason: String },

    /// The response parsed but a required field is missing, empty, or
    /// malformed.
    #[error("incomplete extraction: missing or invalid {missing}")]
    Incomplete { missing: String },
}

/// Convenience alias used throughout the intent crate.
pub type Result<T> = std::result::Result<T, ExtractError>;

impl From<LlmError> for ExtractError {
    fn from(err: LlmError) -> Self {
        Self::ModelCall {
            reason: err.to_string(),
        }
    }
}

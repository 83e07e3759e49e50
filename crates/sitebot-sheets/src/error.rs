//! Sheets error types.
//!
//! All spreadsheet subsystems surface errors through [`SheetError`].  The
//! workflow propagates a sheet failure instead of replying to the user.

/// Unified error type for the sheets crate.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    /// The service-account credential is missing, malformed, or could not be
    /// used to mint an access token.
    #[error("sheets auth failed: {reason}")]
    Auth { reason: String },

    /// An HTTP request to the Sheets API failed at the transport level.
    #[error("sheets request failed: {reason}")]
    RequestFailed { reason: String },

    /// The Sheets API answered with a non-success status.
    #[error("sheets api error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The API response did not have the expected shape.
    #[error("malformed sheets response: {reason}")]
    MalformedResponse { reason: String },

    /// A required column is absent from the worksheet header row.
    #[error("column not found in worksheet: {column}")]
    ColumnNotFound { column: String },
}

/// Convenience alias used throughout the sheets crate.
pub type Result<T> = std::result::Result<T, SheetError>;

impl From<reqwest::Error> for SheetError {
    fn from(err: reqwest::Error) -> Self {
        Self::RequestFailed {
            reason: err.to_string(),
        }
    }
}

//! Environment-backed configuration.
//!
//! Secrets and identifiers are resolved once at startup.  Validation is
//! presence-only: a missing or empty required variable is an error, but no
//! attempt is made to verify that a token actually works.

use crate::error::{ConfigError, Result};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default listening port.
pub const DEFAULT_PORT: u16 = 10000;

/// Default extraction model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default worksheet title within the spreadsheet.
pub const DEFAULT_WORKSHEET: &str = "履約主表";

/// Default trigger token for one-to-one chats.
pub const DEFAULT_TRIGGER_TOKEN: &str = "威威1號";

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Resolved process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// LINE channel secret used to verify webhook signatures.
    pub line_channel_secret: String,
    /// LINE channel access token used to send replies.
    pub line_channel_access_token: String,
    /// API key for the extraction model.
    pub openai_api_key: String,
    /// Model identifier for extraction requests.
    pub openai_model: String,
    /// Optional OpenAI-compatible base URL override.
    pub openai_base_url: Option<String>,
    /// Spreadsheet id of the compliance sheet.
    pub sheet_id: String,
    /// Google service-account credential payload (JSON).
    pub gspread_json: String,
    /// Worksheet title within the spreadsheet.
    pub worksheet: String,
    /// Trigger token that activates processing in one-to-one chats.
    pub trigger_token: String,
    /// Port the webhook server listens on.
    pub port: u16,
}

impl Config {
    /// Resolve configuration from the process environment.
    ///
    /// Required: `LINE_CHANNEL_SECRET`, `LINE_CHANNEL_ACCESS_TOKEN`,
    /// `OPENAI_API_KEY`, `SHEET_ID`, `GSPREAD_JSON`.  Everything else has a
    /// default.
    pub fn from_env() -> Result<Self> {
        let port = match env_non_empty("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidVar {
                name: "PORT".into(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            line_channel_secret: required("LINE_CHANNEL_SECRET")?,
            line_channel_access_token: required("LINE_CHANNEL_ACCESS_TOKEN")?,
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_model: env_non_empty("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            openai_base_url: env_non_empty("OPENAI_BASE_URL"),
            sheet_id: required("SHEET_ID")?,
            gspread_json: required("GSPREAD_JSON")?,
            worksheet: env_non_empty("SHEET_WORKSHEET")
                .unwrap_or_else(|| DEFAULT_WORKSHEET.into()),
            trigger_token: env_non_empty("TRIGGER_TOKEN")
                .unwrap_or_else(|| DEFAULT_TRIGGER_TOKEN.into()),
            port,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Read an environment variable, treating empty or whitespace-only values as
/// unset.
pub fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(name: &str) -> Result<String> {
    env_non_empty(name).ok_or_else(|| ConfigError::MissingVar { name: name.into() })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

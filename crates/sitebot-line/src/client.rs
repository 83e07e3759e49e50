//! Messaging API reply client.

use serde_json::json;
use tracing::debug;

use crate::error::{LineError, Result};

/// Messaging API base URL.
const LINE_API_BASE: &str = "https://api.line.me/v2/bot";

/// Client for sending replies through the Messaging API.
///
/// Constructed once at process start with the channel access token and
/// shared for the process lifetime.
#[derive(Debug, Clone)]
pub struct LineClient {
    http: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl LineClient {
    /// Create a client with the given channel access token.
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| LineError::RequestFailed {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            access_token: access_token.into(),
            base_url: LINE_API_BASE.to_string(),
        })
    }

    /// Send one text reply for the given reply token.
    ///
    /// Reply tokens are single-use; the Messaging API rejects reuse, which
    /// surfaces as [`LineError::Api`].
    pub async fn reply(&self, reply_token: &str, text: &str) -> Result<()> {
        let url = format!("{}/message/reply", self.base_url);
        let body = build_reply_body(reply_token, text);

        debug!(reply_token = reply_token, "sending reply");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LineError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

/// Build the JSON body for a single-message text reply.
fn build_reply_body(reply_token: &str, text: &str) -> serde_json::Value {
    json!({
        "replyToken": reply_token,
        "messages": [{ "type": "text", "text": text }]
    })
}

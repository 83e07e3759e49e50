//! Non-streaming Chat Completions client.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};

use crate::error::{LlmError, Result};
use crate::types::{ChatRequest, Message, Role};

/// Default OpenAI API base URL.
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

// ---------------------------------------------------------------------------
// Client configuration
// ---------------------------------------------------------------------------

/// Configuration for connecting to a single provider endpoint.
#[derive(Debug, Clone)]
pub struct LlmClientConfig {
    /// API key for authentication.
    pub api_key: String,
    /// Base URL for the API (e.g. `https://api.openai.com/v1`).
    pub base_url: String,
    /// Default model identifier.
    pub default_model: String,
    /// Default maximum tokens per response.
    pub max_tokens: u32,
}

impl LlmClientConfig {
    /// Create a configuration for the OpenAI API.
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: OPENAI_BASE_URL.to_owned(),
            default_model: model.into(),
            max_tokens: 512,
        }
    }

    /// Create a configuration for any OpenAI-compatible API.
    pub fn openai_compatible(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            default_model: model.into(),
            max_tokens: 512,
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// A chat-completions client for OpenAI-compatible endpoints.
///
/// Cheap to clone; constructed once at process start and shared for the
/// process lifetime.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmClientConfig,
    http: reqwest::Client,
}

impl LlmClient {
    /// Create a new client with the given configuration.
    pub fn new(config: LlmClientConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| LlmError::RequestFailed {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { config, http })
    }

    /// Send a chat request and return the model's text answer.
    ///
    /// Blocks until the entire response is received.
    pub async fn chat(&self, request: &ChatRequest) -> Result<String> {
        let body = self.build_request_body(request);
        let resp = self.send_request(&body).await?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| LlmError::RequestFailed {
            reason: format!("failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            return Err(LlmError::RequestFailed {
                reason: format!("API returned {status}: {text}"),
            });
        }

        let v: Value = serde_json::from_str(&text).map_err(|e| LlmError::ParseFailed {
            reason: format!("invalid JSON response: {e}"),
        })?;

        parse_chat_response(&v)
    }

    /// Build the JSON body for the Chat Completions API.
    fn build_request_body(&self, request: &ChatRequest) -> Value {
        let messages = messages_to_wire(&request.messages);

        let mut body = json!({
            "model": if request.model.is_empty() {
                &self.config.default_model
            } else {
                &request.model
            },
            "max_tokens": request.max_tokens.unwrap_or(self.config.max_tokens),
            "messages": messages,
        });

        if let Some(temp) = request.temperature {
            body["temperature"] = json!(temp);
        }

        body
    }

    /// Send the HTTP request to the Chat Completions endpoint.
    async fn send_request(&self, body: &Value) -> Result<reqwest::Response> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", self.config.api_key);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value).map_err(|e| LlmError::RequestFailed {
                reason: format!("invalid authorization header: {e}"),
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        tracing::debug!(url = %url, model = %body["model"], "sending LLM request");

        self.http
            .post(&url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed {
                reason: e.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Wire format conversion (free functions)
// ---------------------------------------------------------------------------

/// Convert messages to the Chat Completions wire format.
fn messages_to_wire(messages: &[Message]) -> Vec<Value> {
    messages
        .iter()
        .map(|msg| {
            let role = match msg.role {
                Role::System => "system",
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            json!({ "role": role, "content": msg.content })
        })
        .collect()
}

/// Parse a non-streaming Chat Completions response into its text content.
pub fn parse_chat_response(v: &Value) -> Result<String> {
    let message = &v["choices"][0]["message"];

    if message.is_null() {
        return Err(LlmError::ParseFailed {
            reason: "missing `choices[0].message` in response".into(),
        });
    }

    let content = message["content"].as_str().unwrap_or_default();
    Ok(content.to_owned())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> LlmClient {
        LlmClient::new(LlmClientConfig::openai("sk-test", "gpt-3.5-turbo")).unwrap()
    }

    #[test]
    fn new_rejects_empty_api_key() {
        let result = LlmClient::new(LlmClientConfig::openai("", "gpt-3.5-turbo"));
        assert!(matches!(result, Err(LlmError::MissingApiKey)));
    }

    #[test]
    fn build_request_body_basic() {
        let client = test_client();
        let request = ChatRequest {
            model: String::new(),
            messages: vec![Message::user("hello")],
            temperature: Some(0.0),
            max_tokens: Some(256),
        };

        let body = client.build_request_body(&request);
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["max_tokens"], 256);
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello");
    }

    #[test]
    fn build_request_body_model_override() {
        let client = test_client();
        let request = ChatRequest {
            model: "gpt-4o-mini".into(),
            messages: vec![Message::system("be terse"), Message::user("hi")],
            temperature: None,
            max_tokens: None,
        };

        let body = client.build_request_body(&request);
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 512);
        assert!(body.get("temperature").is_none());
        assert_eq!(body["messages"][0]["role"], "system");
    }

    #[test]
    fn parse_chat_response_text() {
        let v = serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "{\"ok\":true}" } }]
        });
        assert_eq!(parse_chat_response(&v).unwrap(), "{\"ok\":true}");
    }

    #[test]
    fn parse_chat_response_missing_message() {
        let v = serde_json::json!({ "choices": [] });
        assert!(matches!(
            parse_chat_response(&v),
            Err(LlmError::ParseFailed { .. })
        ));
    }
}

//! OpenAI-compatible chat-completions client.
//!
//! Supports the **OpenAI Chat Completions API** and compatible endpoints
//! (Azure front-ends, Ollama, vLLM) in non-streaming mode.  The extractor
//! makes exactly one deterministic chat call per incoming message, so this
//! crate deliberately carries no streaming or tool-use machinery.

pub mod client;
pub mod error;
pub mod types;

pub use client::{LlmClient, LlmClientConfig};
pub use error::{LlmError, Result};
pub use types::{ChatRequest, Message, Role};

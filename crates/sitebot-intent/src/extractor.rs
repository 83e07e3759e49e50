//! The intent extractor.
//!
//! Embeds the message text in a fixed instruction prompt, asks the model for
//! a four-field JSON object with temperature 0, and decodes the response
//! into an [`ExtractionRecord`].

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};

use sitebot_core::{Action, ExtractionRecord};
use sitebot_llm::{ChatRequest, LlmClient, Message};

use crate::error::{ExtractError, Result};

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

/// Fixed instruction template.  The domain framing (civil-engineering
/// contract compliance) and the example object anchor the model to the four
/// expected keys.
const PROMPT_TEMPLATE: &str = r#"你是一個土木工程履約助理，請從以下語句中分析出：
1. 案名（可模糊比對）
2. 工作項目（可模糊比對）
3. 動作（提送 或 核定）
4. 日期（格式化為 2025-03-05）
請用 JSON 格式輸出，例如：
{"案名": "南區開口工程", "工作項目": "提送工程預算書圖", "動作": "提送", "日期": "2025-03-05"}
語句："#;

/// Token budget for the extraction response.  The reply is a single small
/// JSON object.
const EXTRACTION_MAX_TOKENS: u32 = 256;

// ---------------------------------------------------------------------------
// Raw model output
// ---------------------------------------------------------------------------

/// The JSON object the model is instructed to emit.  Every field is optional
/// at the wire level; completeness is validated afterwards.
#[derive(Debug, Deserialize)]
struct RawExtraction {
    #[serde(rename = "案名")]
    project_name: Option<String>,
    #[serde(rename = "工作項目")]
    work_item: Option<String>,
    #[serde(rename = "動作")]
    action: Option<String>,
    #[serde(rename = "日期")]
    date: Option<String>,
}

// ---------------------------------------------------------------------------
// Extractor
// ---------------------------------------------------------------------------

/// Extracts a structured compliance update from free-form chat text.
#[derive(Debug, Clone)]
pub struct IntentExtractor {
    /// Chat client, shared for the process lifetime.
    llm: LlmClient,

    /// Model identifier to use for extraction requests.
    model: String,
}

impl IntentExtractor {
    /// Create an extractor backed by the given client and model.
    pub fn new(llm: LlmClient, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    /// Extract a structured record from the message text.
    ///
    /// One chat call, no retry.  Deterministic decoding (temperature 0)
    /// keeps repeated extractions of the same sentence stable.
    pub async fn extract(&self, text: &str) -> Result<ExtractionRecord> {
        debug!(text = text, "extracting intent");

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message::user(self.build_prompt(text))],
            temperature: Some(0.0),
            max_tokens: Some(EXTRACTION_MAX_TOKENS),
        };

        let response = self.llm.chat(&request).await?;
        let record = parse_extraction(&response)?;

        info!(
            work_item = %record.work_item,
            action = %record.action,
            date = %record.date,
            "intent extracted"
        );
        Ok(record)
    }

    /// Build the full prompt with the message text interpolated.
    fn build_prompt(&self, text: &str) -> String {
        format!("{PROMPT_TEMPLATE}{text}")
    }
}

// ---------------------------------------------------------------------------
// Response decoding
// ---------------------------------------------------------------------------

/// Decode the model's textual response into an [`ExtractionRecord`].
///
/// Handles markdown code-block wrappers that models sometimes emit, then
/// parses strictly as JSON and validates completeness: work item, action,
/// and date must all be present, the action must be one of the two supported
/// verbs, and the date must be `YYYY-MM-DD`.
pub fn parse_extraction(response: &str) -> Result<ExtractionRecord> {
    // Strip optional markdown code fences.
    let cleaned = response.trim();
    let cleaned = cleaned.strip_prefix("```json").unwrap_or(cleaned);
    let cleaned = cleaned.strip_prefix("```").unwrap_or(cleaned);
    let cleaned = cleaned.strip_suffix("```").unwrap_or(cleaned);
    let cleaned = cleaned.trim();

    let raw: RawExtraction =
        serde_json::from_str(cleaned).map_err(|e| ExtractError::Unparseable {
            reason: format!("failed to parse model response as JSON: {e}"),
        })?;

    let work_item = non_empty(raw.work_item).ok_or_else(|| ExtractError::Incomplete {
        missing: "工作項目".into(),
    })?;

    let action_verb = non_empty(raw.action).ok_or_else(|| ExtractError::Incomplete {
        missing: "動作".into(),
    })?;
    let action = Action::from_verb(&action_verb).ok_or_else(|| ExtractError::Incomplete {
        missing: "動作".into(),
    })?;

    let date = non_empty(raw.date).ok_or_else(|| ExtractError::Incomplete {
        missing: "日期".into(),
    })?;
    if NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_err() {
        return Err(ExtractError::Incomplete {
            missing: "日期".into(),
        });
    }

    Ok(ExtractionRecord {
        project_name: non_empty(raw.project_name),
        work_item,
        action,
        date,
    })
}

/// Trim a field and drop it entirely when empty.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Domain types shared across the sitebot crates.
//!
//! These model the data flowing through the bridge: an [`IncomingMessage`]
//! arrives from the chat platform, the extractor turns its text into an
//! [`ExtractionRecord`], and the updater reports an [`UpdateOutcome`].

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Incoming message
// ---------------------------------------------------------------------------

/// Where an incoming message originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// A one-to-one conversation with the bot.
    User,
    /// A group chat.
    Group,
    /// A multi-person room.
    Room,
}

/// A chat message as seen by the workflow.
///
/// Built once per webhook event and discarded after processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// The raw message text.
    pub text: String,

    /// The conversation type the message arrived from.
    pub source: SourceType,

    /// Whether the bot account was explicitly mentioned.
    ///
    /// Derived from the platform's mention metadata; always `false` when the
    /// event carries no mention block.
    pub mentions_bot: bool,

    /// One-shot token used to reply to this specific event.
    pub reply_token: String,
}

// ---------------------------------------------------------------------------
// Extraction record
// ---------------------------------------------------------------------------

/// The two supported operations on a tracked work item.
///
/// The action determines which date column of the compliance sheet is
/// updated: submission date for [`Action::Submit`], approval date for
/// [`Action::Approve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// The deliverable was submitted (提送).
    Submit,
    /// The deliverable was approved (核定).
    Approve,
}

impl Action {
    /// Parse the action verb as emitted by the extraction model.
    ///
    /// Returns `None` for anything other than the two supported verbs; the
    /// caller treats that as an incomplete extraction.
    pub fn from_verb(verb: &str) -> Option<Self> {
        match verb.trim() {
            "提送" => Some(Self::Submit),
            "核定" => Some(Self::Approve),
            _ => None,
        }
    }

    /// The verb used in user-facing replies and sheet column selection.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Submit => "提送",
            Self::Approve => "核定",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.verb())
    }
}

/// Structured update extracted from free text by the language model.
///
/// A record is only usable when `work_item`, `action`, and `date` are all
/// present; `project_name` is informational and never validated or matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// Project reference, if the sentence named one.
    pub project_name: Option<String>,

    /// The tracked deliverable this update concerns.
    pub work_item: String,

    /// Which date column to write.
    pub action: Action,

    /// Date in `YYYY-MM-DD`, written to the sheet verbatim.
    pub date: String,
}

// ---------------------------------------------------------------------------
// Update outcome
// ---------------------------------------------------------------------------

/// Result of applying an [`ExtractionRecord`] to the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Exactly one cell was overwritten.
    Matched {
        work_item: String,
        action: Action,
        date: String,
    },

    /// No row's work-item field matched the extracted work item.
    NotMatched { work_item: String },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

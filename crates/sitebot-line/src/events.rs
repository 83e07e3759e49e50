//! Webhook event payload types.
//!
//! Only the fields the workflow consumes are modeled.  Mention metadata is
//! an explicit `Option` on the message content; whether the bot was
//! mentioned is answered by pattern-matching it, never by probing dynamic
//! JSON.

use serde::Deserialize;

use sitebot_core::{IncomingMessage, SourceType};

use crate::error::Result;

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The top-level webhook request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEnvelope {
    /// Bot user id the delivery was addressed to.
    #[serde(default)]
    pub destination: String,

    /// The events in this delivery.  May be empty (verification pings).
    #[serde(default)]
    pub events: Vec<Event>,
}

impl WebhookEnvelope {
    /// Decode an envelope from the raw request body.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }
}

/// A single webhook event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Event type (`"message"`, `"follow"`, `"join"`, ...).
    #[serde(rename = "type")]
    pub kind: String,

    /// One-shot reply token, present on replyable events.
    #[serde(default)]
    pub reply_token: Option<String>,

    /// Where the event came from.
    #[serde(default)]
    pub source: Option<Source>,

    /// Message content, present on message events.
    #[serde(default)]
    pub message: Option<MessageContent>,
}

/// The conversation an event originated from.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[serde(rename = "type")]
    pub kind: SourceKind,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Platform source discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    User,
    Group,
    Room,
    #[serde(other)]
    Unknown,
}

/// The content of a message event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageContent {
    /// Message type (`"text"`, `"image"`, `"sticker"`, ...).
    #[serde(rename = "type")]
    pub kind: String,

    /// Message text, present on text messages.
    #[serde(default)]
    pub text: Option<String>,

    /// Mention metadata, present when the text mentions someone.
    #[serde(default)]
    pub mention: Option<Mention>,
}

/// Mention metadata attached to a text message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mention {
    #[serde(default)]
    pub mentionees: Vec<Mentionee>,
}

/// One mentioned account within a message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mentionee {
    /// Whether this mention addresses the bot itself.
    #[serde(default)]
    pub is_self: Option<bool>,
    #[serde(default)]
    pub user_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Conversion to the domain type
// ---------------------------------------------------------------------------

impl Event {
    /// Convert this event into an [`IncomingMessage`], if it is a replyable
    /// text message from a known source type.  Everything else (stickers,
    /// images, joins, unknown sources) yields `None` and is ignored.
    pub fn into_incoming(self) -> Option<IncomingMessage> {
        if self.kind != "message" {
            return None;
        }

        let reply_token = self.reply_token?;
        let source = match self.source?.kind {
            SourceKind::User => SourceType::User,
            SourceKind::Group => SourceType::Group,
            SourceKind::Room => SourceType::Room,
            SourceKind::Unknown => return None,
        };

        let message = self.message?;
        if message.kind != "text" {
            return None;
        }
        let text = message.text?;

        let mentions_bot = match &message.mention {
            Some(mention) => mention
                .mentionees
                .iter()
                .any(|m| m.is_self == Some(true)),
            None => false,
        };

        Some(IncomingMessage {
            text,
            source,
            mentions_bot,
            reply_token,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn text_event(body: serde_json::Value) -> Event {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn envelope_decodes_events() {
        let body = serde_json::json!({
            "destination": "Uxxx",
            "events": [{
                "type": "message",
                "replyToken": "rt-1",
                "source": { "type": "user", "userId": "U1" },
                "message": { "type": "text", "text": "hello" }
            }]
        });
        let envelope = WebhookEnvelope::from_body(body.to_string().as_bytes()).unwrap();
        assert_eq!(envelope.events.len(), 1);
        assert_eq!(envelope.destination, "Uxxx");
    }

    #[test]
    fn empty_envelope_is_valid() {
        let envelope = WebhookEnvelope::from_body(br#"{"destination":"U","events":[]}"#).unwrap();
        assert!(envelope.events.is_empty());
    }

    #[test]
    fn text_message_converts() {
        let event = text_event(serde_json::json!({
            "type": "message",
            "replyToken": "rt-1",
            "source": { "type": "user", "userId": "U1" },
            "message": { "type": "text", "text": "威威1號 你好" }
        }));

        let msg = event.into_incoming().unwrap();
        assert_eq!(msg.text, "威威1號 你好");
        assert_eq!(msg.source, SourceType::User);
        assert!(!msg.mentions_bot);
        assert_eq!(msg.reply_token, "rt-1");
    }

    #[test]
    fn group_mention_of_bot_is_detected() {
        let event = text_event(serde_json::json!({
            "type": "message",
            "replyToken": "rt-2",
            "source": { "type": "group", "groupId": "G1" },
            "message": {
                "type": "text",
                "text": "@威威1號 南區開口工程的工程預算書圖已提送",
                "mention": {
                    "mentionees": [
                        { "index": 0, "length": 5, "isSelf": true }
                    ]
                }
            }
        }));

        let msg = event.into_incoming().unwrap();
        assert_eq!(msg.source, SourceType::Group);
        assert!(msg.mentions_bot);
    }

    #[test]
    fn mention_of_someone_else_is_not_a_bot_mention() {
        let event = text_event(serde_json::json!({
            "type": "message",
            "replyToken": "rt-3",
            "source": { "type": "room", "roomId": "R1" },
            "message": {
                "type": "text",
                "text": "@someone hi",
                "mention": {
                    "mentionees": [
                        { "index": 0, "length": 8, "isSelf": false, "userId": "U9" }
                    ]
                }
            }
        }));

        let msg = event.into_incoming().unwrap();
        assert_eq!(msg.source, SourceType::Room);
        assert!(!msg.mentions_bot);
    }

    #[test]
    fn non_text_message_is_ignored() {
        let event = text_event(serde_json::json!({
            "type": "message",
            "replyToken": "rt-4",
            "source": { "type": "user" },
            "message": { "type": "sticker", "packageId": "1", "stickerId": "2" }
        }));
        assert!(event.into_incoming().is_none());
    }

    #[test]
    fn non_message_event_is_ignored() {
        let event = text_event(serde_json::json!({
            "type": "follow",
            "replyToken": "rt-5",
            "source": { "type": "user" }
        }));
        assert!(event.into_incoming().is_none());
    }

    #[test]
    fn unknown_source_is_ignored() {
        let event = text_event(serde_json::json!({
            "type": "message",
            "replyToken": "rt-6",
            "source": { "type": "multicast" },
            "message": { "type": "text", "text": "hi" }
        }));
        assert!(event.into_incoming().is_none());
    }
}

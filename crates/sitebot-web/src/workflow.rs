//! The message-handling workflow.
//!
//! One synchronous pass per incoming message: trigger filter → intent
//! extraction → sheet update → reply.  The three collaborators sit behind
//! trait seams so they are injected by the binary and substituted by mocks
//! in tests; the workflow itself holds no ambient global state.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use sitebot_core::{ExtractionRecord, IncomingMessage, SourceType, UpdateOutcome};
use sitebot_intent::{ExtractError, IntentExtractor};
use sitebot_line::{LineClient, LineError, messages};
use sitebot_sheets::{RecordUpdater, SheetError};

// ---------------------------------------------------------------------------
// Collaborator seams
// ---------------------------------------------------------------------------

/// Extracts a structured record from message text.
#[async_trait]
pub trait Extract: Send + Sync {
    async fn extract(&self, text: &str) -> Result<ExtractionRecord, ExtractError>;
}

#[async_trait]
impl Extract for IntentExtractor {
    async fn extract(&self, text: &str) -> Result<ExtractionRecord, ExtractError> {
        IntentExtractor::extract(self, text).await
    }
}

/// Applies an extracted record to the sheet.
#[async_trait]
pub trait ApplyUpdate: Send + Sync {
    async fn apply_update(&self, record: &ExtractionRecord) -> Result<UpdateOutcome, SheetError>;
}

#[async_trait]
impl ApplyUpdate for RecordUpdater {
    async fn apply_update(&self, record: &ExtractionRecord) -> Result<UpdateOutcome, SheetError> {
        RecordUpdater::apply_update(self, record).await
    }
}

/// Sends one reply for a reply token.
#[async_trait]
pub trait Reply: Send + Sync {
    async fn reply(&self, reply_token: &str, text: &str) -> Result<(), LineError>;
}

#[async_trait]
impl Reply for LineClient {
    async fn reply(&self, reply_token: &str, text: &str) -> Result<(), LineError> {
        LineClient::reply(self, reply_token, text).await
    }
}

// ---------------------------------------------------------------------------
// Errors and outcomes
// ---------------------------------------------------------------------------

/// Unrecovered workflow failures.
///
/// Extraction failures and unmatched work items are *not* errors — they are
/// answered with a warning reply.  Only sheet access and reply delivery
/// failures propagate here.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error(transparent)]
    Reply(#[from] LineError),
}

/// What the workflow did with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// The trigger filter did not fire; no extraction, no reply.
    Ignored,
    /// The message was processed and exactly one reply was sent.
    Replied,
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// The end-to-end message workflow.
pub struct Workflow {
    extractor: Arc<dyn Extract>,
    updater: Arc<dyn ApplyUpdate>,
    replier: Arc<dyn Reply>,
    trigger_token: String,
}

impl Workflow {
    /// Assemble the workflow from its injected collaborators.
    pub fn new(
        extractor: Arc<dyn Extract>,
        updater: Arc<dyn ApplyUpdate>,
        replier: Arc<dyn Reply>,
        trigger_token: impl Into<String>,
    ) -> Self {
        Self {
            extractor,
            updater,
            replier,
            trigger_token: trigger_token.into(),
        }
    }

    /// Process one incoming text message end-to-end.
    ///
    /// Recoverable failures (extraction errors, incomplete sentences, no
    /// matching row) each produce their fixed warning reply.  Sheet and
    /// reply failures propagate unrecovered.
    pub async fn handle(&self, msg: IncomingMessage) -> Result<Handled, WorkflowError> {
        if !self.should_process(&msg) {
            debug!(source = ?msg.source, "message did not trigger processing");
            return Ok(Handled::Ignored);
        }

        let reply_text = match self.extractor.extract(&msg.text).await {
            Ok(record) => {
                let outcome = self.updater.apply_update(&record).await?;
                messages::for_outcome(&outcome)
            }
            Err(ExtractError::ModelCall { reason }) => messages::model_error(&reason),
            Err(ExtractError::Unparseable { .. }) => messages::CANNOT_UNDERSTAND.to_string(),
            Err(ExtractError::Incomplete { .. }) => messages::INCOMPLETE.to_string(),
        };

        self.replier.reply(&msg.reply_token, &reply_text).await?;
        info!(reply = %reply_text, "message processed");
        Ok(Handled::Replied)
    }

    /// The trigger filter.
    ///
    /// One-to-one chats require the trigger token in the text; group and
    /// room chats require an explicit mention of the bot.  This keeps the
    /// extractor from consuming every unrelated message in a shared chat.
    fn should_process(&self, msg: &IncomingMessage) -> bool {
        match msg.source {
            SourceType::User => msg.text.contains(&self.trigger_token),
            SourceType::Group | SourceType::Room => msg.mentions_bot,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use sitebot_core::Action;

    // -- Mock collaborators ---------------------------------------------------

    /// Extractor that returns a canned result and counts invocations.
    struct MockExtractor {
        result: fn() -> Result<ExtractionRecord, ExtractError>,
        calls: Mutex<u32>,
    }

    #[async_trait]
    impl Extract for MockExtractor {
        async fn extract(&self, _text: &str) -> Result<ExtractionRecord, ExtractError> {
            *self.calls.lock().unwrap() += 1;
            (self.result)()
        }
    }

    /// Updater that records applied records and returns a canned outcome.
    struct MockUpdater {
        matched: bool,
        fail: bool,
        applied: Mutex<Vec<ExtractionRecord>>,
    }

    #[async_trait]
    impl ApplyUpdate for MockUpdater {
        async fn apply_update(
            &self,
            record: &ExtractionRecord,
        ) -> Result<UpdateOutcome, SheetError> {
            if self.fail {
                return Err(SheetError::Api {
                    status: 500,
                    body: "backend unavailable".into(),
                });
            }
            self.applied.lock().unwrap().push(record.clone());
            if self.matched {
                Ok(UpdateOutcome::Matched {
                    work_item: record.work_item.clone(),
                    action: record.action,
                    date: record.date.clone(),
                })
            } else {
                Ok(UpdateOutcome::NotMatched {
                    work_item: record.work_item.clone(),
                })
            }
        }
    }

    /// Replier that records every (token, text) pair.
    #[derive(Default)]
    struct MockReplier {
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Reply for MockReplier {
        async fn reply(&self, reply_token: &str, text: &str) -> Result<(), LineError> {
            self.sent
                .lock()
                .unwrap()
                .push((reply_token.to_string(), text.to_string()));
            Ok(())
        }
    }

    // -- Fixtures -------------------------------------------------------------

    fn good_record() -> Result<ExtractionRecord, ExtractError> {
        Ok(ExtractionRecord {
            project_name: Some("南區開口工程".into()),
            work_item: "工程預算書圖".into(),
            action: Action::Submit,
            date: "2025-03-05".into(),
        })
    }

    fn build(
        result: fn() -> Result<ExtractionRecord, ExtractError>,
        matched: bool,
        sheet_fail: bool,
    ) -> (Workflow, Arc<MockExtractor>, Arc<MockUpdater>, Arc<MockReplier>) {
        let extractor = Arc::new(MockExtractor {
            result,
            calls: Mutex::new(0),
        });
        let updater = Arc::new(MockUpdater {
            matched,
            fail: sheet_fail,
            applied: Mutex::new(Vec::new()),
        });
        let replier = Arc::new(MockReplier::default());
        let workflow = Workflow::new(
            extractor.clone(),
            updater.clone(),
            replier.clone(),
            "威威1號",
        );
        (workflow, extractor, updater, replier)
    }

    fn group_message(text: &str, mentions_bot: bool) -> IncomingMessage {
        IncomingMessage {
            text: text.into(),
            source: SourceType::Group,
            mentions_bot,
            reply_token: "rt".into(),
        }
    }

    fn direct_message(text: &str) -> IncomingMessage {
        IncomingMessage {
            text: text.into(),
            source: SourceType::User,
            mentions_bot: false,
            reply_token: "rt".into(),
        }
    }

    // -- Scenarios --------------------------------------------------------------

    #[tokio::test]
    async fn mentioned_group_message_updates_and_confirms() {
        let (workflow, _, updater, replier) = build(good_record, true, false);

        let msg = group_message("@威威1號 南區開口工程的工程預算書圖已提送，日期2025-03-05", true);
        let handled = workflow.handle(msg).await.unwrap();

        assert_eq!(handled, Handled::Replied);
        assert_eq!(updater.applied.lock().unwrap().len(), 1);

        let sent = replier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].1,
            "✅ 已更新『工程預算書圖』的提送日為 2025-03-05"
        );
    }

    #[tokio::test]
    async fn unmatched_work_item_replies_not_found() {
        let (workflow, _, _, replier) = build(good_record, false, false);

        workflow
            .handle(direct_message("威威1號 工程預算書圖已提送，日期2025-03-05"))
            .await
            .unwrap();

        let sent = replier.sent.lock().unwrap();
        assert_eq!(sent[0].1, "❌ 找不到對應的工作項目『工程預算書圖』");
    }

    #[tokio::test]
    async fn unparseable_extraction_replies_cannot_understand() {
        let (workflow, _, updater, replier) = build(
            || {
                Err(ExtractError::Unparseable {
                    reason: "not json".into(),
                })
            },
            true,
            false,
        );

        workflow
            .handle(direct_message("威威1號 呃"))
            .await
            .unwrap();

        // No sheet write attempted.
        assert!(updater.applied.lock().unwrap().is_empty());
        assert_eq!(replier.sent.lock().unwrap()[0].1, messages::CANNOT_UNDERSTAND);
    }

    #[tokio::test]
    async fn incomplete_extraction_replies_warning() {
        let (workflow, _, updater, replier) = build(
            || {
                Err(ExtractError::Incomplete {
                    missing: "日期".into(),
                })
            },
            true,
            false,
        );

        workflow
            .handle(direct_message("威威1號 預算書圖提送了"))
            .await
            .unwrap();

        assert!(updater.applied.lock().unwrap().is_empty());
        assert_eq!(replier.sent.lock().unwrap()[0].1, messages::INCOMPLETE);
    }

    #[tokio::test]
    async fn model_failure_replies_distinct_warning() {
        let (workflow, _, _, replier) = build(
            || {
                Err(ExtractError::ModelCall {
                    reason: "429 Too Many Requests".into(),
                })
            },
            true,
            false,
        );

        workflow
            .handle(direct_message("威威1號 預算書圖已提送，日期2025-03-05"))
            .await
            .unwrap();

        let sent = replier.sent.lock().unwrap();
        assert!(sent[0].1.starts_with("⚠️ 語意分析發生錯誤"));
        assert!(sent[0].1.contains("429"));
    }

    #[tokio::test]
    async fn direct_message_without_trigger_is_ignored() {
        let (workflow, extractor, _, replier) = build(good_record, true, false);

        let handled = workflow
            .handle(direct_message("預算書圖已提送，日期2025-03-05"))
            .await
            .unwrap();

        assert_eq!(handled, Handled::Ignored);
        assert_eq!(*extractor.calls.lock().unwrap(), 0);
        assert!(replier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn group_message_without_mention_is_ignored() {
        let (workflow, extractor, _, replier) = build(good_record, true, false);

        // Even the trigger token does not activate group chats; only an
        // explicit mention does.
        let handled = workflow
            .handle(group_message("威威1號 預算書圖已提送，日期2025-03-05", false))
            .await
            .unwrap();

        assert_eq!(handled, Handled::Ignored);
        assert_eq!(*extractor.calls.lock().unwrap(), 0);
        assert!(replier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn sheet_failure_propagates_without_reply() {
        let (workflow, _, _, replier) = build(good_record, true, true);

        let result = workflow
            .handle(direct_message("威威1號 預算書圖已提送，日期2025-03-05"))
            .await;

        assert!(matches!(result, Err(WorkflowError::Sheet(_))));
        assert!(replier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn applying_same_record_twice_is_idempotent() {
        let (workflow, _, updater, replier) = build(good_record, true, false);

        let msg = direct_message("威威1號 工程預算書圖已提送，日期2025-03-05");
        workflow.handle(msg.clone()).await.unwrap();
        workflow.handle(msg).await.unwrap();

        // Two identical writes, two identical confirmations: last write wins.
        let applied = updater.applied.lock().unwrap();
        assert_eq!(applied.len(), 2);
        assert_eq!(applied[0], applied[1]);

        let sent = replier.sent.lock().unwrap();
        assert_eq!(sent[0].1, sent[1].1);
    }
}

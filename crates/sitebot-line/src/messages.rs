//! User-facing reply templates.
//!
//! Every processed trigger produces exactly one reply drawn from this fixed
//! set.  Recoverable failures are surfaced to the user here rather than
//! logged-only.

use sitebot_core::{Action, UpdateOutcome};

/// Warning for a sentence missing the work item, action, or date.
pub const INCOMPLETE: &str = "⚠️ 語句不完整，請確認是否有案名／項目／日期";

/// Generic warning when the model's answer could not be understood.
pub const CANNOT_UNDERSTAND: &str = "⚠️ 無法理解這段語句，請換個說法再試一次";

/// Confirmation that a row was updated.
pub fn updated(work_item: &str, action: Action, date: &str) -> String {
    format!("✅ 已更新『{work_item}』的{}日為 {date}", action.verb())
}

/// The extracted work item matched no sheet row.
pub fn not_found(work_item: &str) -> String {
    format!("❌ 找不到對應的工作項目『{work_item}』")
}

/// The extraction model itself failed (network, auth, quota).
pub fn model_error(reason: &str) -> String {
    format!("⚠️ 語意分析發生錯誤：{reason}")
}

/// The reply for a completed sheet update attempt.
pub fn for_outcome(outcome: &UpdateOutcome) -> String {
    match outcome {
        UpdateOutcome::Matched {
            work_item,
            action,
            date,
        } => updated(work_item, *action, date),
        UpdateOutcome::NotMatched { work_item } => not_found(work_item),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updated_wording() {
        assert_eq!(
            updated("工程預算書圖", Action::Submit, "2025-03-05"),
            "✅ 已更新『工程預算書圖』的提送日為 2025-03-05"
        );
        assert_eq!(
            updated("施工計畫", Action::Approve, "2025-04-01"),
            "✅ 已更新『施工計畫』的核定日為 2025-04-01"
        );
    }

    #[test]
    fn not_found_wording() {
        assert_eq!(
            not_found("工程預算書圖"),
            "❌ 找不到對應的工作項目『工程預算書圖』"
        );
    }

    #[test]
    fn outcome_maps_to_template() {
        let matched = UpdateOutcome::Matched {
            work_item: "施工計畫".into(),
            action: Action::Approve,
            date: "2025-04-01".into(),
        };
        assert!(for_outcome(&matched).starts_with("✅"));

        let missed = UpdateOutcome::NotMatched {
            work_item: "施工計畫".into(),
        };
        assert!(for_outcome(&missed).starts_with("❌"));
    }
}

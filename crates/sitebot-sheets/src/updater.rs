//! Record matcher/updater.
//!
//! Applies an [`ExtractionRecord`] to the worksheet: re-read the whole sheet,
//! scan the rows in order, and write the date into the action's column of
//! the first row whose work-item field matches.  At most one cell is mutated
//! per invocation.

use tracing::{info, warn};

use sitebot_core::{Action, ExtractionRecord, UpdateOutcome};

use crate::client::{HEADER_ROWS, SheetSnapshot, SheetsClient};
use crate::error::{Result, SheetError};

// ---------------------------------------------------------------------------
// Column configuration
// ---------------------------------------------------------------------------

/// Names of the columns the updater touches.
#[derive(Debug, Clone)]
pub struct ColumnNames {
    /// Column holding the tracked deliverable names.
    pub work_item: String,
    /// Column receiving submission dates.
    pub submit_date: String,
    /// Column receiving approval dates.
    pub approve_date: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            work_item: "工作項目".into(),
            submit_date: "提送日".into(),
            approve_date: "核定日".into(),
        }
    }
}

impl ColumnNames {
    /// The date column written for the given action.
    pub fn date_column(&self, action: Action) -> &str {
        match action {
            Action::Submit => &self.submit_date,
            Action::Approve => &self.approve_date,
        }
    }
}

// ---------------------------------------------------------------------------
// Updater
// ---------------------------------------------------------------------------

/// Applies extracted updates to the compliance worksheet.
#[derive(Debug, Clone)]
pub struct RecordUpdater {
    sheets: SheetsClient,
    worksheet: String,
    columns: ColumnNames,
}

impl RecordUpdater {
    /// Create an updater for the given worksheet with the default columns.
    pub fn new(sheets: SheetsClient, worksheet: impl Into<String>) -> Self {
        Self {
            sheets,
            worksheet: worksheet.into(),
            columns: ColumnNames::default(),
        }
    }

    /// Apply one extracted record.
    ///
    /// Reads a full snapshot, finds the first matching row, and overwrites
    /// that row's date cell unconditionally.  A sheet read/write failure
    /// propagates; no partial state needs cleanup since only a single cell
    /// write occurs.
    pub async fn apply_update(&self, record: &ExtractionRecord) -> Result<UpdateOutcome> {
        let snapshot = self.sheets.read_all(&self.worksheet).await?;

        match find_target(&snapshot, &self.columns, record)? {
            Some((row, col)) => {
                self.sheets
                    .update_cell(&self.worksheet, row, col, &record.date)
                    .await?;
                info!(
                    work_item = %record.work_item,
                    action = %record.action,
                    date = %record.date,
                    row,
                    "sheet row updated"
                );
                Ok(UpdateOutcome::Matched {
                    work_item: record.work_item.clone(),
                    action: record.action,
                    date: record.date.clone(),
                })
            }
            None => {
                warn!(work_item = %record.work_item, "no matching sheet row");
                Ok(UpdateOutcome::NotMatched {
                    work_item: record.work_item.clone(),
                })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Locate the cell to write: 1-based (sheet row, sheet column) of the date
/// cell in the first row whose work-item field matches the record.
///
/// Matching is normalized substring containment: both sides are trimmed and
/// ASCII-lowercased before the containment check.  The project name is not
/// consulted.
pub fn find_target(
    snapshot: &SheetSnapshot,
    columns: &ColumnNames,
    record: &ExtractionRecord,
) -> Result<Option<(usize, usize)>> {
    let date_column = columns.date_column(record.action);
    let col = snapshot
        .column_index(date_column)
        .ok_or_else(|| SheetError::ColumnNotFound {
            column: date_column.to_string(),
        })?;

    let needle = normalize(&record.work_item);

    for row in &snapshot.rows {
        let Some(cell) = row.get(&columns.work_item) else {
            return Err(SheetError::ColumnNotFound {
                column: columns.work_item.clone(),
            });
        };
        if normalize(cell).contains(&needle) {
            return Ok(Some((row.index + HEADER_ROWS, col)));
        }
    }

    Ok(None)
}

/// Normalize a value for matching: trim surrounding whitespace and lowercase
/// ASCII letters (CJK text is unaffected).
fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Sheets v4 REST client.
//!
//! Two operations, matching what the bridge needs: read the whole worksheet
//! as ordered field-mappings, and overwrite a single cell by (row, column).

use serde_json::{Value, json};
use tracing::debug;

use crate::auth::TokenProvider;
use crate::error::{Result, SheetError};

/// Sheets v4 API base URL.
const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Number of header rows above the data rows.
pub const HEADER_ROWS: usize = 1;

// ---------------------------------------------------------------------------
// Snapshot types
// ---------------------------------------------------------------------------

/// One data row as an ordered column-name → cell-value mapping.
///
/// Row identity is positional: `index` is 1-based among the data rows, so
/// the corresponding spreadsheet row is `index + HEADER_ROWS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    /// 1-based position among the data rows.
    pub index: usize,
    /// Column values in header order, padded with empty strings when the
    /// API omits trailing cells.
    pub fields: Vec<(String, String)>,
}

impl SheetRow {
    /// Look up a cell value by column name.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }
}

/// A full snapshot of one worksheet: the header row plus every data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSnapshot {
    /// Column names from the header row, in sheet order.
    pub headers: Vec<String>,
    /// All data rows, in sheet order.
    pub rows: Vec<SheetRow>,
}

impl SheetSnapshot {
    /// Build a snapshot from the raw `values` grid returned by the API.
    ///
    /// The first row is the header; short data rows are padded so every row
    /// has one value per header column.
    pub fn from_values(values: Vec<Vec<String>>) -> Self {
        let mut iter = values.into_iter();
        let headers: Vec<String> = iter.next().unwrap_or_default();

        let rows = iter
            .enumerate()
            .map(|(i, mut cells)| {
                cells.resize(headers.len(), String::new());
                SheetRow {
                    index: i + 1,
                    fields: headers.iter().cloned().zip(cells).collect(),
                }
            })
            .collect();

        Self { headers, rows }
    }

    /// 1-based sheet column index of the named header, if present.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column).map(|i| i + 1)
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Authenticated handle to one spreadsheet.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    tokens: TokenProvider,
    spreadsheet_id: String,
    base_url: String,
}

impl SheetsClient {
    /// Create a client for the given spreadsheet.
    pub fn new(tokens: TokenProvider, spreadsheet_id: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| SheetError::RequestFailed {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            tokens,
            spreadsheet_id: spreadsheet_id.into(),
            base_url: SHEETS_BASE_URL.to_string(),
        })
    }

    /// Read the entire worksheet as a fresh snapshot.
    ///
    /// No caching across calls: every invocation re-reads the whole sheet.
    pub async fn read_all(&self, worksheet: &str) -> Result<SheetSnapshot> {
        let url = self.values_url(worksheet)?;
        let token = self.tokens.bearer_token(&self.http).await?;

        debug!(worksheet = worksheet, "reading worksheet snapshot");

        let resp = self
            .http
            .get(url)
            .bearer_auth(&token)
            .send()
            .await?;

        let v = check_response(resp).await?;

        let values = v
            .get("values")
            .map(parse_values_grid)
            .transpose()?
            .unwrap_or_default();

        Ok(SheetSnapshot::from_values(values))
    }

    /// Overwrite a single cell, addressed by 1-based sheet row and column.
    pub async fn update_cell(
        &self,
        worksheet: &str,
        row: usize,
        col: usize,
        value: &str,
    ) -> Result<()> {
        let range = format!("{worksheet}!{}{row}", column_letters(col));
        let mut url = self.values_url(&range)?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW");

        let token = self.tokens.bearer_token(&self.http).await?;
        let body = json!({ "values": [[value]] });

        debug!(range = %range, value = value, "updating cell");

        let resp = self
            .http
            .put(url)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;

        check_response(resp).await?;
        Ok(())
    }

    /// Build the `values/{range}` URL, percent-encoding the range segment
    /// (worksheet titles are routinely non-ASCII).
    fn values_url(&self, range: &str) -> Result<url::Url> {
        let base = format!("{}/{}/values/", self.base_url, self.spreadsheet_id);
        let parsed = url::Url::parse(&base).map_err(|e| SheetError::RequestFailed {
            reason: format!("invalid sheets url: {e}"),
        })?;
        parsed.join(&urlencode_segment(range)).map_err(|e| {
            SheetError::RequestFailed {
                reason: format!("invalid range `{range}`: {e}"),
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Percent-encode a single path segment.
fn urlencode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'!' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Convert a 1-based column index to A1 letters (1 → A, 27 → AA).
pub fn column_letters(mut col: usize) -> String {
    debug_assert!(col >= 1);
    let mut letters = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        letters.push(b'A' + rem as u8);
        col = (col - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Check the HTTP status and parse the body as JSON.
async fn check_response(resp: reqwest::Response) -> Result<Value> {
    let status = resp.status();
    let body = resp.text().await.map_err(|e| SheetError::RequestFailed {
        reason: format!("failed to read response body: {e}"),
    })?;

    if !status.is_success() {
        return Err(SheetError::Api {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| SheetError::MalformedResponse {
        reason: format!("invalid JSON: {e}"),
    })
}

/// Convert the API's `values` array into a grid of strings.
fn parse_values_grid(values: &Value) -> Result<Vec<Vec<String>>> {
    let rows = values.as_array().ok_or_else(|| SheetError::MalformedResponse {
        reason: "`values` is not an array".into(),
    })?;

    rows.iter()
        .map(|row| {
            let cells = row.as_array().ok_or_else(|| SheetError::MalformedResponse {
                reason: "row is not an array".into(),
            })?;
            Ok(cells
                .iter()
                .map(|cell| match cell {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

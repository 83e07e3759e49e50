//! Google Sheets backend for sitebot.
//!
//! Provides an authenticated handle to one worksheet of the compliance
//! spreadsheet (service-account JWT auth against the Sheets v4 REST API)
//! and the record matcher/updater that applies an extracted update to the
//! first matching row.

pub mod auth;
pub mod client;
pub mod error;
pub mod updater;

pub use auth::{ServiceAccountKey, TokenProvider};
pub use client::{SheetRow, SheetSnapshot, SheetsClient};
pub use error::{Result, SheetError};
pub use updater::{ColumnNames, RecordUpdater};

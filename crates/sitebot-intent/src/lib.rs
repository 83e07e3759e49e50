//! Intent extraction — transforms raw chat text into structured records.
//!
//! A single deterministic LLM call turns a free-form sentence like
//! 「南區開口工程的工程預算書圖已提送，日期2025-03-05」 into an
//! [`ExtractionRecord`](sitebot_core::ExtractionRecord) carrying the work
//! item, the action, and the date.
//! The model's response is decoded strictly; anything that is not a complete,
//! well-formed record surfaces as a typed failure, never a crash.

pub mod error;
pub mod extractor;

pub use error::{ExtractError, Result};
pub use extractor::IntentExtractor;

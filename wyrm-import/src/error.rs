//! Error types for wyrm-import
//!
//! Soft failures (missing enrichment, malformed optional fields) never show
//! up here; they are absorbed where they happen and the field is omitted.

use thiserror::Error;

/// Reconciliation errors
///
/// Only a caller contract violation can fail a reconciliation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    /// A required SearchHit field is empty or missing
    #[error("Search hit is missing required field: {0}")]
    MissingField(&'static str),
}

/// Bibliographic API lookup errors
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            LookupError::Parse(e.to_string())
        } else {
            LookupError::Network(e.to_string())
        }
    }
}

//! Error types for tracklore-core

use thiserror::Error;

/// Per-row normalization failures.
///
/// `BadNumeric` and `BadBoolean` fail the row; the caller decides whether to
/// drop, log, or abort. `BadTimestamp` is non-fatal: normalization converts it
/// into [`crate::types::PlayedAt::Invalid`] and keeps the row.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// A numeric column did not parse as an integer
    #[error("field {field} is not numeric: {value:?}")]
    BadNumeric { field: &'static str, value: String },

    /// A boolean column was not exactly TRUE or FALSE
    #[error("field {field} is not TRUE/FALSE: {value:?}")]
    BadBoolean { field: &'static str, value: String },

    /// The timestamp did not match `DD/MM/YY HH24:MI`
    #[error("timestamp does not match DD/MM/YY HH24:MI: {raw:?}")]
    BadTimestamp { raw: String },
}

/// Main error type for the tracklore-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Row normalization error
    #[error("normalization error: {0}")]
    Normalize(#[from] NormalizeError),

    /// Import error for an export file
    #[error("import error in {path}: {message}")]
    Import { path: String, message: String },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Requested report is not in the catalogue
    #[error("unknown report: {0}")]
    UnknownReport(String),
}

/// Result type alias for tracklore-core
pub type Result<T> = std::result::Result<T, Error>;

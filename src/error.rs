//! Error types for encode-report operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for encode-report operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while writing or reading statistics logs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The log file could neither be created nor opened for append.
    #[error("Cannot open report {path}: {source}")]
    Open {
        /// Path of the log file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Malformed row in a per-frame log.
    #[error("CSV import error at line {line}: {reason}")]
    CsvImport {
        /// Line number where the error occurred.
        line: usize,
        /// Reason for the failure.
        reason: String,
    },

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

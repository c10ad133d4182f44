//! Error types for environmental scoring

use std::path::PathBuf;
use thiserror::Error;

use crate::reading::Factor;

/// Errors raised by the scorer and its history store
#[derive(Debug, Error)]
pub enum ScoringError {
    /// A reading carried NaN or an infinite value
    #[error("{factor} reading is not a finite number: {value}")]
    NonFinite { factor: Factor, value: f64 },

    /// History file could not be read or written
    #[error("History I/O failed for {path:?}: {source}")]
    HistoryIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// History file contents were not valid JSON
    #[error("History file {path:?} is not valid JSON: {source}")]
    HistoryFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ScoringError>;

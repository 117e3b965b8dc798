//! Error types for data loaded from storage or the network
//!
//! None of these are fatal: callers log them and fall back to defaults.

use thiserror::Error;

/// Errors while decoding persisted or fetched data
#[derive(Debug, Error)]
pub enum DataError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no `questions` array in question data")]
    MissingQuestions,
    #[error("best score record is missing a finite wave/time")]
    InvalidBestScore,
}

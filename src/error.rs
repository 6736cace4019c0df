// Error types for board reconstruction

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),
    #[error("invalid snapshot json: {0}")]
    Json(#[from] serde_json::Error),
}

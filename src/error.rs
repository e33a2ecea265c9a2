use reqwest::StatusCode;
use thiserror::Error;

/// Failures of the delete stage, from building the request to reading the reply.
#[derive(Debug, Error)]
pub enum DeleteError {
    #[error("cannot parse API path '{path}': {reason}")]
    PathConstruction { path: String, reason: String },

    #[error("failed to send delete request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned invalid JSON")]
    InvalidJson,

    #[error("cannot parse the error JSON message: {0}")]
    MalformedReply(#[source] serde_json::Error),

    #[error("server rejected the request with status {status}: {reason} (code: {code}, operation: {operation_id})")]
    Rejected {
        status: StatusCode,
        code: String,
        reason: String,
        operation_id: String,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

use hm_shared_types::{PayloadError, RecordError};
use thiserror::Error;

/// Errors raised while building an envelope.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Signature verification failed: {0}")]
    Verification(String),

    #[error(transparent)]
    Encoding(#[from] PayloadError),
}

/// Errors from the validator REST API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("REST API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Errors surfaced by `HangmanClient`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("Failed to build envelope: {0}")]
    Build(#[from] BuildError),

    /// Network or HTTP failure talking to the validator. The batch is not
    /// resubmitted automatically.
    #[error("Submission failed: {0}")]
    SubmissionFailure(#[from] GatewayError),

    #[error("Failed to decode game state: {0}")]
    Decode(#[from] RecordError),
}

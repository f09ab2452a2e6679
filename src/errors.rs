use reqwest::StatusCode;

use crate::session::PendingRequest;

/// Failure of a single call to the chat backend.
///
/// The session treats every variant the same way; the distinction only
/// matters for diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("backend returned {0}")]
    Status(StatusCode),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("chat request failed: {0}")]
    SendFailed(TransportError),

    #[error("reset request failed: {0}")]
    ResetFailed(TransportError),

    #[error("a {0} request is already in flight")]
    RequestInFlight(PendingRequest),

    #[error("configuration error: {0}")]
    Config(String),
}

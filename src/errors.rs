use anyhow::Error;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error as ThisError;

/// Failures of the blob store underneath the note collection.
#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("blob store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not encode notes: {0}")]
    Encode(#[from] serde_json::Error),

    /// Keys become file names, so they are restricted to a safe alphabet.
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
}

#[derive(Debug, ThisError)]
pub enum NoteError {
    /// Title or content was blank after trimming.
    #[error("title and content must not be blank")]
    Validation,

    #[error("note not found: {0}")]
    NotFound(String),

    #[error("failed to persist notes: {0}")]
    Storage(#[from] StoreError),
}

#[derive(Debug)]
pub struct ServerError(Error);

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!(error = ?self.0, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong")
            .into_response()
    }
}

// This enables using `?` on functions that return `Result<_, anyhow::Error>`
// (or any of our own error enums) to turn them into `Result<_, ServerError>`.
impl<E> From<E> for ServerError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

use thiserror::Error;

/// Errors from a chat completions endpoint.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("completion has no content")]
    EmptyCompletion,

    #[error("parse error: {0}")]
    Parse(String),
}

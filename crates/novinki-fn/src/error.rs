use novinki_api::{ChatError, TmdbError};
use novinki_core::CoreError;
use thiserror::Error;

/// Anything that stops the function from producing a release list.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Config(#[from] CoreError),

    #[error("chat provider: {0}")]
    Chat(#[from] ChatError),

    #[error("tmdb: {0}")]
    Tmdb(#[from] TmdbError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

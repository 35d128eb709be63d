//! Upstream clients that produce [`ReleaseItem`](novinki_core::models::ReleaseItem)s.
//!
//! - [`chat`]: OpenAI-compatible chat completions (OpenAI itself, OpenRouter).
//! - [`tmdb`]: The Movie Database discover endpoints.

pub mod chat;
pub mod tmdb;
pub mod traits;

pub use chat::{ChatClient, ChatError};
pub use tmdb::{TmdbClient, TmdbError};
pub use traits::ReleaseProvider;

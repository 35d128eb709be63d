pub mod client;
pub mod error;
pub mod prompt;
pub mod types;

pub use client::ChatClient;
pub use error::ChatError;

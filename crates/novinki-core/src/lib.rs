pub mod config;
pub mod error;
pub mod genres;
pub mod http;
pub mod models;

pub use error::CoreError;

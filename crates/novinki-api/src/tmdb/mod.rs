pub mod client;
pub mod error;
pub mod types;

pub use client::{Credential, TmdbClient};
pub use error::TmdbError;

//! The release-list function and the surfaces that host it.
//!
//! [`Handler`] is the function proper: an HTTP-shaped event in, an
//! HTTP-shaped response out. [`lambda`] and [`server`] adapt it to a
//! serverless runtime and to a local HTTP listener.

pub mod cards;
pub mod error;
pub mod handler;
pub mod lambda;
pub mod provider;
pub mod server;

pub use error::HandlerError;
pub use handler::{Handler, KeySource};

//! Core types for the prompt library
//!
//! Domain types shared across the remote, storage, service and CLI crates.

pub mod constants;
mod cache;
mod credential;
mod env_config;
mod error;
mod prompt;

pub use cache::*;
pub use credential::*;
pub use env_config::*;
pub use error::*;
pub use prompt::*;

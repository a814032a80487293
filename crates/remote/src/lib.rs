//! Client side of the remote prompt store contract

pub mod client;
pub mod error;
pub mod store;


pub use client::HttpPromptStore;
pub use error::RemoteError;
pub use store::RemotePromptStore;

//! Local persistence for the prompt library
//!
//! JSON files under the application data dir: the offline prompt list
//! (stored under a single namespaced key) and the signed-in session.

mod error;
mod json_file;
mod local;
mod session;
#[cfg(test)]
mod tests;

pub use error::StorageError;
pub use local::{LocalPromptStore, generate_local_id, is_local_id};
pub use session::{SessionStore, StoredSession};

//! Service layer for the prompt library
//!
//! [`PromptLibrary`] owns the newest-first cache of a signed-in user's prompts
//! and keeps it consistent with the remote store. [`LocalPromptLibrary`] is
//! the separate offline track used when nobody is signed in.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]

mod error;
mod in_flight;
mod local_library;
mod prompt_library;
#[cfg(test)]
mod prompt_library_tests;

pub use error::{AuthFailure, PromptError, Removal};
pub use local_library::LocalPromptLibrary;
pub use prompt_library::PromptLibrary;

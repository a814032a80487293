use std::result::Result as StdResult;

use thiserror::Error;

/// Errors raised while constructing domain values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("credential must not be blank")]
    BlankCredential,
}

pub type Result<T> = StdResult<T, CoreError>;

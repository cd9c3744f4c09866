//! Error types for the todo service

use std::time::Duration;

use thiserror::Error;

use crate::types::TodoId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("todo not found: {0}")]
    NotFound(TodoId),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// A storage call outlived the request deadline and was abandoned
    #[error("storage call timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl Error {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Error::InvalidRequest(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

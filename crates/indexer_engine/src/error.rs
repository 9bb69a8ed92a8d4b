use std::path::PathBuf;

use thiserror::Error;

use crate::fetch::FetchError;

/// Result-lookup outcomes surfaced to callers. Both are non-fatal: the
/// caller may retry (`NotReady`) or submit the scan first (`NotFound`).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("no result registered for query: {0}")]
    NotFound(String),
    #[error("result is still being computed for query: {0}")]
    NotReady(String),
}

/// Rejected console arguments. Surfaced immediately, never fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("directory '{}' is already added", .0.display())]
    DuplicateDirectory(PathBuf),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Failures of the one-shot link listing exposed to the console.
#[derive(Debug, Error)]
pub enum LinksError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("engine is stopped")]
    Stopped,
}

//! Error types for placeholder evaluation.

use crate::environment::StoreError;
use std::fmt;
use std::io;

/// Errors that can occur while evaluating a template function chain.
#[derive(Debug, Clone, PartialEq)]
pub enum FnError {
    /// The argument of `get`/`g` does not split into `id, path`.
    InvalidGetParams(String),

    /// A filesystem read failed.
    Io(String),

    /// The variable store could not be read.
    Store(String),
}

impl fmt::Display for FnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FnError::InvalidGetParams(param) => {
                write!(f, "params of get from response is invalid: {}", param)
            }
            FnError::Io(msg) => write!(f, "IO error: {}", msg),
            FnError::Store(msg) => write!(f, "Store error: {}", msg),
        }
    }
}

impl std::error::Error for FnError {}

impl From<io::Error> for FnError {
    fn from(err: io::Error) -> Self {
        FnError::Io(err.to_string())
    }
}

impl From<StoreError> for FnError {
    fn from(err: StoreError) -> Self {
        FnError::Store(err.to_string())
    }
}

/// A failed text resolution.
///
/// `partial` holds the working text as it was when evaluation failed:
/// placeholders before the failing one are already substituted, the failing
/// one and everything after it are untouched. It is `None` when the engine is
/// configured to roll back on error.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveError {
    pub error: FnError,
    pub partial: Option<String>,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl From<ResolveError> for FnError {
    fn from(err: ResolveError) -> Self {
        err.error
    }
}

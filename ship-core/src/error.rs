//! Crate-level error type
//!
//! Repository operations return [`RepositoryError`](crate::repository::RepositoryError)
//! directly; [`Error`] is what application code sees once configuration
//! and repository failures meet in one place.

use thiserror::Error;

use crate::repository::{RepositoryError, RepositoryErrorKind};

/// Result type alias using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by ship-core
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Repository error, passed through unchanged
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// The repository error kind, if this wraps one
    pub fn repository_kind(&self) -> Option<RepositoryErrorKind> {
        match self {
            Self::Repository(e) => Some(e.kind),
            _ => None,
        }
    }
}

// Manual From implementation for the boxed error
impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

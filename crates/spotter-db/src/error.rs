//! Repository error taxonomy.
//!
//! Every query function returns `Result<T, RepoError>`. Callers can match
//! on the variant to decide whether to re-prompt (validation), show a
//! not-found message, or surface a generic store failure.

use thiserror::Error;

/// Errors surfaced by the plan repository.
#[derive(Debug, Error)]
pub enum RepoError {
    /// A malformed identifier was caught before any store call
    /// (empty string, the literal `"undefined"` placeholder, or a
    /// non-UUID value).
    #[error("invalid identifier: {0:?}")]
    InvalidArgument(String),

    /// Client-supplied input failed a precondition. The operation was
    /// never attempted against the store.
    #[error("{0}")]
    Validation(String),

    /// A referenced entity (plan, workout, exercise definition) is absent.
    #[error("{0} not found")]
    NotFound(String),

    /// The persistent store rejected or failed a call.
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

/// Shorthand used throughout the query modules.
pub type Result<T, E = RepoError> = std::result::Result<T, E>;

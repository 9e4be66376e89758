//! Session error types.

use rollcall_mutation::MutationError;
use rollcall_query::QueryError;
use rollcall_store::StoreError;
use thiserror::Error;

/// Errors surfaced to the presentation layer.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Mutation(#[from] MutationError),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

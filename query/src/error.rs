//! Query error types.

use rollcall_core::RecordKind;
use rollcall_store::StoreError;
use thiserror::Error;

/// Errors that can occur while querying collections.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The store could not be read.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// IO error while writing a report.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The record a listing is anchored on does not exist.
    #[error("there is no {kind} with key {key}")]
    NotFound { kind: RecordKind, key: String },
}

impl QueryError {
    pub fn not_found(kind: RecordKind, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }
}

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

//! Store error types.

use rollcall_core::RecordKind;
use thiserror::Error;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error while touching a collection file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored record could not be decoded.
    #[error("bad record in {collection}: {message}")]
    BadRecord {
        collection: &'static str,
        message: String,
    },

    /// A partial record reached the encoder.
    #[error("refusing to persist a partial {kind} record")]
    PartialRecord { kind: RecordKind },
}

impl StoreError {
    pub fn bad_record(collection: &'static str, message: impl Into<String>) -> Self {
        Self::BadRecord {
            collection,
            message: message.into(),
        }
    }

    pub fn partial_record(kind: RecordKind) -> Self {
        Self::PartialRecord { kind }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

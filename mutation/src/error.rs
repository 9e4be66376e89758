//! Mutation error types.
//!
//! Every variant is recoverable: the operation that detects one reports it
//! and does not proceed. Resource exhaustion surfaces through the store's
//! IO error, never as a process abort.

use rollcall_core::{CourseCode, InstructorId, RecordKind, StudentNumber};
use rollcall_query::QueryError;
use rollcall_store::StoreError;
use thiserror::Error;

/// Result type for mutation operations.
pub type MutationResult<T> = Result<T, MutationError>;

/// Which capacity check an enrollment ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityLimit {
    /// The student already holds the quarter's maximum number of courses.
    Courses { max: u32 },
    /// Registering would push the student past the quarter's credit maximum.
    Credits { max: u32 },
    /// The course quota has no seats left.
    Quota,
}

impl std::fmt::Display for CapacityLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CapacityLimit::Courses { max } => {
                write!(f, "course limit of {} per quarter reached", max)
            }
            CapacityLimit::Credits { max } => {
                write!(f, "credit limit of {} per quarter exceeded", max)
            }
            CapacityLimit::Quota => write!(f, "course quota exhausted"),
        }
    }
}

/// Errors that can occur during mutation execution.
#[derive(Debug, Error)]
pub enum MutationError {
    #[error("there is no {kind} with key {key}")]
    NotFound { kind: RecordKind, key: String },

    #[error("there is already a {kind} with key {key}")]
    DuplicateKey { kind: RecordKind, key: String },

    #[error("course {course} references missing instructor {instructor}")]
    ForeignKeyViolation {
        course: CourseCode,
        instructor: InstructorId,
    },

    #[error("capacity exceeded: {0}")]
    CapacityExceeded(CapacityLimit),

    #[error("student {student} already holds an active registration for {course}")]
    AlreadyActive {
        student: StudentNumber,
        course: CourseCode,
    },

    #[error("a partial {kind} record cannot be persisted")]
    IncompleteRecord { kind: RecordKind },

    #[error("update changes record kind from {expected} to {got}")]
    KindMismatch { expected: RecordKind, got: RecordKind },

    #[error("registrations are cancelled and re-created, never updated in place")]
    UnsupportedUpdate,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

impl MutationError {
    pub fn not_found(kind: RecordKind, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub fn duplicate_key(kind: RecordKind, key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            kind,
            key: key.into(),
        }
    }

    pub fn foreign_key(course: CourseCode, instructor: InstructorId) -> Self {
        Self::ForeignKeyViolation { course, instructor }
    }

    pub fn capacity(limit: CapacityLimit) -> Self {
        Self::CapacityExceeded(limit)
    }

    pub fn already_active(student: StudentNumber, course: CourseCode) -> Self {
        Self::AlreadyActive { student, course }
    }

    pub fn incomplete(kind: RecordKind) -> Self {
        Self::IncompleteRecord { kind }
    }

    pub fn kind_mismatch(expected: RecordKind, got: RecordKind) -> Self {
        Self::KindMismatch { expected, got }
    }
}

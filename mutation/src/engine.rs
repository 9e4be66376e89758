//! Mutation engine - coordinates mutation operations.
//!
//! A thin facade over the operation modules; each method is a direct
//! delegation so the cascade call chains stay ordinary nested calls on the
//! caller's thread.

use rollcall_core::{CourseCode, Record, StudentNumber};
use rollcall_store::CollectionStore;

use crate::error::MutationResult;
use crate::ops::{self, EnrollLimits};
use crate::result::{MutationOutcome, Origin};

/// Mutation engine.
pub struct MutationEngine<'s> {
    store: &'s CollectionStore,
}

impl<'s> MutationEngine<'s> {
    /// Create a new engine over `store`.
    pub fn new(store: &'s CollectionStore) -> Self {
        Self { store }
    }

    /// Add a record, enforcing key uniqueness and the course-instructor
    /// foreign key.
    pub fn add(&self, record: Record, origin: Origin) -> MutationResult<MutationOutcome> {
        ops::execute_add(self.store, record, origin)
    }

    /// Remove the record matching `probe`. Registrations are tombstoned,
    /// everything else is physically excluded.
    pub fn remove(&self, probe: &Record, origin: Origin) -> MutationResult<MutationOutcome> {
        ops::execute_remove(self.store, probe, origin)
    }

    /// Replace the record matching `target` with `new_version`.
    pub fn update(
        &self,
        target: &Record,
        new_version: Record,
        origin: Origin,
    ) -> MutationResult<MutationOutcome> {
        ops::execute_update(self.store, target, new_version, origin)
    }

    /// Register a student for a course under the quarter limits.
    pub fn enroll(
        &self,
        course: &CourseCode,
        student: StudentNumber,
        limits: EnrollLimits,
        origin: Origin,
    ) -> MutationResult<MutationOutcome> {
        ops::execute_enroll(self.store, course, student, limits, origin)
    }
}

//! Mutation provenance and outcome types.

use rollcall_core::{Record, Registration};

/// Where a mutation call came from.
///
/// Cascade-originated calls suppress their own follow-on cascades and their
/// caller-visible reporting: the triggering operation already validated the
/// preconditions and owns the success or failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Invoked by the presentation layer.
    Direct,
    /// Invoked as a sub-step of another mutation.
    Cascade,
}

impl Origin {
    /// Whether this call owns cascades and reporting.
    pub fn is_direct(&self) -> bool {
        matches!(self, Origin::Direct)
    }
}

/// Outcome of a mutation operation.
#[derive(Debug, Clone)]
pub enum MutationOutcome {
    /// A record was appended.
    Added(Record),
    /// A record was removed (or tombstoned, for registrations).
    Removed {
        record: Record,
        /// Registrations invalidated by the removal.
        cascaded_registrations: usize,
        /// Courses removed by an instructor removal.
        cascaded_courses: usize,
    },
    /// A record was replaced with a new version.
    Updated {
        record: Record,
        key_changed: bool,
        /// Registrations re-created under a changed key.
        reissued_registrations: usize,
    },
    /// A student was registered for a course.
    Enrolled(Registration),
}

impl MutationOutcome {
    /// The record the operation settled on.
    pub fn record(&self) -> Option<&Record> {
        match self {
            MutationOutcome::Added(record) => Some(record),
            MutationOutcome::Removed { record, .. } => Some(record),
            MutationOutcome::Updated { record, .. } => Some(record),
            MutationOutcome::Enrolled(_) => None,
        }
    }

    /// The created registration, if this outcome is an enrollment.
    pub fn enrolled(&self) -> Option<&Registration> {
        match self {
            MutationOutcome::Enrolled(registration) => Some(registration),
            _ => None,
        }
    }

    /// Registrations invalidated or reissued by cascades.
    pub fn cascaded_registrations(&self) -> usize {
        match self {
            MutationOutcome::Removed {
                cascaded_registrations,
                ..
            } => *cascaded_registrations,
            MutationOutcome::Updated {
                reissued_registrations,
                ..
            } => *reissued_registrations,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::{Instructor, InstructorId};

    #[test]
    fn test_outcome_accessors() {
        // GIVEN
        let record = Record::from(Instructor::new(InstructorId::new(1), "Paul", "Hegarty", "Instructor"));
        let outcome = MutationOutcome::Removed {
            record: record.clone(),
            cascaded_registrations: 3,
            cascaded_courses: 1,
        };

        // THEN
        assert_eq!(outcome.record(), Some(&record));
        assert_eq!(outcome.cascaded_registrations(), 3);
        assert!(outcome.enrolled().is_none());
    }

    #[test]
    fn test_origin_directness() {
        assert!(Origin::Direct.is_direct());
        assert!(!Origin::Cascade.is_direct());
    }
}

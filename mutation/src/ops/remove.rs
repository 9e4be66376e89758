//! Remove operation - physical exclusion and registration tombstoning.

use rollcall_core::{Record, RecordKind};
use rollcall_query::fetch_full;
use rollcall_store::{CollectionStore, Disposition};
use tracing::info;

use crate::cascade;
use crate::error::{MutationError, MutationResult};
use crate::result::{MutationOutcome, Origin};

/// Remove the record matching `probe`.
///
/// The probe is resolved to its stored form first; an absent target fails
/// with `NotFound`. Instructors, courses and students are physically
/// excluded from their collection. Registrations are never deleted: the
/// matching record has its active flag cleared and everything else kept.
/// Direct-origin removals then run the kind's cascades.
pub fn execute_remove(
    store: &CollectionStore,
    probe: &Record,
    origin: Origin,
) -> MutationResult<MutationOutcome> {
    let stored = fetch_full(store, probe)?
        .ok_or_else(|| MutationError::not_found(probe.kind(), probe.key_string()))?;

    match stored.kind() {
        RecordKind::Registration => {
            store.rewrite(RecordKind::Registration, |record| {
                match (record.key_eq(&stored), record) {
                    (true, Record::Registration(r)) => {
                        Disposition::Replace(Record::from(r.tombstoned()))
                    }
                    _ => Disposition::Keep,
                }
            })?;
        }
        kind => {
            store.rewrite(kind, |record| {
                if record.key_eq(&stored) {
                    Disposition::Drop
                } else {
                    Disposition::Keep
                }
            })?;
        }
    }

    let mut cascaded_registrations = 0;
    let mut cascaded_courses = 0;
    if origin.is_direct() {
        match &stored {
            Record::Instructor(instructor) => {
                let (courses, registrations) =
                    cascade::remove_courses_of_instructor(store, instructor)?;
                cascaded_courses = courses;
                cascaded_registrations = registrations;
            }
            Record::Course(course) => {
                cascaded_registrations = cascade::invalidate_registrations_for_course(store, course)?;
            }
            Record::Student(student) => {
                cascaded_registrations =
                    cascade::invalidate_registrations_for_student(store, student)?;
            }
            Record::Registration(registration) => {
                cascade::settle_cancelled_registration(store, registration)?;
            }
        }
        info!(
            kind = %stored.kind(),
            key = %stored.key_string(),
            cascaded_registrations,
            "removed record"
        );
    }

    Ok(MutationOutcome::Removed {
        record: stored,
        cascaded_registrations,
        cascaded_courses,
    })
}

//! Add operation - key-checked record inserts.

use rollcall_core::{Instructor, Record, Registration};
use rollcall_query::exists;
use rollcall_store::CollectionStore;
use tracing::info;

use crate::error::{MutationError, MutationResult};
use crate::result::{MutationOutcome, Origin};

/// Append `record` to its collection.
///
/// Preconditions: the record is complete, no stored record shares its
/// unique key, and a course's instructor exists. A full registration is
/// checked against the active (student, course) pair instead of its id.
pub fn execute_add(
    store: &CollectionStore,
    record: Record,
    origin: Origin,
) -> MutationResult<MutationOutcome> {
    if record.is_partial() {
        return Err(MutationError::incomplete(record.kind()));
    }

    match &record {
        Record::Registration(registration) => {
            // Uniqueness for registrations means one active record per pair.
            if let (Some(number), Some(code)) = (registration.student, registration.course.clone())
            {
                let pair = Record::from(Registration::with_pair(number, code.clone()));
                if exists(store, &pair)? {
                    return Err(MutationError::already_active(number, code));
                }
            }
        }
        _ => {
            if exists(store, &record)? {
                return Err(MutationError::duplicate_key(record.kind(), record.key_string()));
            }
        }
    }

    if let Record::Course(course) = &record {
        if let Some(id) = course.instructor {
            let probe = Record::from(Instructor::with_id(id));
            if !exists(store, &probe)? {
                return Err(MutationError::foreign_key(course.code.clone(), id));
            }
        }
    }

    store.append(&record)?;
    if origin.is_direct() {
        info!(kind = %record.kind(), key = %record.key_string(), "added record");
    }
    Ok(MutationOutcome::Added(record))
}

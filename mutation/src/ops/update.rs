//! Update operation - remove-then-add with carry-forward.

use rollcall_core::{Instructor, Record, RecordKind};
use rollcall_query::{exists, fetch_full};
use rollcall_store::CollectionStore;
use tracing::info;

use crate::cascade;
use crate::error::{MutationError, MutationResult};
use crate::result::{MutationOutcome, Origin};

/// Replace the record matching `target` with `new_version`.
///
/// The replacement is a cascade-origin remove of the stored record followed
/// by a cascade-origin add of the new one, so the new values face exactly
/// the checks a fresh insert would. Direct-origin updates carry derived
/// fields forward from the stored record (course seats taken, student
/// counters) and afterwards propagate key and credit changes to dependents.
pub fn execute_update(
    store: &CollectionStore,
    target: &Record,
    mut new_version: Record,
    origin: Origin,
) -> MutationResult<MutationOutcome> {
    if target.kind() != new_version.kind() {
        return Err(MutationError::kind_mismatch(target.kind(), new_version.kind()));
    }
    if target.kind() == RecordKind::Registration {
        return Err(MutationError::UnsupportedUpdate);
    }

    let stored = fetch_full(store, target)?
        .ok_or_else(|| MutationError::not_found(target.kind(), target.key_string()))?;

    let key_changed = !stored.key_eq(&new_version);
    if key_changed && exists(store, &new_version)? {
        return Err(MutationError::duplicate_key(
            new_version.kind(),
            new_version.key_string(),
        ));
    }
    if let Record::Course(course) = &new_version {
        match course.instructor {
            Some(id) => {
                if !exists(store, &Record::from(Instructor::with_id(id)))? {
                    return Err(MutationError::foreign_key(course.code.clone(), id));
                }
            }
            None => return Err(MutationError::incomplete(RecordKind::Course)),
        }
    }

    // Derived fields are never taken from the caller's new version; cascade
    // callers pass complete records and skip this.
    let mut credit_delta: i64 = 0;
    if origin.is_direct() {
        match (&stored, &mut new_version) {
            (Record::Course(old), Record::Course(new)) => {
                credit_delta = new.credit as i64 - old.credit as i64;
                new.quota.registered = old.quota.registered;
            }
            (Record::Student(old), Record::Student(new)) => {
                new.courses_registered = old.courses_registered;
                new.credits_taken = old.credits_taken;
            }
            _ => {}
        }
    }

    super::execute_remove(store, &stored, Origin::Cascade)?;
    super::execute_add(store, new_version.clone(), Origin::Cascade)?;

    let mut reissued = 0;
    if origin.is_direct() {
        if key_changed {
            match (&stored, &new_version) {
                (Record::Instructor(old), Record::Instructor(new)) => {
                    cascade::retarget_courses(store, old, new.id)?;
                }
                _ => {
                    reissued = cascade::reissue_registrations(store, &stored, &new_version)?;
                }
            }
        }
        if credit_delta != 0 {
            if let Record::Course(course) = &new_version {
                cascade::adjust_credits_for_course(store, &course.code, credit_delta)?;
            }
        }
        info!(
            kind = %new_version.kind(),
            key = %new_version.key_string(),
            key_changed,
            "updated record"
        );
    }

    Ok(MutationOutcome::Updated {
        record: new_version,
        key_changed,
        reissued_registrations: reissued,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{execute_add, execute_enroll, EnrollLimits};
    use rollcall_core::{
        Course, CourseCode, InstructorId, Quota, Registration, Student, StudentNumber,
    };
    use tempfile::TempDir;

    fn seeded() -> (TempDir, CollectionStore) {
        let dir = TempDir::new().unwrap();
        let store = CollectionStore::open(dir.path()).unwrap();
        let records = [
            Record::from(Instructor::new(InstructorId::new(1), "Paul", "Hegarty", "Instructor")),
            Record::from(Instructor::new(InstructorId::new(2), "John", "Guttag", "Professor")),
            Record::from(Course::new("CS193P", "Developing Apps For iOS", 4, Quota::new(0, 80), InstructorId::new(1))),
            Record::from(Student::new(StudentNumber::new(10), "Platon", "of Athens")),
        ];
        for record in records {
            execute_add(&store, record, Origin::Direct).unwrap();
        }
        execute_enroll(
            &store,
            &"CS193P".into(),
            StudentNumber::new(10),
            EnrollLimits::new(5, 10),
            Origin::Direct,
        )
        .unwrap();
        (dir, store)
    }

    fn stored_course(store: &CollectionStore, code: &str) -> Option<Course> {
        let probe = Record::from(Course::with_code(code));
        fetch_full(store, &probe).unwrap().and_then(Record::into_course)
    }

    fn stored_student(store: &CollectionStore, number: u32) -> Option<Student> {
        let probe = Record::from(Student::with_number(StudentNumber::new(number)));
        fetch_full(store, &probe).unwrap().and_then(Record::into_student)
    }

    #[test]
    fn test_update_missing_target_is_not_found() {
        let (_dir, store) = seeded();
        let target = Record::from(Student::with_number(StudentNumber::new(99)));
        let new_version = Record::from(Student::new(StudentNumber::new(99), "Nobody", "Here"));

        assert!(matches!(
            execute_update(&store, &target, new_version, Origin::Direct),
            Err(MutationError::NotFound { .. })
        ));
    }

    #[test]
    fn test_update_to_taken_key_is_a_duplicate() {
        let (_dir, store) = seeded();
        let target = Record::from(Instructor::with_id(InstructorId::new(1)));
        let new_version =
            Record::from(Instructor::new(InstructorId::new(2), "Paul", "Hegarty", "Instructor"));

        assert!(matches!(
            execute_update(&store, &target, new_version, Origin::Direct),
            Err(MutationError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn test_course_update_preserves_seats_and_checks_instructor() {
        // GIVEN a course with one seat taken
        let (_dir, store) = seeded();
        assert_eq!(stored_course(&store, "CS193P").unwrap().quota.registered, 1);

        // WHEN the caller's new version claims zero seats taken
        let target = Record::from(Course::with_code("CS193P"));
        let new_version = Record::from(Course::new(
            "CS193P",
            "Developing Apps For iOS",
            4,
            Quota::new(0, 60),
            InstructorId::new(2),
        ));
        execute_update(&store, &target, new_version, Origin::Direct).unwrap();

        // THEN the stored seat count is carried forward, not overwritten
        let course = stored_course(&store, "CS193P").unwrap();
        assert_eq!(course.quota.registered, 1);
        assert_eq!(course.quota.total, 60);
        assert_eq!(course.instructor, Some(InstructorId::new(2)));
    }

    #[test]
    fn test_course_update_with_missing_instructor_leaves_target_intact() {
        let (_dir, store) = seeded();
        let target = Record::from(Course::with_code("CS193P"));
        let new_version = Record::from(Course::new(
            "CS193P",
            "Developing Apps For iOS",
            4,
            Quota::new(0, 80),
            InstructorId::new(42),
        ));

        let result = execute_update(&store, &target, new_version, Origin::Direct);

        assert!(matches!(result, Err(MutationError::ForeignKeyViolation { .. })));
        assert!(stored_course(&store, "CS193P").is_some());
    }

    #[test]
    fn test_instructor_key_change_retargets_courses() {
        // GIVEN
        let (_dir, store) = seeded();

        // WHEN the instructor's id changes
        let target = Record::from(Instructor::with_id(InstructorId::new(1)));
        let new_version =
            Record::from(Instructor::new(InstructorId::new(7), "Paul", "Hegarty", "Instructor"));
        execute_update(&store, &target, new_version, Origin::Direct).unwrap();

        // THEN dependent courses follow
        let course = stored_course(&store, "CS193P").unwrap();
        assert_eq!(course.instructor, Some(InstructorId::new(7)));
    }

    #[test]
    fn test_student_key_change_reissues_registrations() {
        // GIVEN an active registration under the old number
        let (_dir, store) = seeded();

        // WHEN
        let target = Record::from(Student::with_number(StudentNumber::new(10)));
        let new_version = Record::from(Student::new(StudentNumber::new(20), "Platon", "of Athens"));
        let outcome = execute_update(&store, &target, new_version, Origin::Direct).unwrap();

        // THEN the old registration is a tombstone, a fresh one is active
        // under the new number, and the counters carried over
        assert!(matches!(
            outcome,
            MutationOutcome::Updated { key_changed: true, reissued_registrations: 1, .. }
        ));
        let old_pair = Record::from(Registration::with_pair(StudentNumber::new(10), "CS193P"));
        let new_pair = Record::from(Registration::with_pair(StudentNumber::new(20), "CS193P"));
        assert!(fetch_full(&store, &old_pair).unwrap().is_none());
        assert!(fetch_full(&store, &new_pair).unwrap().is_some());
        let student = stored_student(&store, 20).unwrap();
        assert_eq!(student.credits_taken, 4);
        assert_eq!(student.courses_registered, 1);
        assert!(stored_student(&store, 10).is_none());
    }

    #[test]
    fn test_course_credit_change_adjusts_registered_students() {
        // GIVEN a student carrying 4 credits from the course
        let (_dir, store) = seeded();
        assert_eq!(stored_student(&store, 10).unwrap().credits_taken, 4);

        // WHEN the course drops to 2 credits
        let target = Record::from(Course::with_code("CS193P"));
        let new_version = Record::from(Course::new(
            "CS193P",
            "Developing Apps For iOS",
            2,
            Quota::new(0, 80),
            InstructorId::new(1),
        ));
        execute_update(&store, &target, new_version, Origin::Direct).unwrap();

        // THEN the student's credits follow the delta, count unchanged
        let student = stored_student(&store, 10).unwrap();
        assert_eq!(student.credits_taken, 2);
        assert_eq!(student.courses_registered, 1);
    }

    #[test]
    fn test_registration_updates_are_rejected() {
        let (_dir, store) = seeded();
        let target = Record::from(Registration::with_pair(StudentNumber::new(10), "CS193P"));
        let new_version = Record::from(Registration::with_pair(
            StudentNumber::new(10),
            CourseCode::from("CS106A"),
        ));

        assert!(matches!(
            execute_update(&store, &target, new_version, Origin::Direct),
            Err(MutationError::UnsupportedUpdate)
        ));
    }
}

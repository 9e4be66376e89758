//! Cascade rules.
//!
//! Cascades execute as plain nested calls on the caller's thread; the
//! deepest chain is instructor -> course -> registration. Each step assumes
//! the preconditions its trigger already validated and stays silent toward
//! the original caller. Counter adjustments go through the regular update
//! path so they face the same checks as any fresh insert.

use rollcall_core::{
    Course, CourseCode, Instructor, InstructorId, Record, RecordKind, Registration, Student,
    StudentNumber,
};
use rollcall_query::{fetch_full, scan};
use rollcall_store::CollectionStore;
use tracing::{info, warn};

use crate::error::{MutationError, MutationResult};
use crate::ops::{self, EnrollLimits};
use crate::result::Origin;

/// Remove every course given by `instructor`, each through the full course
/// removal path: registrations invalidated first, then the course itself.
/// Returns (courses removed, registrations invalidated).
pub(crate) fn remove_courses_of_instructor(
    store: &CollectionStore,
    instructor: &Instructor,
) -> MutationResult<(usize, usize)> {
    let codes = courses_given_by(store, instructor.id)?;
    let mut registrations = 0;
    for code in &codes {
        let probe = Record::from(Course::with_code(code.clone()));
        if let Some(Record::Course(course)) = fetch_full(store, &probe)? {
            registrations += invalidate_registrations_for_course(store, &course)?;
            ops::execute_remove(store, &probe, Origin::Cascade)?;
        }
    }
    if !codes.is_empty() {
        info!(
            instructor = %instructor.id,
            courses = codes.len(),
            registrations,
            "cascaded instructor removal"
        );
    }
    Ok((codes.len(), registrations))
}

/// Tombstone every active registration for `course` and give each affected
/// student back the course's credits. The course is going away, so its
/// quota is left alone.
pub(crate) fn invalidate_registrations_for_course(
    store: &CollectionStore,
    course: &Course,
) -> MutationResult<usize> {
    let targets = collect_active(store, |r| r.course.as_ref() == Some(&course.code))?;
    for registration in &targets {
        tombstone(store, registration)?;
        if let Some(number) = registration.student {
            adjust_student_counters(store, number, -(course.credit as i64), -1)?;
        }
    }
    Ok(targets.len())
}

/// Tombstone every active registration of `student` and free the seat in
/// each affected course. The student is going away, so their counters are
/// left alone.
pub(crate) fn invalidate_registrations_for_student(
    store: &CollectionStore,
    student: &Student,
) -> MutationResult<usize> {
    let targets = collect_active(store, |r| r.student == Some(student.number))?;
    for registration in &targets {
        tombstone(store, registration)?;
        if let Some(code) = &registration.course {
            adjust_course_quota(store, code, -1)?;
        }
    }
    Ok(targets.len())
}

/// After a single registration is cancelled directly, give the student back
/// the course's credits and free the seat.
pub(crate) fn settle_cancelled_registration(
    store: &CollectionStore,
    registration: &Registration,
) -> MutationResult<()> {
    let Some(code) = &registration.course else {
        return Ok(());
    };
    let probe = Record::from(Course::with_code(code.clone()));
    let credit = match fetch_full(store, &probe)? {
        Some(Record::Course(course)) => course.credit,
        _ => 0,
    };
    if let Some(number) = registration.student {
        adjust_student_counters(store, number, -(credit as i64), -1)?;
    }
    adjust_course_quota(store, code, -1)?;
    Ok(())
}

/// Rewrite the instructor reference of every course `old` gives to
/// `new_id`. Returns how many courses were retargeted.
pub(crate) fn retarget_courses(
    store: &CollectionStore,
    old: &Instructor,
    new_id: InstructorId,
) -> MutationResult<usize> {
    let codes = courses_given_by(store, old.id)?;
    for code in &codes {
        let probe = Record::from(Course::with_code(code.clone()));
        if let Some(Record::Course(stored)) = fetch_full(store, &probe)? {
            let mut updated = stored.clone();
            updated.instructor = Some(new_id);
            ops::execute_update(store, &probe, Record::from(updated), Origin::Cascade)?;
        }
    }
    Ok(codes.len())
}

/// After a course code or student number change, tombstone every active
/// registration under the old key and re-create it under the new one.
///
/// Re-creation is continuity, not a fresh sign-up: the seat and the credits
/// are already accounted for, so the capacity checks are skipped and the
/// counters are not touched. The reissued registration gets a fresh id and
/// date.
pub(crate) fn reissue_registrations(
    store: &CollectionStore,
    old: &Record,
    new: &Record,
) -> MutationResult<usize> {
    let targets = match old {
        Record::Course(course) => {
            collect_active(store, |r| r.course.as_ref() == Some(&course.code))?
        }
        Record::Student(student) => collect_active(store, |r| r.student == Some(student.number))?,
        _ => return Ok(0),
    };
    let mut reissued = 0;
    for registration in &targets {
        tombstone(store, registration)?;
        let (number, code) = match new {
            Record::Course(updated) => (registration.student, Some(updated.code.clone())),
            Record::Student(updated) => (Some(updated.number), registration.course.clone()),
            _ => (None, None),
        };
        if let (Some(number), Some(code)) = (number, code) {
            match ops::execute_enroll(store, &code, number, EnrollLimits::unlimited(), Origin::Cascade)
            {
                Ok(_) => reissued += 1,
                Err(MutationError::Store(e)) => return Err(MutationError::Store(e)),
                Err(MutationError::Query(e)) => return Err(MutationError::Query(e)),
                // Best-effort: a pair already active under the new key
                // stays cancelled rather than aborting the cascade.
                Err(e) => warn!(error = %e, "skipped continuity re-registration"),
            }
        }
    }
    Ok(reissued)
}

/// After a course's credit changed by `delta`, adjust the credits of every
/// student actively registered for it. Course counts stay as they are.
pub(crate) fn adjust_credits_for_course(
    store: &CollectionStore,
    code: &CourseCode,
    delta: i64,
) -> MutationResult<usize> {
    let targets = collect_active(store, |r| r.course.as_ref() == Some(code))?;
    for registration in &targets {
        if let Some(number) = registration.student {
            adjust_student_counters(store, number, delta, 0)?;
        }
    }
    Ok(targets.len())
}

/// Apply credit and course-count deltas to a student's stored counters.
/// A student that is already mid-removal is skipped.
pub(crate) fn adjust_student_counters(
    store: &CollectionStore,
    number: StudentNumber,
    credit_delta: i64,
    count_delta: i64,
) -> MutationResult<()> {
    let probe = Record::from(Student::with_number(number));
    let Some(Record::Student(stored)) = fetch_full(store, &probe)? else {
        return Ok(());
    };
    let mut updated = stored.clone();
    updated.credits_taken = apply_delta(stored.credits_taken, credit_delta);
    updated.courses_registered = apply_delta(stored.courses_registered, count_delta);
    ops::execute_update(store, &probe, Record::from(updated), Origin::Cascade)?;
    Ok(())
}

/// Apply a seat delta to a course's registered quota. A course that is
/// already mid-removal is skipped.
pub(crate) fn adjust_course_quota(
    store: &CollectionStore,
    code: &CourseCode,
    delta: i64,
) -> MutationResult<()> {
    let probe = Record::from(Course::with_code(code.clone()));
    let Some(Record::Course(stored)) = fetch_full(store, &probe)? else {
        return Ok(());
    };
    let mut updated = stored.clone();
    updated.quota.registered = apply_delta(stored.quota.registered, delta);
    ops::execute_update(store, &probe, Record::from(updated), Origin::Cascade)?;
    Ok(())
}

fn apply_delta(value: u32, delta: i64) -> u32 {
    (value as i64 + delta).max(0) as u32
}

fn tombstone(store: &CollectionStore, registration: &Registration) -> MutationResult<()> {
    if let Some(id) = registration.id {
        ops::execute_remove(store, &Record::from(Registration::with_id(id)), Origin::Cascade)?;
    }
    Ok(())
}

fn collect_active<F>(store: &CollectionStore, mut keep: F) -> MutationResult<Vec<Registration>>
where
    F: FnMut(&Registration) -> bool,
{
    let mut out = Vec::new();
    scan::<(), _>(store, RecordKind::Registration, |record| {
        if let Record::Registration(registration) = record {
            if registration.is_active() && keep(&registration) {
                out.push(registration);
            }
        }
        None
    })?;
    Ok(out)
}

fn courses_given_by(store: &CollectionStore, id: InstructorId) -> MutationResult<Vec<CourseCode>> {
    let mut codes = Vec::new();
    scan::<(), _>(store, RecordKind::Course, |record| {
        if let Record::Course(course) = record {
            if course.instructor == Some(id) {
                codes.push(course.code);
            }
        }
        None
    })?;
    Ok(codes)
}

//! Enroll operation - registration creation under quarter limits.

use chrono::Local;
use rollcall_core::{Course, CourseCode, Record, RecordKind, Registration, Student, StudentNumber};
use rollcall_query::{exists, fetch_full};
use rollcall_store::CollectionStore;
use tracing::info;

use crate::cascade;
use crate::error::{CapacityLimit, MutationError, MutationResult};
use crate::result::{MutationOutcome, Origin};

/// Quarter limits for enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrollLimits {
    /// Maximum courses a student can register for in a quarter.
    pub max_courses: u32,
    /// Maximum credits a student can take in a quarter.
    pub max_credits: u32,
}

impl EnrollLimits {
    /// Create a limit pair.
    pub fn new(max_courses: u32, max_credits: u32) -> Self {
        Self {
            max_courses,
            max_credits,
        }
    }

    /// Limits that never bind. Used for continuity re-registration.
    pub fn unlimited() -> Self {
        Self {
            max_courses: u32::MAX,
            max_credits: u32::MAX,
        }
    }
}

/// Register `student` for `course`.
///
/// Preconditions run in order, first failure wins: course exists, student
/// exists, course count below the quarter maximum, credits within the
/// quarter maximum, quota has a seat, and no active registration for the
/// pair. Cascade-origin calls are continuity re-registrations: the seat and
/// credits are already accounted for, so the three capacity checks are
/// skipped and the counters left alone.
pub fn execute_enroll(
    store: &CollectionStore,
    course: &CourseCode,
    student: StudentNumber,
    limits: EnrollLimits,
    origin: Origin,
) -> MutationResult<MutationOutcome> {
    let course_probe = Record::from(Course::with_code(course.clone()));
    let stored_course = fetch_full(store, &course_probe)?
        .and_then(Record::into_course)
        .ok_or_else(|| MutationError::not_found(RecordKind::Course, course.to_string()))?;

    let student_probe = Record::from(Student::with_number(student));
    let stored_student = fetch_full(store, &student_probe)?
        .and_then(Record::into_student)
        .ok_or_else(|| MutationError::not_found(RecordKind::Student, student.to_string()))?;

    if origin.is_direct() {
        if stored_student.courses_registered >= limits.max_courses {
            return Err(MutationError::capacity(CapacityLimit::Courses {
                max: limits.max_courses,
            }));
        }
        let credits_after = stored_student.credits_taken as u64 + stored_course.credit as u64;
        if credits_after > limits.max_credits as u64 {
            return Err(MutationError::capacity(CapacityLimit::Credits {
                max: limits.max_credits,
            }));
        }
        if stored_course.quota.remaining() == 0 {
            return Err(MutationError::capacity(CapacityLimit::Quota));
        }
    }

    let pair = Record::from(Registration::with_pair(student, course.clone()));
    if exists(store, &pair)? {
        return Err(MutationError::already_active(student, course.clone()));
    }

    let mut registration = Registration::new(
        student,
        course.clone(),
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    );
    registration.id = Some(store.next_registration_id()?);
    store.append(&Record::from(registration.clone()))?;

    if origin.is_direct() {
        cascade::adjust_student_counters(store, student, stored_course.credit as i64, 1)?;
        cascade::adjust_course_quota(store, course, 1)?;
        info!(student = %student, course = %course, "registered student for course");
    }

    Ok(MutationOutcome::Enrolled(registration))
}

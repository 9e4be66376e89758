//! Entity structures and the Record variant.
//!
//! The four entity kinds are a closed sum: every store and engine operation
//! matches exhaustively on [`Record`] instead of dispatching through a shared
//! base. Attributes a partial record leaves absent are `Option`s, so a probe
//! built from a bare key can never be mistaken for a persisted record.

use crate::{CourseCode, InstructorId, RegistrationId, StudentNumber};

/// Quota information for a course.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quota {
    /// Seats currently taken by active registrations.
    pub registered: u32,
    /// Total seats.
    pub total: u32,
}

impl Quota {
    /// Create a quota with the given totals.
    pub fn new(registered: u32, total: u32) -> Self {
        Self { registered, total }
    }

    /// Seats still available.
    pub fn remaining(&self) -> u32 {
        self.total.saturating_sub(self.registered)
    }
}

/// An instructor record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instructor {
    /// Unique id.
    pub id: InstructorId,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub title: Option<String>,
}

impl Instructor {
    /// Create a full instructor record.
    pub fn new(
        id: InstructorId,
        name: impl Into<String>,
        surname: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: Some(name.into()),
            surname: Some(surname.into()),
            title: Some(title.into()),
        }
    }

    /// Create a partial record carrying only the id, for use as a probe.
    pub fn with_id(id: InstructorId) -> Self {
        Self {
            id,
            name: None,
            surname: None,
            title: None,
        }
    }

    /// Whether any attribute a persisted record needs is absent.
    pub fn is_partial(&self) -> bool {
        self.name.is_none() || self.surname.is_none() || self.title.is_none()
    }
}

/// A course record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    /// Unique course code.
    pub code: CourseCode,
    pub name: Option<String>,
    pub credit: u32,
    pub quota: Quota,
    /// The instructor giving this course. Absent only on probes.
    pub instructor: Option<InstructorId>,
}

impl Course {
    /// Create a full course record.
    pub fn new(
        code: impl Into<CourseCode>,
        name: impl Into<String>,
        credit: u32,
        quota: Quota,
        instructor: InstructorId,
    ) -> Self {
        Self {
            code: code.into(),
            name: Some(name.into()),
            credit,
            quota,
            instructor: Some(instructor),
        }
    }

    /// Create a partial record carrying only the code, for use as a probe.
    pub fn with_code(code: impl Into<CourseCode>) -> Self {
        Self {
            code: code.into(),
            name: None,
            credit: 0,
            quota: Quota::default(),
            instructor: None,
        }
    }

    /// Whether any attribute a persisted record needs is absent.
    pub fn is_partial(&self) -> bool {
        self.name.is_none() || self.instructor.is_none()
    }
}

/// A student record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    /// Unique student number.
    pub number: StudentNumber,
    pub name: Option<String>,
    pub surname: Option<String>,
    /// Count of currently active registrations.
    pub courses_registered: u32,
    /// Sum of credits of currently active registrations' courses.
    pub credits_taken: u32,
}

impl Student {
    /// Create a full student record with zeroed counters.
    pub fn new(
        number: StudentNumber,
        name: impl Into<String>,
        surname: impl Into<String>,
    ) -> Self {
        Self {
            number,
            name: Some(name.into()),
            surname: Some(surname.into()),
            courses_registered: 0,
            credits_taken: 0,
        }
    }

    /// Create a partial record carrying only the number, for use as a probe.
    pub fn with_number(number: StudentNumber) -> Self {
        Self {
            number,
            name: None,
            surname: None,
            courses_registered: 0,
            credits_taken: 0,
        }
    }

    /// Whether any attribute a persisted record needs is absent.
    pub fn is_partial(&self) -> bool {
        self.name.is_none() || self.surname.is_none()
    }
}

/// A registration record.
///
/// Registrations are never physically deleted: cancelling one flips
/// `still_registered` to false and the tombstone stays in the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Unique id, assigned by the store when the record is appended.
    pub id: Option<RegistrationId>,
    pub student: Option<StudentNumber>,
    pub course: Option<CourseCode>,
    pub still_registered: bool,
    /// Local timestamp of creation, `YYYY-MM-DD HH:MM:SS`.
    pub date: Option<String>,
}

impl Registration {
    /// Create a new active registration, id not yet assigned.
    pub fn new(
        student: StudentNumber,
        course: impl Into<CourseCode>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            student: Some(student),
            course: Some(course.into()),
            still_registered: true,
            date: Some(date.into()),
        }
    }

    /// Create a probe carrying only a registration id.
    pub fn with_id(id: RegistrationId) -> Self {
        Self {
            id: Some(id),
            student: None,
            course: None,
            still_registered: true,
            date: None,
        }
    }

    /// Create a probe carrying only a (student, course) pair.
    pub fn with_pair(student: StudentNumber, course: impl Into<CourseCode>) -> Self {
        Self {
            id: None,
            student: Some(student),
            course: Some(course.into()),
            still_registered: true,
            date: None,
        }
    }

    /// Whether this registration is active (not a tombstone).
    pub fn is_active(&self) -> bool {
        self.still_registered
    }

    /// A copy of this registration with the active flag cleared.
    /// All other fields are untouched.
    pub fn tombstoned(&self) -> Self {
        Self {
            still_registered: false,
            ..self.clone()
        }
    }

    /// Whether any attribute a persisted record needs is absent.
    pub fn is_partial(&self) -> bool {
        self.id.is_none()
            || self.student.is_none()
            || self.course.is_none()
            || self.date.is_none()
    }
}

/// The kind tag of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Instructor,
    Course,
    Student,
    Registration,
}

impl RecordKind {
    /// Name of the collection holding records of this kind.
    pub fn collection_name(&self) -> &'static str {
        match self {
            RecordKind::Instructor => "Instructors",
            RecordKind::Course => "Courses",
            RecordKind::Student => "Students",
            RecordKind::Registration => "Registrations",
        }
    }

    /// Number of attribute lines one encoded record of this kind occupies.
    pub fn field_count(&self) -> usize {
        match self {
            RecordKind::Instructor => 4,
            RecordKind::Course => 5,
            RecordKind::Student => 5,
            RecordKind::Registration => 5,
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RecordKind::Instructor => "instructor",
            RecordKind::Course => "course",
            RecordKind::Student => "student",
            RecordKind::Registration => "registration",
        };
        write!(f, "{}", name)
    }
}

/// A record of any kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Instructor(Instructor),
    Course(Course),
    Student(Student),
    Registration(Registration),
}

impl Record {
    /// The kind tag of this record.
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Instructor(_) => RecordKind::Instructor,
            Record::Course(_) => RecordKind::Course,
            Record::Student(_) => RecordKind::Student,
            Record::Registration(_) => RecordKind::Registration,
        }
    }

    /// Whether this record is unfit to persist as-is.
    pub fn is_partial(&self) -> bool {
        match self {
            Record::Instructor(i) => i.is_partial(),
            Record::Course(c) => c.is_partial(),
            Record::Student(s) => s.is_partial(),
            Record::Registration(r) => r.is_partial(),
        }
    }

    /// The unique key rendered for messages.
    pub fn key_string(&self) -> String {
        match self {
            Record::Instructor(i) => i.id.to_string(),
            Record::Course(c) => c.code.to_string(),
            Record::Student(s) => s.number.to_string(),
            Record::Registration(r) => match (r.id, r.student.as_ref(), r.course.as_ref()) {
                (Some(id), _, _) => id.to_string(),
                (None, Some(student), Some(course)) => format!("{}/{}", student, course),
                _ => String::from("?"),
            },
        }
    }

    /// Whether this decoded record satisfies `probe`.
    ///
    /// Integer keys compare by value and course codes by exact bytes. A
    /// registration matches only while active, either by id or by the
    /// (student, course) pair the probe carries; tombstones never match.
    pub fn matches(&self, probe: &Record) -> bool {
        match (self, probe) {
            (Record::Instructor(a), Record::Instructor(b)) => a.id == b.id,
            (Record::Course(a), Record::Course(b)) => a.code == b.code,
            (Record::Student(a), Record::Student(b)) => a.number == b.number,
            (Record::Registration(decoded), Record::Registration(probe)) => {
                if !decoded.still_registered {
                    return false;
                }
                if let Some(id) = probe.id {
                    return decoded.id == Some(id);
                }
                match (probe.student, probe.course.as_ref()) {
                    (Some(student), Some(course)) => {
                        decoded.student == Some(student)
                            && decoded.course.as_ref() == Some(course)
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }

    /// Whether two records of the same kind share a unique key, ignoring
    /// the registration active flag. Used when excluding records during a
    /// collection rewrite.
    pub fn key_eq(&self, other: &Record) -> bool {
        match (self, other) {
            (Record::Registration(a), Record::Registration(b)) => {
                a.id.is_some() && a.id == b.id
            }
            _ => self.matches(other),
        }
    }

    /// Get as an instructor, if this is one.
    pub fn as_instructor(&self) -> Option<&Instructor> {
        match self {
            Record::Instructor(i) => Some(i),
            _ => None,
        }
    }

    /// Get as a course, if this is one.
    pub fn as_course(&self) -> Option<&Course> {
        match self {
            Record::Course(c) => Some(c),
            _ => None,
        }
    }

    /// Get as a student, if this is one.
    pub fn as_student(&self) -> Option<&Student> {
        match self {
            Record::Student(s) => Some(s),
            _ => None,
        }
    }

    /// Get as a registration, if this is one.
    pub fn as_registration(&self) -> Option<&Registration> {
        match self {
            Record::Registration(r) => Some(r),
            _ => None,
        }
    }

    /// Consume into an instructor, if this is one.
    pub fn into_instructor(self) -> Option<Instructor> {
        match self {
            Record::Instructor(i) => Some(i),
            _ => None,
        }
    }

    /// Consume into a course, if this is one.
    pub fn into_course(self) -> Option<Course> {
        match self {
            Record::Course(c) => Some(c),
            _ => None,
        }
    }

    /// Consume into a student, if this is one.
    pub fn into_student(self) -> Option<Student> {
        match self {
            Record::Student(s) => Some(s),
            _ => None,
        }
    }

    /// Consume into a registration, if this is one.
    pub fn into_registration(self) -> Option<Registration> {
        match self {
            Record::Registration(r) => Some(r),
            _ => None,
        }
    }
}

impl From<Instructor> for Record {
    fn from(instructor: Instructor) -> Self {
        Record::Instructor(instructor)
    }
}

impl From<Course> for Record {
    fn from(course: Course) -> Self {
        Record::Course(course)
    }
}

impl From<Student> for Record {
    fn from(student: Student) -> Self {
        Record::Student(student)
    }
}

impl From<Registration> for Record {
    fn from(registration: Registration) -> Self {
        Record::Registration(registration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_registration(id: u32, student: u32, course: &str, active: bool) -> Record {
        Record::Registration(Registration {
            id: Some(RegistrationId::new(id)),
            student: Some(StudentNumber::new(student)),
            course: Some(CourseCode::from(course)),
            still_registered: active,
            date: Some("2020-12-25 10:30:00".to_string()),
        })
    }

    #[test]
    fn test_partial_constructors_carry_only_the_key() {
        let probe = Instructor::with_id(InstructorId::new(7));
        assert!(probe.is_partial());
        assert_eq!(probe.name, None);

        let probe = Course::with_code("CS50");
        assert!(probe.is_partial());
        assert_eq!(probe.instructor, None);

        let full = Record::from(Instructor::new(InstructorId::new(7), "Paul", "Hegarty", "Instructor"));
        assert!(!full.is_partial());
    }

    #[test]
    fn test_probe_matches_full_record_of_same_key() {
        // GIVEN
        let stored = Record::from(Course::new(
            "CS50",
            "Introduction to Computer Science",
            4,
            Quota::new(0, 300),
            InstructorId::new(4),
        ));

        // WHEN/THEN
        assert!(stored.matches(&Record::from(Course::with_code("CS50"))));
        assert!(!stored.matches(&Record::from(Course::with_code("CS193P"))));
        assert!(!stored.matches(&Record::from(Student::with_number(StudentNumber::new(1)))));
    }

    #[test]
    fn test_registration_matches_by_id_or_pair() {
        let stored = stored_registration(3, 1475, "CS50", true);

        let by_id = Record::from(Registration::with_id(RegistrationId::new(3)));
        let by_pair = Record::from(Registration::with_pair(StudentNumber::new(1475), "CS50"));
        let wrong_pair = Record::from(Registration::with_pair(StudentNumber::new(1475), "CS193P"));

        assert!(stored.matches(&by_id));
        assert!(stored.matches(&by_pair));
        assert!(!stored.matches(&wrong_pair));
    }

    #[test]
    fn test_tombstones_never_match_probes() {
        let tombstone = stored_registration(3, 1475, "CS50", false);

        assert!(!tombstone.matches(&Record::from(Registration::with_id(RegistrationId::new(3)))));
        assert!(!tombstone.matches(&Record::from(Registration::with_pair(
            StudentNumber::new(1475),
            "CS50",
        ))));
        // Key equality still sees the tombstone, so rewrites can address it.
        assert!(tombstone.key_eq(&Record::from(Registration::with_id(RegistrationId::new(3)))));
    }

    #[test]
    fn test_tombstoned_copy_preserves_other_fields() {
        // GIVEN
        let stored = stored_registration(9, 2, "6.0001", true);
        let registration = stored.as_registration().unwrap();

        // WHEN
        let tombstone = registration.tombstoned();

        // THEN
        assert!(!tombstone.is_active());
        assert_eq!(tombstone.id, registration.id);
        assert_eq!(tombstone.student, registration.student);
        assert_eq!(tombstone.course, registration.course);
        assert_eq!(tombstone.date, registration.date);
    }

    #[test]
    fn test_quota_remaining() {
        assert_eq!(Quota::new(3, 80).remaining(), 77);
        assert_eq!(Quota::new(9, 9).remaining(), 0);
    }
}

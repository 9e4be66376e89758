//! Listing scans and the roster export.
//!
//! Each listing is a scan visitor that collects rather than mutates. The
//! joins go through `fetch_full`, one probe per matching registration;
//! every query here is a full scan.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use rollcall_core::{
    Course, CourseCode, Instructor, InstructorId, Record, RecordKind, Student, StudentNumber,
};
use rollcall_store::CollectionStore;
use tracing::debug;

use crate::error::{QueryError, QueryResult};
use crate::lookup::fetch_full;
use crate::scan::scan;

/// All courses given by the instructor, in file order.
pub fn courses_by_instructor(
    store: &CollectionStore,
    id: InstructorId,
) -> QueryResult<Vec<Course>> {
    let probe = Record::from(Instructor::with_id(id));
    if fetch_full(store, &probe)?.is_none() {
        return Err(QueryError::not_found(RecordKind::Instructor, id.to_string()));
    }
    let mut courses = Vec::new();
    scan::<(), _>(store, RecordKind::Course, |record| {
        if let Record::Course(course) = record {
            if course.instructor == Some(id) {
                courses.push(course);
            }
        }
        None
    })?;
    Ok(courses)
}

/// All courses the student holds an active registration for.
pub fn courses_of_student(
    store: &CollectionStore,
    number: StudentNumber,
) -> QueryResult<Vec<Course>> {
    let probe = Record::from(Student::with_number(number));
    if fetch_full(store, &probe)?.is_none() {
        return Err(QueryError::not_found(RecordKind::Student, number.to_string()));
    }
    let mut codes = Vec::new();
    scan::<(), _>(store, RecordKind::Registration, |record| {
        if let Record::Registration(registration) = record {
            if registration.is_active() && registration.student == Some(number) {
                if let Some(code) = registration.course {
                    codes.push(code);
                }
            }
        }
        None
    })?;
    let mut courses = Vec::new();
    for code in codes {
        let probe = Record::from(Course::with_code(code));
        if let Some(Record::Course(course)) = fetch_full(store, &probe)? {
            courses.push(course);
        }
    }
    Ok(courses)
}

/// All students holding an active registration for the course.
pub fn students_in_course(
    store: &CollectionStore,
    code: &CourseCode,
) -> QueryResult<Vec<Student>> {
    let probe = Record::from(Course::with_code(code.clone()));
    if fetch_full(store, &probe)?.is_none() {
        return Err(QueryError::not_found(RecordKind::Course, code.to_string()));
    }
    let mut numbers = Vec::new();
    scan::<(), _>(store, RecordKind::Registration, |record| {
        if let Record::Registration(registration) = record {
            if registration.is_active() && registration.course.as_ref() == Some(code) {
                if let Some(number) = registration.student {
                    numbers.push(number);
                }
            }
        }
        None
    })?;
    let mut students = Vec::new();
    for number in numbers {
        let probe = Record::from(Student::with_number(number));
        if let Some(Record::Student(student)) = fetch_full(store, &probe)? {
            students.push(student);
        }
    }
    Ok(students)
}

/// Write the course's active student roster to `<CODE>_STUDENTSLIST.txt`
/// beside the collections and return the path.
pub fn export_roster(store: &CollectionStore, code: &CourseCode) -> QueryResult<PathBuf> {
    let probe = Record::from(Course::with_code(code.clone()));
    let course = match fetch_full(store, &probe)? {
        Some(Record::Course(course)) => course,
        _ => return Err(QueryError::not_found(RecordKind::Course, code.to_string())),
    };

    let path = store.root().join(format!("{}_STUDENTSLIST.txt", code));
    let mut writer = BufWriter::new(File::create(&path)?);
    writeln!(
        writer,
        "{} {} Course Students List",
        course.code,
        course.name.as_deref().unwrap_or("")
    )?;
    writeln!(writer)?;
    for student in students_in_course(store, code)? {
        writeln!(
            writer,
            "- {} {}",
            student.name.as_deref().unwrap_or(""),
            student.surname.as_deref().unwrap_or("")
        )?;
    }
    writer.flush()?;
    debug!(course = %code, path = %path.display(), "exported roster");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::{Quota, Registration, RegistrationId};
    use tempfile::TempDir;

    fn seeded() -> (TempDir, CollectionStore) {
        let dir = TempDir::new().unwrap();
        let store = CollectionStore::open(dir.path()).unwrap();

        let hegarty = Instructor::new(InstructorId::new(1), "Paul", "Hegarty", "Instructor");
        let malan = Instructor::new(InstructorId::new(4), "David", "Malan", "Professor");
        store.append(&Record::from(hegarty)).unwrap();
        store.append(&Record::from(malan)).unwrap();

        let ios = Course::new("CS193P", "Developing Apps For iOS", 4, Quota::new(0, 80), InstructorId::new(1));
        let cs50 = Course::new("CS50", "Introduction to Computer Science", 4, Quota::new(0, 300), InstructorId::new(4));
        let cs50ut = Course::new("CS50UT", "Understanding Technology", 3, Quota::new(0, 9), InstructorId::new(4));
        store.append(&Record::from(ios)).unwrap();
        store.append(&Record::from(cs50)).unwrap();
        store.append(&Record::from(cs50ut)).unwrap();

        let plato = Student::new(StudentNumber::new(1), "Platon", "of Athens");
        let aristotle = Student::new(StudentNumber::new(2), "Aristoteles", "of Athens");
        store.append(&Record::from(plato)).unwrap();
        store.append(&Record::from(aristotle)).unwrap();

        for (id, number, code, active) in [
            (0, 1, "CS50", true),
            (1, 2, "CS50", true),
            (2, 1, "CS193P", true),
            (3, 2, "CS193P", false),
        ] {
            let registration = Registration {
                id: Some(RegistrationId::new(id)),
                student: Some(StudentNumber::new(number)),
                course: Some(code.into()),
                still_registered: active,
                date: Some("2020-12-25 10:30:00".to_string()),
            };
            store.append(&Record::from(registration)).unwrap();
        }
        (dir, store)
    }

    #[test]
    fn test_courses_by_instructor() {
        let (_dir, store) = seeded();

        let courses = courses_by_instructor(&store, InstructorId::new(4)).unwrap();
        let codes: Vec<_> = courses.iter().map(|c| c.code.as_str().to_string()).collect();

        assert_eq!(codes, vec!["CS50", "CS50UT"]);
    }

    #[test]
    fn test_listing_for_unknown_anchor_is_not_found() {
        let (_dir, store) = seeded();

        assert!(matches!(
            courses_by_instructor(&store, InstructorId::new(99)),
            Err(QueryError::NotFound { .. })
        ));
        assert!(matches!(
            students_in_course(&store, &"NOPE".into()),
            Err(QueryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_courses_of_student_skips_tombstones() {
        let (_dir, store) = seeded();

        let courses = courses_of_student(&store, StudentNumber::new(2)).unwrap();
        let codes: Vec<_> = courses.iter().map(|c| c.code.as_str().to_string()).collect();

        // The CS193P registration is a tombstone and must not surface.
        assert_eq!(codes, vec!["CS50"]);
    }

    #[test]
    fn test_students_in_course() {
        let (_dir, store) = seeded();

        let students = students_in_course(&store, &"CS50".into()).unwrap();
        let numbers: Vec<_> = students.iter().map(|s| s.number.raw()).collect();

        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_export_roster_writes_header_and_active_students() {
        // GIVEN
        let (_dir, store) = seeded();

        // WHEN
        let path = export_roster(&store, &"CS50".into()).unwrap();

        // THEN
        let report = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            report,
            "CS50 Introduction to Computer Science Course Students List\n\n\
             - Platon of Athens\n\
             - Aristoteles of Athens\n"
        );
    }
}

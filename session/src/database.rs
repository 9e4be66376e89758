//! The database facade.

use std::path::{Path, PathBuf};

use rollcall_core::{Course, CourseCode, InstructorId, Record, RecordKind, Student, StudentNumber};
use rollcall_mutation::{EnrollLimits, MutationEngine, MutationOutcome, Origin};
use rollcall_query as query;
use rollcall_store::CollectionStore;

use crate::error::SessionResult;

/// A single-process handle on the enrollment collections.
///
/// The presentation layer builds full or partial [`Record`] values and calls
/// exactly the operations below; it gets back outcomes, records or typed
/// failure reasons and owns all prompting and formatting.
pub struct Database {
    store: CollectionStore,
}

impl Database {
    /// Open the collections rooted at `root`, creating the directory if
    /// needed.
    pub fn open(root: impl AsRef<Path>) -> SessionResult<Self> {
        Ok(Self {
            store: CollectionStore::open(root)?,
        })
    }

    /// The underlying store.
    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    fn engine(&self) -> MutationEngine<'_> {
        MutationEngine::new(&self.store)
    }

    /// Add a record.
    pub fn add(&self, record: Record) -> SessionResult<MutationOutcome> {
        Ok(self.engine().add(record, Origin::Direct)?)
    }

    /// Remove the record matching `probe`, cascading into dependents.
    pub fn remove(&self, probe: &Record) -> SessionResult<MutationOutcome> {
        Ok(self.engine().remove(probe, Origin::Direct)?)
    }

    /// Replace the record matching `target` with `new_version`.
    pub fn update(&self, target: &Record, new_version: Record) -> SessionResult<MutationOutcome> {
        Ok(self.engine().update(target, new_version, Origin::Direct)?)
    }

    /// Register a student for a course under the quarter limits.
    pub fn enroll(
        &self,
        course: &CourseCode,
        student: StudentNumber,
        limits: EnrollLimits,
    ) -> SessionResult<MutationOutcome> {
        Ok(self.engine().enroll(course, student, limits, Origin::Direct)?)
    }

    /// Whether a record matching `probe` is stored.
    pub fn exists(&self, probe: &Record) -> SessionResult<bool> {
        Ok(query::exists(&self.store, probe)?)
    }

    /// Fetch the stored record matching `probe`, if any.
    pub fn fetch_full(&self, probe: &Record) -> SessionResult<Option<Record>> {
        Ok(query::fetch_full(&self.store, probe)?)
    }

    /// Resolve `probe` to its stored full form, or hand it back unchanged.
    pub fn resolve(&self, probe: Record) -> SessionResult<Record> {
        Ok(query::resolve(&self.store, probe)?)
    }

    /// All courses given by the instructor.
    pub fn courses_by_instructor(&self, id: InstructorId) -> SessionResult<Vec<Course>> {
        Ok(query::courses_by_instructor(&self.store, id)?)
    }

    /// All courses the student is actively registered for.
    pub fn courses_of_student(&self, number: StudentNumber) -> SessionResult<Vec<Course>> {
        Ok(query::courses_of_student(&self.store, number)?)
    }

    /// All students actively registered for the course.
    pub fn students_in_course(&self, code: &CourseCode) -> SessionResult<Vec<Student>> {
        Ok(query::students_in_course(&self.store, code)?)
    }

    /// Write the course's roster file and return its path.
    pub fn export_roster(&self, code: &CourseCode) -> SessionResult<PathBuf> {
        Ok(query::export_roster(&self.store, code)?)
    }

    /// Number of stored records of `kind`, tombstones included.
    pub fn count(&self, kind: RecordKind) -> SessionResult<usize> {
        Ok(self.store.count(kind)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::{Instructor, Quota};
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_the_root_and_starts_empty() {
        // GIVEN
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("campus");

        // WHEN
        let db = Database::open(&root).unwrap();

        // THEN
        assert!(root.is_dir());
        assert_eq!(db.count(RecordKind::Instructor).unwrap(), 0);
    }

    #[test]
    fn test_facade_round_trip() {
        // GIVEN
        let dir = TempDir::new().unwrap();
        let db = Database::open(dir.path()).unwrap();
        db.add(Record::from(Instructor::new(InstructorId::new(1), "Paul", "Hegarty", "Instructor")))
            .unwrap();
        db.add(Record::from(Course::new(
            "CS193P",
            "Developing Apps For iOS",
            4,
            Quota::new(0, 80),
            InstructorId::new(1),
        )))
        .unwrap();

        // WHEN
        let resolved = db.resolve(Record::from(Course::with_code("CS193P"))).unwrap();

        // THEN
        assert!(!resolved.is_partial());
        assert!(db.exists(&Record::from(Instructor::with_id(InstructorId::new(1)))).unwrap());
        assert_eq!(db.courses_by_instructor(InstructorId::new(1)).unwrap().len(), 1);
    }
}

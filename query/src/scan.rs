//! The generic collection scanner.
//!
//! `scan` is the single iteration primitive: every query, removal sweep and
//! listing below is this function with a different visitor. The visitor sees
//! each decoded record in file order and either returns `None` to keep
//! scanning or `Some(value)` to stop; at most one match is ever produced per
//! call. Side effects a visitor performs are the visitor's business.

use rollcall_core::{Record, RecordKind};
use rollcall_store::CollectionStore;

use crate::error::QueryResult;

/// Scan the collection of `kind`, handing each decoded record to `visit`.
///
/// Returns the first value the visitor produces, or `None` once the
/// collection is exhausted. Ownership of each decoded record transfers to
/// the visitor.
pub fn scan<T, F>(store: &CollectionStore, kind: RecordKind, mut visit: F) -> QueryResult<Option<T>>
where
    F: FnMut(Record) -> Option<T>,
{
    for record in store.read_all(kind)? {
        if let Some(found) = visit(record?) {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::{Instructor, InstructorId};
    use tempfile::TempDir;

    fn seeded_store() -> (TempDir, CollectionStore) {
        let dir = TempDir::new().unwrap();
        let store = CollectionStore::open(dir.path()).unwrap();
        for (id, name) in [(1, "Paul"), (2, "John"), (3, "Eric")] {
            let record = Instructor::new(InstructorId::new(id), name, "Hegarty", "Instructor");
            store.append(&Record::from(record)).unwrap();
        }
        (dir, store)
    }

    #[test]
    fn test_scan_stops_at_first_match() {
        // GIVEN
        let (_dir, store) = seeded_store();
        let mut visited = 0;

        // WHEN
        let found = scan(&store, RecordKind::Instructor, |record| {
            visited += 1;
            let instructor = record.into_instructor()?;
            (instructor.id == InstructorId::new(2)).then_some(instructor)
        })
        .unwrap();

        // THEN
        assert_eq!(found.unwrap().name.as_deref(), Some("John"));
        assert_eq!(visited, 2);
    }

    #[test]
    fn test_exhausted_scan_returns_none() {
        let (_dir, store) = seeded_store();
        let mut visited = 0;

        let found: Option<()> = scan(&store, RecordKind::Instructor, |_| {
            visited += 1;
            None
        })
        .unwrap();

        assert!(found.is_none());
        assert_eq!(visited, 3);
    }

    #[test]
    fn test_scanning_missing_collection_visits_nothing() {
        let dir = TempDir::new().unwrap();
        let store = CollectionStore::open(dir.path()).unwrap();

        let found: Option<()> = scan(&store, RecordKind::Course, |_| Some(())).unwrap();
        assert!(found.is_none());
    }
}

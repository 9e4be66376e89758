//! The collection store.
//!
//! Each entity kind maps to one text file under the store root. Reads are
//! lazy, appends go straight to the end of the file, and every structural
//! change (exclusion, tombstoning, field rewrites) streams the collection
//! into a temp file that is renamed over the source once the pass
//! completes. Rename-over-existing is the closest thing to a transaction
//! boundary here; cross-file atomicity is out of scope.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Lines, Write};
use std::path::{Path, PathBuf};

use rollcall_core::{Record, RecordKind, RegistrationId};
use tracing::debug;

use crate::codec;
use crate::error::{StoreError, StoreResult};

/// What a rewrite pass does with one decoded record.
#[derive(Debug, Clone)]
pub enum Disposition {
    /// Carry the record over unchanged.
    Keep,
    /// Exclude the record from the rewritten collection.
    Drop,
    /// Carry a modified record in its place.
    Replace(Record),
}

/// File-backed store for the four record collections.
#[derive(Debug, Clone)]
pub struct CollectionStore {
    root: PathBuf,
}

impl CollectionStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The directory holding the collection files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_path(&self, kind: RecordKind) -> PathBuf {
        self.root.join(format!("{}.txt", kind.collection_name()))
    }

    fn sequence_path(&self) -> PathBuf {
        self.root.join("Registrations.seq")
    }

    /// Read every record of `kind` in file order.
    ///
    /// A missing collection is an empty one, not an error.
    pub fn read_all(&self, kind: RecordKind) -> StoreResult<RecordIter> {
        let lines = match File::open(self.collection_path(kind)) {
            Ok(file) => Some(BufReader::new(file).lines()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        Ok(RecordIter {
            kind,
            lines,
            buf: Vec::with_capacity(kind.field_count()),
        })
    }

    /// Append one record to the end of its collection.
    pub fn append(&self, record: &Record) -> StoreResult<()> {
        let block = codec::encode(record)?;
        let path = self.collection_path(record.kind());
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(block.as_bytes())?;
        file.flush()?;
        debug!(collection = record.kind().collection_name(), "appended record");
        Ok(())
    }

    /// Rewrite the whole collection, applying `f` to each record.
    ///
    /// Records are streamed into a sibling temp file which then replaces the
    /// source, so readers never observe a half-written collection. Returns
    /// how many records were dropped or replaced.
    pub fn rewrite<F>(&self, kind: RecordKind, mut f: F) -> StoreResult<usize>
    where
        F: FnMut(&Record) -> Disposition,
    {
        let path = self.collection_path(kind);
        if !path.exists() {
            return Ok(0);
        }
        let tmp = self.root.join(format!("{}.tmp", kind.collection_name()));
        let mut writer = BufWriter::new(File::create(&tmp)?);
        let mut changed = 0;
        for record in self.read_all(kind)? {
            let record = record?;
            match f(&record) {
                Disposition::Keep => writer.write_all(codec::encode(&record)?.as_bytes())?,
                Disposition::Drop => changed += 1,
                Disposition::Replace(updated) => {
                    writer.write_all(codec::encode(&updated)?.as_bytes())?;
                    changed += 1;
                }
            }
        }
        writer.flush()?;
        fs::rename(&tmp, &path)?;
        debug!(
            collection = kind.collection_name(),
            changed, "rewrote collection"
        );
        Ok(changed)
    }

    /// Number of records stored for `kind`, tombstones included.
    pub fn count(&self, kind: RecordKind) -> StoreResult<usize> {
        let mut n = 0;
        for record in self.read_all(kind)? {
            record?;
            n += 1;
        }
        Ok(n)
    }

    /// Allocate the next registration id from the persisted sequence.
    ///
    /// The sequence lives in `Registrations.seq` beside the collection and
    /// only ever moves forward. When the file is absent it is seeded from
    /// the stored record count, which matches the ids already handed out.
    pub fn next_registration_id(&self) -> StoreResult<RegistrationId> {
        let path = self.sequence_path();
        let next = match fs::read_to_string(&path) {
            Ok(text) => text.trim().parse::<u32>().map_err(|_| {
                StoreError::bad_record("Registrations", "sequence file is not a number")
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.count(RecordKind::Registration)? as u32
            }
            Err(e) => return Err(e.into()),
        };
        fs::write(&path, format!("{}\n", next + 1))?;
        Ok(RegistrationId::new(next))
    }
}

/// Lazy iterator over one collection's records.
pub struct RecordIter {
    kind: RecordKind,
    lines: Option<Lines<BufReader<File>>>,
    buf: Vec<String>,
}

impl Iterator for RecordIter {
    type Item = StoreResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let lines = self.lines.as_mut()?;
        loop {
            match lines.next() {
                Some(Ok(line)) => {
                    if line.trim().is_empty() && self.buf.is_empty() {
                        continue; // record separator
                    }
                    self.buf.push(line);
                    if self.buf.len() == self.kind.field_count() {
                        let record = codec::decode(self.kind, &self.buf);
                        self.buf.clear();
                        if record.is_err() {
                            self.lines = None;
                        }
                        return Some(record);
                    }
                }
                Some(Err(e)) => {
                    self.lines = None;
                    return Some(Err(e.into()));
                }
                None => {
                    self.lines = None;
                    if self.buf.is_empty() {
                        return None;
                    }
                    return Some(Err(StoreError::bad_record(
                        self.kind.collection_name(),
                        "collection ends mid-record",
                    )));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::{Course, Instructor, InstructorId, Quota, Registration, StudentNumber};
    use tempfile::TempDir;

    fn store() -> (TempDir, CollectionStore) {
        let dir = TempDir::new().unwrap();
        let store = CollectionStore::open(dir.path()).unwrap();
        (dir, store)
    }

    fn instructor(id: u32, name: &str) -> Record {
        Record::from(Instructor::new(InstructorId::new(id), name, "Hegarty", "Instructor"))
    }

    #[test]
    fn test_missing_collection_reads_empty() {
        // GIVEN
        let (_dir, store) = store();

        // WHEN
        let records: Vec<_> = store.read_all(RecordKind::Course).unwrap().collect();

        // THEN
        assert!(records.is_empty());
        assert_eq!(store.count(RecordKind::Course).unwrap(), 0);
    }

    #[test]
    fn test_append_then_read_back_in_order() {
        // GIVEN
        let (_dir, store) = store();
        store.append(&instructor(1, "Paul")).unwrap();
        store.append(&instructor(2, "John")).unwrap();

        // WHEN
        let records: Vec<_> = store
            .read_all(RecordKind::Instructor)
            .unwrap()
            .collect::<StoreResult<_>>()
            .unwrap();

        // THEN
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].as_instructor().unwrap().id, InstructorId::new(1));
        assert_eq!(records[1].as_instructor().unwrap().id, InstructorId::new(2));
    }

    #[test]
    fn test_append_rejects_partial_record() {
        let (_dir, store) = store();
        let probe = Record::from(Instructor::with_id(InstructorId::new(1)));

        assert!(matches!(
            store.append(&probe),
            Err(StoreError::PartialRecord { .. })
        ));
        assert_eq!(store.count(RecordKind::Instructor).unwrap(), 0);
    }

    #[test]
    fn test_rewrite_drops_exactly_the_matching_records() {
        // GIVEN
        let (_dir, store) = store();
        for id in 1..=3 {
            store.append(&instructor(id, "Paul")).unwrap();
        }

        // WHEN
        let changed = store
            .rewrite(RecordKind::Instructor, |record| {
                if record.as_instructor().unwrap().id == InstructorId::new(2) {
                    Disposition::Drop
                } else {
                    Disposition::Keep
                }
            })
            .unwrap();

        // THEN
        assert_eq!(changed, 1);
        let ids: Vec<_> = store
            .read_all(RecordKind::Instructor)
            .unwrap()
            .map(|r| r.unwrap().as_instructor().unwrap().id.raw())
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_rewrite_replaces_in_place() {
        // GIVEN
        let (_dir, store) = store();
        let registration = Registration {
            id: Some(RegistrationId::new(0)),
            student: Some(StudentNumber::new(1475)),
            course: Some("CS50".into()),
            still_registered: true,
            date: Some("2020-12-25 10:30:00".to_string()),
        };
        store.append(&Record::from(registration.clone())).unwrap();

        // WHEN
        let changed = store
            .rewrite(RecordKind::Registration, |record| {
                let r = record.as_registration().unwrap();
                Disposition::Replace(Record::from(r.tombstoned()))
            })
            .unwrap();

        // THEN
        assert_eq!(changed, 1);
        assert_eq!(store.count(RecordKind::Registration).unwrap(), 1);
        let stored: Vec<_> = store
            .read_all(RecordKind::Registration)
            .unwrap()
            .collect::<StoreResult<_>>()
            .unwrap();
        let stored = stored[0].as_registration().unwrap();
        assert!(!stored.is_active());
        assert_eq!(stored.date, registration.date);
    }

    #[test]
    fn test_rewrite_of_missing_collection_is_a_noop() {
        let (_dir, store) = store();
        let changed = store
            .rewrite(RecordKind::Student, |_| Disposition::Drop)
            .unwrap();
        assert_eq!(changed, 0);
    }

    #[test]
    fn test_registration_sequence_is_monotonic_and_persisted() {
        // GIVEN
        let (dir, store) = store();
        assert_eq!(store.next_registration_id().unwrap(), RegistrationId::new(0));
        assert_eq!(store.next_registration_id().unwrap(), RegistrationId::new(1));

        // WHEN a fresh handle opens the same root
        let reopened = CollectionStore::open(dir.path()).unwrap();

        // THEN the sequence continues where it left off
        assert_eq!(reopened.next_registration_id().unwrap(), RegistrationId::new(2));
    }

    #[test]
    fn test_registration_sequence_seeds_from_existing_records() {
        // GIVEN a collection written before the sequence file existed
        let (_dir, store) = store();
        let course = Record::from(Course::new(
            "CS50",
            "Introduction",
            4,
            Quota::new(0, 10),
            InstructorId::new(1),
        ));
        store.append(&course).unwrap();
        for id in 0..3 {
            let registration = Registration {
                id: Some(RegistrationId::new(id)),
                student: Some(StudentNumber::new(id)),
                course: Some("CS50".into()),
                still_registered: true,
                date: Some("2020-12-25 10:30:00".to_string()),
            };
            store.append(&Record::from(registration)).unwrap();
        }

        // WHEN/THEN
        assert_eq!(store.next_registration_id().unwrap(), RegistrationId::new(3));
    }
}

//! Existence checks and full-record lookup.

use rollcall_core::Record;
use rollcall_store::CollectionStore;

use crate::error::QueryResult;
use crate::scan::scan;

/// Fetch the stored record matching `probe`, if any.
///
/// The probe is usually partial; matching uses the kind's key equality, so
/// a registration probe finds only active registrations.
pub fn fetch_full(store: &CollectionStore, probe: &Record) -> QueryResult<Option<Record>> {
    scan(store, probe.kind(), |decoded| {
        if decoded.matches(probe) {
            Some(decoded)
        } else {
            None
        }
    })
}

/// Whether a record matching `probe` is stored.
pub fn exists(store: &CollectionStore, probe: &Record) -> QueryResult<bool> {
    Ok(fetch_full(store, probe)?.is_some())
}

/// Resolve `probe` to its stored full form.
///
/// When no stored record matches, the probe itself is returned unchanged; a
/// fallback, not an error. Callers that must distinguish absence from
/// success use [`exists`] or [`fetch_full`] instead.
pub fn resolve(store: &CollectionStore, probe: Record) -> QueryResult<Record> {
    match fetch_full(store, &probe)? {
        Some(full) => Ok(full),
        None => Ok(probe),
    }
}

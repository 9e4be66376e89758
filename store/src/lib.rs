//! Rollcall Collection Store
//!
//! File-backed persistence for record collections.
//!
//! Responsibilities:
//! - One labeled-line text file per entity kind, blank-line separated
//! - Lazily decoded reads, append-biased writes
//! - Whole-collection rewrites through a temp file swapped over the source
//! - The persisted registration id sequence

mod codec;
mod error;
mod store;

pub use error::{StoreError, StoreResult};
pub use store::{CollectionStore, Disposition, RecordIter};

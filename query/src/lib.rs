//! Rollcall Query Engine
//!
//! Read-side operations over the collection store:
//! - The generic scanner every domain operation specializes
//! - Existence checks and full-record lookup from partial probes
//! - Listing scans and the course roster export

mod error;
mod listing;
mod lookup;
mod scan;

pub use error::{QueryError, QueryResult};
pub use listing::{
    courses_by_instructor, courses_of_student, export_roster, students_in_course,
};
pub use lookup::{exists, fetch_full, resolve};
pub use scan::scan;

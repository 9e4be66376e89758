//! Rollcall Mutation Engine
//!
//! Write-side operations over the collection store, and the cascade rules
//! that keep derived state (credits, quotas, foreign keys) consistent when
//! a referenced record's identity or attributes change.
//!
//! The engine delegates to specialized operation modules in `ops/`:
//! - `ops/add.rs` - duplicate-key and foreign-key checked inserts
//! - `ops/remove.rs` - physical exclusion and registration tombstoning
//! - `ops/update.rs` - remove-then-add updates with carry-forward
//! - `ops/enroll.rs` - registration creation under quarter limits

mod cascade;
mod engine;
mod error;
mod ops;
mod result;

pub use engine::MutationEngine;
pub use error::{CapacityLimit, MutationError, MutationResult};
pub use ops::EnrollLimits;
pub use result::{MutationOutcome, Origin};

//! Rollcall Session
//!
//! The `Database` facade ties the store, query and mutation layers together
//! into the one surface the presentation layer talks to. It owns the
//! collection store; every operation is a direct-origin call, so cascades
//! and confirmations behave as a user-facing invocation.

mod database;
mod error;

pub use database::Database;
pub use error::{SessionError, SessionResult};

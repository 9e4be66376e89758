//! Rollcall interactive menu.
//!
//! The presentation layer: prompts, parsing and message formatting live
//! here and nowhere else. Records are built from user input and handed to
//! the session facade; whatever comes back (outcomes, records, typed
//! failures) is printed, never panicked on.

mod prompt;
mod repl;

pub use repl::Repl;

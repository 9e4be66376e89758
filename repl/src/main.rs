//! Rollcall - entry point for the enrollment menu binary.
//!
//! Collections live in the directory passed as the first argument, or the
//! current directory by default.

use std::env;
use std::process;

use rollcall_repl::Repl;
use rollcall_session::Database;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let root = env::args().nth(1).unwrap_or_else(|| ".".to_string());
    let db = match Database::open(&root) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Couldn't open the collections at '{}': {}", root, e);
            process::exit(1);
        }
    };

    let mut repl = Repl::new(db);
    if let Err(e) = repl.run() {
        eprintln!("Input error: {}", e);
        process::exit(1);
    }
}

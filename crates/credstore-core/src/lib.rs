//! credstore-core — SQLite-backed credential store
//!
//! Stores only salted PBKDF2-HMAC-SHA256 hashes; plaintext passwords never
//! touch disk or the log stream.
//!
//! # Storage strategy
//! One local SQLite file, one `credentials` table, opened via sqlx with WAL
//! journal mode and a bounded busy timeout. Writes run inside a transaction
//! so a crash mid-`add` leaves the prior record intact rather than a torn
//! one. Cross-process callers serialize through SQLite's own locking.
//!
//! # Schema
//! SQLx migrations in `migrations/` are run on open; a migration failure is
//! surfaced as [`StoreError::Integrity`], distinct from plain I/O failure,
//! so an operator can tell "needs initialization" from "disk failure".

pub mod error;
pub mod store;

mod record;

pub use error::StoreError;
pub use store::{HashParams, Store};

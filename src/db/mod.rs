//! Database persistence layer
//!
//! SQLite-backed archive store for the two entity kinds. Lookup is the dedup
//! primitive: callers check existence before inserting, and an insert of an
//! id already present fails with [`crate::Error::Duplicate`].
//!
//! ## Submodules
//!
//! Methods on [`Database`] are organized by domain:
//! - [`migrations`] — lifecycle, idempotent schema creation
//! - [`users`] — user insert/lookup/enumeration
//! - [`tracks`] — track insert/lookup/enumeration
//!
//! Full-table enumeration is exposed as explicit page cursors ([`UserPages`],
//! [`TrackPages`]) that fetch [`PAGE_SIZE`] rows at a time in id order and
//! end at the first empty page, bounding peak memory regardless of table
//! size. Each cursor starts a fresh enumeration.

use sqlx::sqlite::SqlitePool;

mod migrations;
mod tracks;
mod users;

pub use tracks::TrackPages;
pub use users::UserPages;

/// Rows fetched per page during full-table enumeration
pub const PAGE_SIZE: i64 = 25;

/// Handle to the archive database
///
/// Cheap to clone-by-reference behind an `Arc`; safe for concurrent
/// single-row inserts and lookups (rows are append-only and never updated).
#[derive(Debug)]
pub struct Database {
    pool: SqlitePool,
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

//! # scarchive
//!
//! Incremental SoundCloud account archiver.
//!
//! scarchive mirrors tracks published by a set of SoundCloud users into local
//! durable storage. Each run discovers tracks newer than the previously
//! archived frontier, streams their audio to disk, embeds ID3 tags, and
//! records metadata in a SQLite archive so that the next run is incremental.
//!
//! ## Quick Start
//!
//! ```no_run
//! use scarchive::{Archiver, Client, Config, Database};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> scarchive::Result<()> {
//!     let config = Config {
//!         client_id: "secret-client-id".to_string(),
//!         ..Default::default()
//!     };
//!
//!     let db = Arc::new(Database::new(&config.db_path).await?);
//!     let client = Arc::new(Client::new(&config)?);
//!
//!     Archiver::new(db, client, Arc::new(config)).run().await
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// SoundCloud API client: paged fetch, crawl cursors, payload download
pub mod api;
/// Archive pipeline orchestration and workers
pub mod archiver;
/// Configuration types
pub mod config;
/// Database persistence layer
pub mod db;
/// Error types
pub mod error;
/// Retry logic with exponential backoff
pub mod retry;
/// ID3 tag enrichment for downloaded tracks
pub mod tagging;
/// Core record types and identifiers
pub mod types;

// Re-export commonly used types
pub use api::Client;
pub use archiver::Archiver;
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use types::{Track, TrackId, User, UserId};

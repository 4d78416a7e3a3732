//! Configuration types
//!
//! A [`Config`] is read once at startup (the binaries populate it from CLI
//! flags and environment variables) and passed into the pipeline as plain
//! values. Every field has a sensible default except `client_id`, which the
//! remote API requires on every request.

use crate::error::{Error, Result};
use crate::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default SoundCloud API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://api.soundcloud.com";

/// Runtime configuration for an archive run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SQLite archive database file
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Base directory for downloaded track files (one subdirectory per user)
    #[serde(default = "default_archive_dir")]
    pub archive_dir: PathBuf,

    /// API credential injected into every request as `client_id`
    pub client_id: String,

    /// Base URL of the remote API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Number of concurrent discovery (track crawl) workers (default: 8)
    #[serde(default = "default_crawl_workers")]
    pub crawl_workers: usize,

    /// Number of concurrent download/archive workers (default: 4)
    #[serde(default = "default_archive_workers")]
    pub archive_workers: usize,

    /// Bounded capacity of the user queue feeding discovery (default: 25)
    #[serde(default = "default_user_queue_capacity")]
    pub user_queue_capacity: usize,

    /// Bounded capacity of the track queue feeding downloads (default: 100)
    #[serde(default = "default_track_queue_capacity")]
    pub track_queue_capacity: usize,

    /// Retry policy shared by all fetch operations
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("archive.db")
}

fn default_archive_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_crawl_workers() -> usize {
    8
}

fn default_archive_workers() -> usize {
    4
}

fn default_user_queue_capacity() -> usize {
    25
}

fn default_track_queue_capacity() -> usize {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            archive_dir: default_archive_dir(),
            client_id: String::new(),
            api_base_url: default_api_base_url(),
            crawl_workers: default_crawl_workers(),
            archive_workers: default_archive_workers(),
            user_queue_capacity: default_user_queue_capacity(),
            track_queue_capacity: default_track_queue_capacity(),
            retry: RetryConfig::default(),
        }
    }
}

impl Config {
    /// Validate the configuration, returning the first problem found
    pub fn validate(&self) -> Result<()> {
        if self.client_id.is_empty() {
            return Err(Error::Config("client_id must not be empty".to_string()));
        }
        if self.crawl_workers == 0 || self.archive_workers == 0 {
            return Err(Error::Config(
                "worker pool sizes must be at least 1".to_string(),
            ));
        }
        if self.user_queue_capacity == 0 || self.track_queue_capacity == 0 {
            return Err(Error::Config(
                "queue capacities must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

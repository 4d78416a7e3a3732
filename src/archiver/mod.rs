//! Archive pipeline orchestration
//!
//! The pipeline is a fixed two-stage topology around two bounded queues:
//!
//! ```text
//! users table -> user queue (25) -> discovery workers (8)
//!                                        | new tracks
//!                                        v
//!                                  track queue (100) -> download workers (4)
//!                                                           |
//!                                                 disk + tracks table
//! ```
//!
//! Bounded queues are the only admission control: a full track queue
//! suspends discovery, a full user queue suspends seeding. Workers share
//! nothing but the queues and the database handle. When seeding finishes the
//! user queue sender is dropped; discovery workers drain it and exit, which
//! in turn closes the track queue, so download workers drain and exit. No
//! worker is ever interrupted mid-unit.

use crate::api::Client;
use crate::config::Config;
use crate::db::Database;
use crate::error::Result;
use crate::types::{Track, User};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;

pub mod discovery;
pub mod download;

/// Shared receiving end of a bounded work queue
///
/// tokio's mpsc receiver is single-consumer; pool workers take turns on it
/// behind a mutex, which preserves FIFO delivery.
pub(crate) type SharedQueue<T> = Arc<Mutex<mpsc::Receiver<T>>>;

/// Wires the worker pools and queues for one archive run
#[derive(Debug)]
pub struct Archiver {
    db: Arc<Database>,
    client: Arc<Client>,
    config: Arc<Config>,
}

impl Archiver {
    /// Create an archiver over an open database and API client
    pub fn new(db: Arc<Database>, client: Arc<Client>, config: Arc<Config>) -> Self {
        Self { db, client, config }
    }

    /// Run one incremental archive pass to completion
    ///
    /// Seeds the user queue from the full user table, then drains discovery
    /// and downloads in order before returning.
    pub async fn run(&self) -> Result<()> {
        let (user_tx, user_rx) = mpsc::channel::<User>(self.config.user_queue_capacity);
        let user_rx: SharedQueue<User> = Arc::new(Mutex::new(user_rx));

        let (track_tx, track_rx) = mpsc::channel::<Track>(self.config.track_queue_capacity);
        let track_rx: SharedQueue<Track> = Arc::new(Mutex::new(track_rx));

        let mut crawl_workers = JoinSet::new();
        for worker_id in 0..self.config.crawl_workers {
            crawl_workers.spawn(discovery::run_worker(
                Arc::clone(&self.db),
                Arc::clone(&self.client),
                Arc::clone(&user_rx),
                track_tx.clone(),
                worker_id,
            ));
        }
        // Discovery workers hold the only track senders from here on
        drop(track_tx);

        let mut archive_workers = JoinSet::new();
        for worker_id in 0..self.config.archive_workers {
            archive_workers.spawn(download::run_worker(
                Arc::clone(&self.db),
                Arc::clone(&self.client),
                Arc::clone(&track_rx),
                self.config.archive_dir.clone(),
                worker_id,
            ));
        }

        self.seed_users(&user_tx).await;
        drop(user_tx);

        while crawl_workers.join_next().await.is_some() {}
        tracing::info!("discovery drained");
        while archive_workers.join_next().await.is_some() {}
        tracing::info!("downloads drained");

        Ok(())
    }

    /// Enumerate every archived user into the discovery queue, in id order
    async fn seed_users(&self, user_tx: &mpsc::Sender<User>) {
        let mut users = self.db.users();
        loop {
            match users.next_page().await {
                Ok(Some(page)) => {
                    for user in page {
                        if user_tx.send(user).await.is_err() {
                            tracing::error!("user queue closed early, stopping seeding");
                            return;
                        }
                    }
                }
                Ok(None) => return,
                Err(e) => {
                    tracing::error!(error = %e, "failed to enumerate users, stopping seeding");
                    return;
                }
            }
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

//! Discovery workers: find tracks newer than the archived frontier.

use crate::api::Client;
use crate::db::Database;
use crate::types::{Track, User};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::SharedQueue;

/// Pull users off the shared queue until it is drained and closed
pub(crate) async fn run_worker(
    db: Arc<Database>,
    client: Arc<Client>,
    users: SharedQueue<User>,
    tracks: mpsc::Sender<Track>,
    worker_id: usize,
) {
    loop {
        let user = { users.lock().await.recv().await };
        let Some(user) = user else { break };

        let new_tracks = discover_new_tracks(&db, &client, &user, &tracks).await;
        tracing::info!(
            user_id = %user.id,
            new_tracks = new_tracks,
            worker_id = worker_id,
            "finished crawling new tracks for user"
        );
    }
}

/// Crawl one user's tracks newest-first, forwarding unseen ones for download
///
/// Stops at the first track already present in the archive: tracks arrive
/// newest-first, so everything older than a hit is assumed archived. This is
/// what makes a re-run touch only the first page(s) of each user. Failures
/// (store lookup, closed queue) stop this user's crawl without affecting
/// other workers. Returns the number of tracks forwarded.
pub(crate) async fn discover_new_tracks(
    db: &Database,
    client: &Client,
    user: &User,
    tracks: &mpsc::Sender<Track>,
) -> u64 {
    tracing::info!(user_id = %user.id, "crawling new tracks for user");

    let mut crawl = client.user_tracks(user.id);
    let mut new_tracks = 0;

    while let Some(track) = crawl.next().await {
        match db.find_track(track.id).await {
            Ok(Some(_)) => break, // frontier reached
            Ok(None) => {}
            Err(e) => {
                tracing::error!(user_id = %user.id, track_id = %track.id, error = %e, "frontier lookup failed, stopping crawl for user");
                break;
            }
        }

        if tracks.send(track).await.is_err() {
            tracing::error!(user_id = %user.id, "track queue closed, stopping crawl for user");
            break;
        }
        new_tracks += 1;
    }

    new_tracks
}

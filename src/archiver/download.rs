//! Download workers: payload retrieval, enrichment, and persistence.

use crate::api::Client;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::tagging;
use crate::types::Track;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::SharedQueue;

/// Pull tracks off the shared queue until it is drained and closed
///
/// A track is persisted only after its payload is on disk, so a failure at
/// any step leaves the track unarchived and eligible for the next run; no
/// partial record is ever stored.
pub(crate) async fn run_worker(
    db: Arc<Database>,
    client: Arc<Client>,
    tracks: SharedQueue<Track>,
    base_dir: PathBuf,
    worker_id: usize,
) {
    loop {
        let track = { tracks.lock().await.recv().await };
        let Some(mut track) = track else { break };

        let track_file = match download_track(&client, &track, &base_dir).await {
            Ok(Some(path)) => path,
            Ok(None) => continue, // metadata-only, retried next run
            Err(e) => {
                tracing::warn!(
                    user_id = %track.user_id,
                    track_id = %track.id,
                    error = %e,
                    "failed to download track, skipping persistence"
                );
                continue;
            }
        };

        // Enrichment failures degrade the file, never the record
        if let Err(e) = tagging::tag_track_file(&client, &track_file, &track).await {
            tracing::warn!(
                user_id = %track.user_id,
                track_id = %track.id,
                uri = %track_file.display(),
                error = %e,
                "failed to tag track file"
            );
        }

        track.uri = Some(track_file.display().to_string());
        match db.add_track(&track).await {
            Ok(_) => tracing::info!(
                user_id = %track.user_id,
                track_id = %track.id,
                worker_id = worker_id,
                "archived track"
            ),
            Err(Error::Duplicate(_)) => tracing::warn!(
                user_id = %track.user_id,
                track_id = %track.id,
                "track archived concurrently by another worker"
            ),
            Err(e) => tracing::error!(
                user_id = %track.user_id,
                track_id = %track.id,
                error = %e,
                "failed to persist track"
            ),
        }
    }
}

/// Stream a track's payload to its deterministic storage path
///
/// Tracks land at `<base_dir>/<user_id>/<track_id>.mp3`. Returns `Ok(None)`
/// without fetching anything when the track is neither downloadable nor
/// streamable.
pub(crate) async fn download_track(
    client: &Client,
    track: &Track,
    base_dir: &Path,
) -> Result<Option<PathBuf>> {
    if !track.is_retrievable() {
        tracing::warn!(
            user_id = %track.user_id,
            track_id = %track.id,
            is_downloadable = track.is_downloadable,
            is_streamable = track.is_streamable,
            "track not retrievable"
        );
        return Ok(None);
    }

    let user_dir = base_dir.join(track.user_id.to_string());
    tokio::fs::create_dir_all(&user_dir).await?;

    let track_file = user_dir.join(format!("{}.mp3", track.id));
    client.save_track_to_file(track, &track_file).await?;

    Ok(Some(track_file))
}

//! Track insert, lookup, and paged enumeration.

use crate::error::Result;
use crate::types::{Track, TrackId, UserId};

use super::users::duplicate_or;
use super::{Database, PAGE_SIZE};

const TRACK_COLUMNS: &str = "id, permalink, user_id, username, title, uri, artwork_url, is_downloadable, is_streamable";

impl Database {
    /// Insert a track, failing with [`crate::Error::Duplicate`] if the id exists
    ///
    /// Callers persist a track only after its payload is on disk, so rows in
    /// this table always describe fully archived tracks. The insert is
    /// durably committed before this returns.
    pub async fn add_track(&self, track: &Track) -> Result<TrackId> {
        sqlx::query(
            r#"
            INSERT INTO tracks (id, permalink, user_id, username, title, uri, artwork_url, is_downloadable, is_streamable)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(track.id)
        .bind(&track.permalink)
        .bind(track.user_id)
        .bind(&track.username)
        .bind(&track.title)
        .bind(&track.uri)
        .bind(&track.artwork_url)
        .bind(track.is_downloadable)
        .bind(track.is_streamable)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_or(e, || format!("track {}", track.id)))?;

        Ok(track.id)
    }

    /// Look up a track by id
    ///
    /// This is the discovery frontier check: a hit means the track and
    /// everything older than it is already archived.
    pub async fn find_track(&self, id: TrackId) -> Result<Option<Track>> {
        let row = sqlx::query_as::<_, Track>(&format!(
            "SELECT {TRACK_COLUMNS} FROM tracks WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// One page of tracks in ascending id order (zero-based page number)
    pub async fn list_tracks_page(&self, page: i64) -> Result<Vec<Track>> {
        let rows = sqlx::query_as::<_, Track>(&format!(
            "SELECT {TRACK_COLUMNS} FROM tracks ORDER BY id LIMIT ? OFFSET ?"
        ))
        .bind(PAGE_SIZE)
        .bind(PAGE_SIZE * page)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// One page of a single user's tracks in ascending id order
    pub async fn list_user_tracks_page(&self, user_id: UserId, page: i64) -> Result<Vec<Track>> {
        let rows = sqlx::query_as::<_, Track>(&format!(
            "SELECT {TRACK_COLUMNS} FROM tracks WHERE user_id = ? ORDER BY id LIMIT ? OFFSET ?"
        ))
        .bind(user_id)
        .bind(PAGE_SIZE)
        .bind(PAGE_SIZE * page)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Cursor over all tracks, one page at a time, starting from the beginning
    pub fn tracks(&self) -> TrackPages<'_> {
        TrackPages {
            db: self,
            user: None,
            page: 0,
            done: false,
        }
    }

    /// Cursor over one user's tracks, one page at a time
    pub fn tracks_for_user(&self, user_id: UserId) -> TrackPages<'_> {
        TrackPages {
            db: self,
            user: Some(user_id),
            page: 0,
            done: false,
        }
    }
}

/// Page cursor over the tracks table in ascending id order
///
/// Optionally filtered to a single owning user. Enumeration ends at the
/// first empty page; each cursor starts a fresh enumeration.
#[derive(Debug)]
pub struct TrackPages<'a> {
    db: &'a Database,
    user: Option<UserId>,
    page: i64,
    done: bool,
}

impl TrackPages<'_> {
    /// Fetch the next page, or `None` when the enumeration is exhausted
    pub async fn next_page(&mut self) -> Result<Option<Vec<Track>>> {
        if self.done {
            return Ok(None);
        }
        let rows = match self.user {
            Some(user_id) => self.db.list_user_tracks_page(user_id, self.page).await?,
            None => self.db.list_tracks_page(self.page).await?,
        };
        if rows.is_empty() {
            self.done = true;
            return Ok(None);
        }
        self.page += 1;
        Ok(Some(rows))
    }
}

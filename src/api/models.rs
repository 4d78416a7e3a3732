//! Wire shapes for the subset of API fields the archiver reads.
//!
//! Response items are discriminated by a `kind` tag; only `"user"` and
//! `"track"` are recognized. Everything else in an item object is ignored.

use crate::types::{Track, TrackId, User, UserId};
use serde::Deserialize;
use serde_json::Value;

/// `kind` tag for user items
pub(crate) const KIND_USER: &str = "user";
/// `kind` tag for track items
pub(crate) const KIND_TRACK: &str = "track";

/// Discriminant tag of a raw collection item, if present
pub(crate) fn item_kind(item: &Value) -> Option<&str> {
    item.get("kind")?.as_str()
}

/// User object as returned by the API
#[derive(Debug, Deserialize)]
pub(crate) struct ApiUser {
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl From<ApiUser> for User {
    fn from(u: ApiUser) -> Self {
        User {
            id: UserId(u.id),
            username: u.username,
            permalink: u.permalink,
            avatar_url: u.avatar_url,
        }
    }
}

/// Track object as returned by the API, with its embedded owner
#[derive(Debug, Deserialize)]
pub(crate) struct ApiTrack {
    pub id: i64,
    #[serde(default)]
    pub permalink_url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artwork_url: Option<String>,
    #[serde(default)]
    pub downloadable: bool,
    #[serde(default)]
    pub streamable: bool,
    pub user: ApiUser,
}

impl From<ApiTrack> for Track {
    fn from(t: ApiTrack) -> Self {
        Track {
            id: TrackId(t.id),
            permalink: t.permalink_url,
            user_id: UserId(t.user.id),
            username: t.user.username,
            title: t.title,
            uri: None,
            artwork_url: t.artwork_url,
            is_downloadable: t.downloadable,
            is_streamable: t.streamable,
        }
    }
}

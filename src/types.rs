//! Core record types and identifiers
//!
//! [`User`] and [`Track`] are the two archived entity kinds. In-memory values
//! produced by the crawler are transient and move between workers through the
//! queues; the database owns all persisted state.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Unique identifier for a user (assigned by the remote system)
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub i64);

/// Unique identifier for a track (assigned by the remote system)
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TrackId(pub i64);

macro_rules! id_impls {
    ($name:ident) => {
        impl $name {
            /// Get the inner i64 value
            pub fn get(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        // sqlx Type, Encode, and Decode so ids bind and decode as INTEGER
        impl sqlx::Type<sqlx::Sqlite> for $name {
            fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
                <i64 as sqlx::Type<sqlx::Sqlite>>::type_info()
            }

            fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
                <i64 as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
            }
        }

        impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
            ) -> Result<sqlx::encode::IsNull, Box<dyn std::error::Error + Send + Sync>>
            {
                sqlx::Encode::<sqlx::Sqlite>::encode_by_ref(&self.0, buf)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for $name {
            fn decode(
                value: sqlx::sqlite::SqliteValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let id = <i64 as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
                Ok(Self(id))
            }
        }
    };
}

id_impls!(UserId);
id_impls!(TrackId);

/// An archived user (account whose tracks are mirrored)
///
/// Never mutated or deleted after insertion.
#[derive(Clone, Debug, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct User {
    /// Remote-assigned user id (primary key)
    pub id: UserId,
    /// Display name
    pub username: String,
    /// URL-safe handle
    pub permalink: String,
    /// Avatar image URL, if the user has one
    pub avatar_url: Option<String>,
}

/// An archived track and its capture-time metadata
///
/// `uri` is the local storage locator. It is `None` until the audio payload
/// has been written to disk; a track is only persisted once `uri` is set, so
/// presence in the database means fully archived, not merely seen.
#[derive(Clone, Debug, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Track {
    /// Remote-assigned track id (primary key)
    pub id: TrackId,
    /// Canonical permalink URL
    pub permalink: String,
    /// Owning user id
    pub user_id: UserId,
    /// Owning user's display name, denormalized at capture time
    pub username: String,
    /// Track title
    pub title: String,
    /// Local storage locator, set by the download step
    pub uri: Option<String>,
    /// Artwork image URL, if the track has one
    pub artwork_url: Option<String>,
    /// Whether the remote API offers a download endpoint for this track
    pub is_downloadable: bool,
    /// Whether the remote API offers a stream endpoint for this track
    pub is_streamable: bool,
}

impl Track {
    /// True if the track has a payload endpoint worth fetching
    ///
    /// A track with neither flag set is processed as metadata-only: no fetch
    /// is attempted and the record is not persisted, leaving it eligible for
    /// re-processing on a later run.
    pub fn is_retrievable(&self) -> bool {
        self.is_downloadable || self.is_streamable
    }
}


use crate::types::{Track, TrackId, User, UserId};

pub(super) fn make_test_user(x: i64) -> User {
    User {
        id: UserId(x),
        username: format!("fake user {}", x),
        permalink: format!("fake-user-{}", x),
        avatar_url: Some(format!("https://soundcloud.com/{}/avatar.jpg", x)),
    }
}

pub(super) fn make_test_track(x: i64, user_id: i64) -> Track {
    Track {
        id: TrackId(x),
        permalink: format!("https://soundcloud.com/{}/{}", user_id, x),
        user_id: UserId(user_id),
        username: format!("fake user {}", user_id),
        title: format!("fake track {}", x),
        uri: None,
        artwork_url: Some(format!("https://soundcloud.com/{}/artwork.jpg", x)),
        is_downloadable: false,
        is_streamable: true,
    }
}

use crate::api::Client;
use crate::config::Config;
use crate::retry::RetryConfig;
use crate::types::{Track, TrackId, UserId};
use serde_json::json;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> Client {
    let config = Config {
        client_id: "test-client-id".to_string(),
        api_base_url: server.uri(),
        retry: RetryConfig {
            initial_delay: Duration::from_millis(10),
            ..Default::default()
        },
        ..Default::default()
    };
    Client::new(&config).unwrap()
}

fn track_item(id: i64, user_id: i64) -> serde_json::Value {
    json!({
        "kind": "track",
        "id": id,
        "permalink_url": format!("https://soundcloud.com/u{}/t{}", user_id, id),
        "title": format!("track {}", id),
        "artwork_url": null,
        "downloadable": true,
        "streamable": true,
        "user": {"kind": "user", "id": user_id, "username": format!("user {}", user_id), "permalink": format!("u{}", user_id)}
    })
}

#[tokio::test]
async fn test_fetch_json_injects_credential_param() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/resolve"))
        .and(query_param("client_id", "test-client-id"))
        .and(query_param("url", "https://soundcloud.com/someone"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "user", "id": 7, "username": "someone", "permalink": "someone",
            "avatar_url": "https://i1.sndcdn.com/avatars-7.jpg"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let user = client
        .resolve_user("https://soundcloud.com/someone")
        .await
        .unwrap();
    assert_eq!(user.id, UserId(7));
    assert_eq!(user.username, "someone");
    assert_eq!(
        user.avatar_url.as_deref(),
        Some("https://i1.sndcdn.com/avatars-7.jpg")
    );
}

#[tokio::test]
async fn test_fetch_json_retries_exactly_three_times_with_backoff() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/resolve"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let start = Instant::now();
    let result = client.resolve_user("https://soundcloud.com/x").await;
    assert!(result.is_err());

    // Backoff ladder at 10ms initial delay: 10 + 20 + 40
    assert!(
        start.elapsed() >= Duration::from_millis(70),
        "elapsed {:?}",
        start.elapsed()
    );
}

#[tokio::test]
async fn test_crawl_follows_next_href_and_filters_kinds() {
    let server = MockServer::start().await;
    let page2_url = format!("{}/page2", server.uri());

    Mock::given(method("GET"))
        .and(path("/users/1/tracks"))
        .and(query_param("limit", "25"))
        .and(query_param("linked_partitioning", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collection": [
                track_item(5, 1),
                {"kind": "playlist", "id": 900},
                track_item(4, 1),
            ],
            "next_href": page2_url
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collection": [track_item(3, 1)],
            "next_href": null
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut crawl = client.user_tracks(UserId(1));
    let mut seen = Vec::new();
    while let Some(track) = crawl.next().await {
        seen.push(track.id);
    }
    assert_eq!(seen, vec![TrackId(5), TrackId(4), TrackId(3)]);
}

#[tokio::test]
async fn test_crawl_ends_on_malformed_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/1/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "nope"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut crawl = client.user_tracks(UserId(1));
    assert!(crawl.next().await.is_none());
}

#[tokio::test]
async fn test_followings_crawl_yields_users() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/9/followings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collection": [
                {"kind": "user", "id": 11, "username": "a", "permalink": "a", "avatar_url": null},
                {"kind": "track", "id": 12},
                {"kind": "user", "id": 13, "username": "b", "permalink": "b"},
            ],
            "next_href": null
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut crawl = client.user_followings(UserId(9));
    let mut seen = Vec::new();
    while let Some(user) = crawl.next().await {
        seen.push(user.id);
    }
    assert_eq!(seen, vec![UserId(11), UserId(13)]);
}

fn retrievable_track(id: i64, user_id: i64) -> Track {
    Track {
        id: TrackId(id),
        permalink: format!("https://soundcloud.com/u{}/t{}", user_id, id),
        user_id: UserId(user_id),
        username: format!("user {}", user_id),
        title: format!("track {}", id),
        uri: None,
        artwork_url: None,
        is_downloadable: true,
        is_streamable: true,
    }
}

#[tokio::test]
async fn test_save_track_streams_payload_to_disk() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tracks/5/download"))
        .and(query_param("client_id", "test-client-id"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"fake mp3 bytes".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("5.mp3");
    client
        .save_track_to_file(&retrievable_track(5, 1), &dest)
        .await
        .unwrap();

    assert_eq!(std::fs::read(&dest).unwrap(), b"fake mp3 bytes");
}

#[tokio::test]
async fn test_save_track_uses_stream_endpoint_when_not_downloadable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tracks/6/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"streamed".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let track = Track {
        is_downloadable: false,
        ..retrievable_track(6, 1)
    };
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("6.mp3");
    client.save_track_to_file(&track, &dest).await.unwrap();

    assert_eq!(std::fs::read(&dest).unwrap(), b"streamed");
}

#[tokio::test]
async fn test_save_track_retries_transient_failure_then_succeeds() {
    let server = MockServer::start().await;
    // First attempt fails, second succeeds
    Mock::given(method("GET"))
        .and(path("/tracks/5/download"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tracks/5/download"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"second try".to_vec()))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("5.mp3");
    client
        .save_track_to_file(&retrievable_track(5, 1), &dest)
        .await
        .unwrap();

    assert_eq!(std::fs::read(&dest).unwrap(), b"second try");
}

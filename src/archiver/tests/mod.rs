use crate::api::Client;
use crate::archiver::{discovery, download};
use crate::config::Config;
use crate::db::Database;
use crate::retry::RetryConfig;
use crate::types::{Track, TrackId, User, UserId};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> Client {
    let config = Config {
        client_id: "test-client-id".to_string(),
        api_base_url: server.uri(),
        retry: RetryConfig {
            initial_delay: Duration::from_millis(5),
            ..Default::default()
        },
        ..Default::default()
    };
    Client::new(&config).unwrap()
}

fn test_user(id: i64) -> User {
    User {
        id: UserId(id),
        username: format!("user {}", id),
        permalink: format!("u{}", id),
        avatar_url: None,
    }
}

fn test_track(id: i64, user_id: i64) -> Track {
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
async fn test_discovery_stops_at_archived_frontier() {
    let server = MockServer::start().await;
    // Newest-first stream: 5, 4, 3 — the archive already holds 4
    Mock::given(method("GET"))
        .and(path("/users/1/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collection": [track_item(5, 1), track_item(4, 1), track_item(3, 1)],
            "next_href": null
        })))
        .mount(&server)
        .await;

    let temp_file = tempfile::NamedTempFile::new().unwrap();
    let db = Database::new(temp_file.path()).await.unwrap();
    let user = test_user(1);
    db.add_user(&user).await.unwrap();
    db.add_track(&Track {
        uri: Some("/archive/1/4.mp3".to_string()),
        ..test_track(4, 1)
    })
    .await
    .unwrap();

    let client = test_client(&server);
    let (tx, mut rx) = mpsc::channel::<Track>(10);

    let new_tracks = discovery::discover_new_tracks(&db, &client, &user, &tx).await;
    drop(tx);

    assert_eq!(new_tracks, 1);
    let forwarded = rx.recv().await.unwrap();
    assert_eq!(forwarded.id, TrackId(5));
    assert!(rx.recv().await.is_none());

    db.close().await;
}

#[tokio::test]
async fn test_discovery_forwards_everything_for_unseen_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/2/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collection": [track_item(9, 2), track_item(8, 2)],
            "next_href": null
        })))
        .mount(&server)
        .await;

    let temp_file = tempfile::NamedTempFile::new().unwrap();
    let db = Database::new(temp_file.path()).await.unwrap();
    let user = test_user(2);
    db.add_user(&user).await.unwrap();

    let client = test_client(&server);
    let (tx, mut rx) = mpsc::channel::<Track>(10);

    let new_tracks = discovery::discover_new_tracks(&db, &client, &user, &tx).await;
    drop(tx);

    assert_eq!(new_tracks, 2);
    assert_eq!(rx.recv().await.unwrap().id, TrackId(9));
    assert_eq!(rx.recv().await.unwrap().id, TrackId(8));

    db.close().await;
}

#[tokio::test]
async fn test_non_retrievable_track_is_never_fetched_or_stored() {
    // No mocks mounted: any fetch against the server would fail the test
    let server = MockServer::start().await;
    let client = Arc::new(test_client(&server));

    let temp_file = tempfile::NamedTempFile::new().unwrap();
    let db = Arc::new(Database::new(temp_file.path()).await.unwrap());
    db.add_user(&test_user(1)).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let track = Track {
        is_downloadable: false,
        is_streamable: false,
        ..test_track(7, 1)
    };

    let (tx, rx) = mpsc::channel::<Track>(10);
    tx.send(track.clone()).await.unwrap();
    drop(tx);

    download::run_worker(
        Arc::clone(&db),
        Arc::clone(&client),
        Arc::new(tokio::sync::Mutex::new(rx)),
        dir.path().to_path_buf(),
        0,
    )
    .await;

    // No user directory, no file, no requests, and nothing persisted
    assert!(!dir.path().join("1").exists());
    assert!(server.received_requests().await.unwrap().is_empty());
    assert_eq!(db.find_track(track.id).await.unwrap(), None);
}

#[tokio::test]
async fn test_artwork_fetch_failure_does_not_abort_persistence() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tracks/7/download"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"payload".to_vec()))
        .mount(&server)
        .await;
    // No artwork mock mounted: the 500x500 variant fetch gets a 404

    let temp_file = tempfile::NamedTempFile::new().unwrap();
    let db = Arc::new(Database::new(temp_file.path()).await.unwrap());
    db.add_user(&test_user(1)).await.unwrap();

    let client = Arc::new(test_client(&server));
    let dir = tempfile::tempdir().unwrap();
    let track = Track {
        artwork_url: Some(format!("{}/artwork-large.jpg", server.uri())),
        ..test_track(7, 1)
    };

    let (tx, rx) = mpsc::channel::<Track>(10);
    tx.send(track.clone()).await.unwrap();
    drop(tx);

    download::run_worker(
        Arc::clone(&db),
        client,
        Arc::new(tokio::sync::Mutex::new(rx)),
        dir.path().to_path_buf(),
        0,
    )
    .await;

    // Enrichment degraded, but the track is archived with its locator set
    let archived = db.find_track(track.id).await.unwrap().unwrap();
    let uri = archived.uri.as_deref().unwrap();
    assert_eq!(uri, dir.path().join("1").join("7.mp3").display().to_string());
    assert!(std::path::Path::new(uri).exists());
}

#[tokio::test]
async fn test_download_track_writes_to_deterministic_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tracks/7/download"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"payload".to_vec()))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let dir = tempfile::tempdir().unwrap();
    let track = test_track(7, 1);

    let track_file = download::download_track(&client, &track, dir.path())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(track_file, dir.path().join("1").join("7.mp3"));
    assert_eq!(std::fs::read(&track_file).unwrap(), b"payload");
}

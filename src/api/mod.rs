//! SoundCloud API client
//!
//! [`Client`] owns the HTTP stack and the credential, and exposes the three
//! things the pipeline needs from the remote API: authenticated JSON fetch
//! with bounded retry, cursor-following crawls over paginated collections
//! (see [`pages`]), and streaming payload download to disk.
//!
//! Constructed once per run and shared by reference across all workers; no
//! ambient global session state.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::retry::{self, RetryConfig};
use crate::types::{Track, User, UserId};
use futures::StreamExt;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use url::Url;

pub mod models;
pub mod pages;

pub use pages::{PageCrawl, TrackCrawl, UserCrawl};

/// Client for the remote API
#[derive(Debug)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    retry: RetryConfig,
}

impl Client {
    /// Build a client from the run configuration
    pub fn new(config: &Config) -> Result<Self> {
        Url::parse(&config.api_base_url)
            .map_err(|e| Error::Config(format!("invalid api_base_url: {}", e)))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("scarchive/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            retry: config.retry.clone(),
        })
    }

    /// Resolve a human-facing profile URL into a [`User`] record
    pub async fn resolve_user(&self, profile_url: &str) -> Result<User> {
        let url = format!("{}/resolve", self.base_url);
        let json = self.fetch_json(&url, &[("url", profile_url)]).await?;
        let user: models::ApiUser = serde_json::from_value(json)?;
        Ok(user.into())
    }

    /// Crawl a user's tracks, newest first
    pub fn user_tracks(&self, user_id: UserId) -> TrackCrawl<'_> {
        let url = format!("{}/users/{}/tracks", self.base_url, user_id);
        TrackCrawl::new(PageCrawl::new(self, url))
    }

    /// Crawl the users a user follows
    pub fn user_followings(&self, user_id: UserId) -> UserCrawl<'_> {
        let url = format!("{}/users/{}/followings", self.base_url, user_id);
        UserCrawl::new(PageCrawl::new(self, url))
    }

    /// Stream a track's audio payload to `dest`
    ///
    /// Uses the download endpoint when the track is downloadable, otherwise
    /// the stream endpoint. The destination file is recreated on every
    /// attempt; a stream that dies mid-body on the final attempt can leave
    /// partial bytes behind, which is harmless because the record is only
    /// persisted after success and the next run recreates the file. The
    /// caller must have checked [`Track::is_retrievable`] first.
    pub async fn save_track_to_file(&self, track: &Track, dest: &Path) -> Result<()> {
        let endpoint = if track.is_downloadable {
            "download"
        } else {
            "stream"
        };
        let url = format!("{}/tracks/{}/{}", self.base_url, track.id, endpoint);

        retry::with_backoff(&self.retry, || {
            let url = url.clone();
            async move {
                let resp = self
                    .http
                    .get(&url)
                    .query(&[("client_id", self.client_id.as_str())])
                    .send()
                    .await?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(Error::Status { url, status });
                }

                let mut file = tokio::fs::File::create(dest).await?;
                let mut stream = resp.bytes_stream();
                while let Some(chunk) = stream.next().await {
                    file.write_all(&chunk?).await?;
                }
                file.flush().await?;
                Ok(())
            }
        })
        .await
    }

    /// Fetch a JSON document, injecting the shared credential parameter
    ///
    /// Retries per the configured policy on connection errors and non-success
    /// statuses; the last error surfaces once attempts are exhausted.
    pub(crate) async fn fetch_json(&self, url: &str, params: &[(&str, &str)]) -> Result<Value> {
        retry::with_backoff(&self.retry, || async move {
            let resp = self
                .http
                .get(url)
                .query(params)
                .query(&[("client_id", self.client_id.as_str())])
                .send()
                .await?;
            let status = resp.status();
            if !status.is_success() {
                return Err(Error::Status {
                    url: url.to_string(),
                    status,
                });
            }
            Ok(resp.json::<Value>().await?)
        })
        .await
    }

    /// Fetch an image (artwork) into memory, single attempt
    pub(crate) async fn fetch_artwork(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self.http.get(url).send().await?.error_for_status()?;
        Ok(resp.bytes().await?.to_vec())
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

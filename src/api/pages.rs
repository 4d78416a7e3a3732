//! Cursor-following crawl over paginated collection endpoints.
//!
//! The API uses linked partitioning: each page is an object with a
//! `collection` array and an optional `next_href` cursor URL. [`PageCrawl`]
//! holds the cursor explicitly; [`TrackCrawl`] and [`UserCrawl`] filter the
//! raw item stream by `kind` into typed values, skipping anything
//! unrecognized.
//!
//! A crawl is not restartable. Fetch failures and malformed pages are logged
//! and end the crawl; they never surface as errors to the caller.

use crate::types::{Track, User};
use serde_json::Value;
use std::collections::VecDeque;

use super::models::{self, ApiTrack, ApiUser};
use super::Client;

// Fixed request page size (25) and linked-partitioning pagination mode
const PAGE_PARAMS: &[(&str, &str)] = &[("limit", "25"), ("linked_partitioning", "1")];

/// Cursor over a paginated collection endpoint, yielding raw item objects
#[derive(Debug)]
pub struct PageCrawl<'a> {
    client: &'a Client,
    next_url: Option<String>,
}

impl<'a> PageCrawl<'a> {
    pub(super) fn new(client: &'a Client, start_url: String) -> Self {
        Self {
            client,
            next_url: Some(start_url),
        }
    }

    /// Fetch the next page's items, or `None` when the crawl is over
    ///
    /// The crawl ends when the API reports no `next_href`, when a page is
    /// malformed (no `collection` array), or when a fetch exhausts its
    /// retries.
    pub async fn next_page(&mut self) -> Option<Vec<Value>> {
        let url = self.next_url.take()?;

        let page = match self.client.fetch_json(&url, PAGE_PARAMS).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(url = %url, error = %e, "failed to fetch crawl page, ending crawl");
                return None;
            }
        };

        let Some(items) = page.get("collection").and_then(Value::as_array) else {
            tracing::error!(url = %url, "unexpected page shape (no collection), ending crawl");
            return None;
        };

        self.next_url = page
            .get("next_href")
            .and_then(Value::as_str)
            .map(str::to_string);

        Some(items.clone())
    }
}

/// Typed crawl over a user's tracks, in the API's newest-first order
#[derive(Debug)]
pub struct TrackCrawl<'a> {
    pages: PageCrawl<'a>,
    buffer: VecDeque<Track>,
}

impl<'a> TrackCrawl<'a> {
    pub(super) fn new(pages: PageCrawl<'a>) -> Self {
        Self {
            pages,
            buffer: VecDeque::new(),
        }
    }

    /// Next track, or `None` when the crawl is over
    pub async fn next(&mut self) -> Option<Track> {
        loop {
            if let Some(track) = self.buffer.pop_front() {
                return Some(track);
            }
            let items = self.pages.next_page().await?;
            for item in items {
                if models::item_kind(&item) != Some(models::KIND_TRACK) {
                    continue;
                }
                match serde_json::from_value::<ApiTrack>(item) {
                    Ok(track) => self.buffer.push_back(track.into()),
                    Err(e) => tracing::debug!(error = %e, "skipping unparseable track item"),
                }
            }
        }
    }
}

/// Typed crawl over the users an account follows
#[derive(Debug)]
pub struct UserCrawl<'a> {
    pages: PageCrawl<'a>,
    buffer: VecDeque<User>,
}

impl<'a> UserCrawl<'a> {
    pub(super) fn new(pages: PageCrawl<'a>) -> Self {
        Self {
            pages,
            buffer: VecDeque::new(),
        }
    }

    /// Next user, or `None` when the crawl is over
    pub async fn next(&mut self) -> Option<User> {
        loop {
            if let Some(user) = self.buffer.pop_front() {
                return Some(user);
            }
            let items = self.pages.next_page().await?;
            for item in items {
                if models::item_kind(&item) != Some(models::KIND_USER) {
                    continue;
                }
                match serde_json::from_value::<ApiUser>(item) {
                    Ok(user) => self.buffer.push_back(user.into()),
                    Err(e) => tracing::debug!(error = %e, "skipping unparseable user item"),
                }
            }
        }
    }
}

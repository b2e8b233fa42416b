use reqwest::StatusCode;
use spdlog::{debug, error};
use thiserror::Error;

use crate::notes::{Feed, Note};

#[derive(Debug, Error)]
enum FeedError {
    #[error("Failed to fetch micro.blog feed: {} {}", .0.as_u16(), .0.canonical_reason().unwrap_or(""))]
    Status(StatusCode),

    #[error("Error fetching micro.blog feed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Error decoding micro.blog feed: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Reads notes from a micro.blog JSON feed.
///
/// Failures never reach the caller: they are logged and an empty list comes back, so
/// the notes page always has something to render.
#[derive(Clone)]
pub struct NotesClient {
    client: reqwest::Client,
    feed_url: Option<String>,
}

impl NotesClient {
    pub fn new(feed_url: Option<String>) -> Self {
        Self::with_client(reqwest::Client::new(), feed_url)
    }

    pub fn with_client(client: reqwest::Client, feed_url: Option<String>) -> Self {
        let feed_url = feed_url.filter(|url| !url.trim().is_empty());
        NotesClient { client, feed_url }
    }

    pub fn feed_url(&self) -> Option<&str> {
        self.feed_url.as_deref()
    }

    /// Notes in feed order. No feed URL means no request and no notes.
    pub async fn fetch_notes(&self) -> Vec<Note> {
        let Some(ref feed_url) = self.feed_url else {
            return vec![];
        };

        match self.fetch_feed(feed_url).await {
            Ok(feed) => {
                let notes = feed.into_notes();
                debug!("Fetched {} notes from {}", notes.len(), feed_url);
                notes
            }
            Err(e) => {
                error!("{} - url={}", e, feed_url);
                vec![]
            }
        }
    }

    async fn fetch_feed(&self, feed_url: &str) -> Result<Feed, FeedError> {
        let response = self.client
            .get(feed_url)
            .send()
            .await
            .map_err(FeedError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }

        response.json::<Feed>().await.map_err(FeedError::Decode)
    }
}

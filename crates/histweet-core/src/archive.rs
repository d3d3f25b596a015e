//! Loader for the `tweet.js` file of a Twitter data export
//!
//! The export is a JavaScript assignment wrapping a JSON array:
//!
//! ```text
//! window.YTD.tweet.part0 = [ { "tweet": { "id": "1", ... } }, ... ]
//! ```
//!
//! Every field of interest is encoded as a string.

use crate::post::Post;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Prefix in front of the JSON payload
pub const ARCHIVE_HEADER: &str = "window.YTD.tweet.part0 = ";

/// Timestamp layout, e.g. `Wed Oct 10 20:19:24 +0000 2018`
pub const ARCHIVE_TIME_LAYOUT: &str = "%a %b %d %H:%M:%S %z %Y";

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid archive JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid {field} for tweet {id}: {value}")]
    InvalidField {
        id: String,
        field: &'static str,
        value: String,
    },
}

#[derive(Debug, Deserialize)]
struct ArchiveEntry {
    tweet: ArchiveTweet,
}

#[derive(Debug, Deserialize)]
struct ArchiveTweet {
    id: String,
    created_at: String,
    full_text: String,
    favorite_count: String,
    retweet_count: String,
}

impl ArchiveTweet {
    fn invalid(&self, field: &'static str, value: &str) -> ArchiveError {
        ArchiveError::InvalidField {
            id: self.id.clone(),
            field,
            value: value.to_string(),
        }
    }

    fn into_post(self) -> Result<Post, ArchiveError> {
        let id: u64 = self.id.parse().map_err(|_| self.invalid("id", &self.id))?;
        let created_at = DateTime::parse_from_str(&self.created_at, ARCHIVE_TIME_LAYOUT)
            .map_err(|_| self.invalid("created_at", &self.created_at))?
            .with_timezone(&Utc);
        let likes: u64 = self
            .favorite_count
            .parse()
            .map_err(|_| self.invalid("favorite_count", &self.favorite_count))?;
        let retweets: u64 = self
            .retweet_count
            .parse()
            .map_err(|_| self.invalid("retweet_count", &self.retweet_count))?;

        Ok(Post::new(id, created_at, self.full_text)
            .with_likes(likes)
            .with_retweets(retweets))
    }
}

/// Parse the contents of a `tweet.js` export; the header is optional
pub fn parse_archive(contents: &str) -> Result<Vec<Post>, ArchiveError> {
    let contents = contents.trim_start_matches('\u{feff}').trim_start();
    let json = contents.strip_prefix(ARCHIVE_HEADER).unwrap_or(contents);

    let entries: Vec<ArchiveEntry> = serde_json::from_str(json)?;

    entries
        .into_iter()
        .map(|entry| entry.tweet.into_post())
        .collect()
}

/// Read and parse a `tweet.js` export from disk
pub fn load_archive(path: impl AsRef<Path>) -> Result<Vec<Post>, ArchiveError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let posts = parse_archive(&contents)?;

    info!("Loaded {} tweets from {}", posts.len(), path.display());

    Ok(posts)
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single post and the metadata rules are evaluated against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub text: String,
    pub num_likes: u64,
    pub num_retweets: u64,
    pub num_replies: u64,
    pub is_retweet: bool,
    pub is_reply: bool,
}

impl Post {
    /// Create a new post with zero counts
    pub fn new(id: u64, created_at: DateTime<Utc>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            id,
            created_at,
            is_retweet: text.starts_with("RT"),
            is_reply: text.starts_with('@'),
            text,
            num_likes: 0,
            num_retweets: 0,
            num_replies: 0,
        }
    }

    /// Set the like count
    pub fn with_likes(mut self, likes: u64) -> Self {
        self.num_likes = likes;
        self
    }

    /// Set the retweet count
    pub fn with_retweets(mut self, retweets: u64) -> Self {
        self.num_retweets = retweets;
        self
    }

    /// Set the reply count
    pub fn with_replies(mut self, replies: u64) -> Self {
        self.num_replies = replies;
        self
    }

    /// Set the creation time
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

impl Default for Post {
    fn default() -> Self {
        Self::new(0, DateTime::<Utc>::default(), "")
    }
}

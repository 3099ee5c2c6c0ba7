//! Post model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Comment, User, UserId, timestamp};

/// Server-assigned post identifier
pub type PostId = i64;

/// Post as the API returns it
///
/// The list endpoint omits `comments`; the detail endpoint includes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub author_id: UserId,
    pub author: User,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Post {
    /// Whether `user` may delete this post (its author or an admin).
    ///
    /// Only decides whether the affordance is offered; the server enforces it.
    pub fn can_be_deleted_by(&self, user: &User) -> bool {
        user.is_admin || user.id == self.author_id
    }
}

/// New post payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
}

/// Pagination for list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: 100,
        }
    }
}

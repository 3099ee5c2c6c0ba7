//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{User, UserId, timestamp};

/// Comment attached to a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub user_id: UserId,
    pub user: User,
}

/// New comment payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub content: String,
}

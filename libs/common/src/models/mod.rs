//! Server-shaped models passed between the API and the views

pub mod comment;
pub mod post;
pub mod timestamp;
pub mod user;

// Re-export for convenience
pub use comment::{Comment, NewComment};
pub use post::{NewPost, Page, Post, PostId};
pub use user::{AccessToken, RegisterRequest, User, UserId};

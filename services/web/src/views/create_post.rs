//! New post form

use common::ClientError;
use common::models::{NewPost, Post};
use tracing::{error, info};

use crate::routes::Route;
use crate::state::AppState;

pub const CREATE_FAILED: &str = "Failed to create post";

pub struct CreatePostView {
    state: AppState,
    created: Option<Post>,
}

impl CreatePostView {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            created: None,
        }
    }

    /// Publish a post and return to the feed
    pub async fn submit(&mut self, title: &str, content: &str) -> Result<Route, String> {
        let post = NewPost {
            title: title.to_string(),
            content: content.to_string(),
        };
        if let Err(e) = auth::validation::validate_post(&post) {
            return Err(e.to_string());
        }

        match self.state.api.create_post(&post).await {
            Ok(post) => {
                info!("Created post {}", post.id);
                self.created = Some(post);
                Ok(Route::Feed)
            }
            Err(e) => Err(self.failed(&e)),
        }
    }

    fn failed(&self, e: &ClientError) -> String {
        error!("Error creating post: {}", e);
        self.state.report(e);
        CREATE_FAILED.to_string()
    }

    /// Post returned by the last successful submit
    pub fn created(&self) -> Option<&Post> {
        self.created.as_ref()
    }
}

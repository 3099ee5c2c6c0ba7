//! Single post with its comments

use common::models::{NewComment, Post, PostId};
use tracing::{error, info};

use super::ViewState;
use crate::likes::{LikeController, LikeState, ToggleOutcome};
use crate::render;
use crate::routes::Route;
use crate::state::AppState;

pub const NOT_FOUND: &str = "Post not found";
pub const NO_COMMENTS: &str = "No comments yet. Be the first to comment!";
pub const COMMENT_FAILED: &str = "Failed to add comment";
pub const DELETE_FAILED: &str = "Failed to delete post";

pub struct PostDetailView {
    state: AppState,
    id: PostId,
    post: ViewState<Post>,
    likes: Option<LikeController>,
}

impl PostDetailView {
    pub fn new(state: AppState, id: PostId) -> Self {
        Self {
            state,
            id,
            post: ViewState::Loading,
            likes: None,
        }
    }

    /// Fetch the post and its comments; any failure shows as "Post not found"
    pub async fn load(&mut self) -> &ViewState<Post> {
        match self.state.api.get_post(self.id).await {
            Ok(post) => {
                self.likes = Some(LikeController::for_post(
                    &post,
                    self.state.api.clone(),
                    self.state.session.subscribe(),
                ));
                self.post = ViewState::Ready(post);
            }
            Err(e) => {
                error!("Error fetching post {}: {}", self.id, e);
                self.state.report(&e);
                self.likes = None;
                self.post = ViewState::Failed(NOT_FOUND.to_string());
            }
        }
        &self.post
    }

    pub fn post(&self) -> &ViewState<Post> {
        &self.post
    }

    pub fn paragraphs(&self) -> Vec<String> {
        self.post
            .ready()
            .map(|post| render::paragraphs(&post.content))
            .unwrap_or_default()
    }

    pub fn like_state(&self) -> Option<LikeState> {
        self.likes.as_ref().map(LikeController::state)
    }

    pub async fn toggle_like(&self) -> ToggleOutcome {
        match &self.likes {
            Some(likes) => likes.toggle().await,
            None => ToggleOutcome::Disabled,
        }
    }

    /// Whether the signed-in user may delete this post
    pub fn can_delete(&self) -> bool {
        let session = self.state.session.current();
        match (self.post.ready(), session.user()) {
            (Some(post), Some(user)) => post.can_be_deleted_by(user),
            _ => false,
        }
    }

    /// Add a comment, then reload the post so the list comes from the server
    pub async fn submit_comment(&mut self, content: &str) -> Result<(), String> {
        let comment = NewComment {
            content: content.to_string(),
        };
        auth::validation::validate_comment(&comment).map_err(|e| e.to_string())?;

        if let Err(e) = self.state.api.create_comment(self.id, &comment).await {
            error!("Error submitting comment: {}", e);
            self.state.report(&e);
            return Err(COMMENT_FAILED.to_string());
        }
        self.load().await;
        Ok(())
    }

    /// Delete the post and go back to the feed
    pub async fn delete(&mut self) -> Result<Route, String> {
        match self.state.api.delete_post(self.id).await {
            Ok(()) => {
                info!("Deleted post {}", self.id);
                Ok(Route::Feed)
            }
            Err(e) => {
                error!("Error deleting post {}: {}", self.id, e);
                self.state.report(&e);
                Err(DELETE_FAILED.to_string())
            }
        }
    }

    pub fn render(&self) -> String {
        let post = match &self.post {
            ViewState::Loading => return "Loading post...\n".to_string(),
            ViewState::Failed(message) => return format!("{message}\n"),
            ViewState::Ready(post) => post,
        };

        let mut out = format!(
            "{}\nBy {} • {}\n\n",
            post.title,
            post.author.name,
            render::date(&post.created_at)
        );
        for paragraph in self.paragraphs() {
            out.push_str(&paragraph);
            out.push_str("\n\n");
        }
        if let Some(likes) = self.like_state() {
            out.push_str(&format!(
                "{} {}\n",
                if likes.liked { "♥" } else { "♡" },
                likes.label()
            ));
        }

        out.push_str(&format!("\nComments ({})\n", post.comments.len()));
        if post.comments.is_empty() {
            out.push_str(NO_COMMENTS);
            out.push('\n');
        }
        for comment in &post.comments {
            out.push_str(&format!(
                "- {} ({}): {}\n",
                comment.user.name,
                render::date(&comment.created_at),
                comment.content
            ));
        }
        out
    }
}

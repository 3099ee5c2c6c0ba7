//! Home feed

use common::models::{Page, Post, PostId};
use tracing::error;

use super::ViewState;
use crate::likes::{LikeController, ToggleOutcome};
use crate::render::{self, Preview};
use crate::state::AppState;

pub const EMPTY_FEED: &str = "No posts yet. Be the first to share something!";
pub const LOAD_FAILED: &str = "Failed to load posts";

/// One post in the feed, with its own like button
#[derive(Clone)]
pub struct PostCard {
    pub post: Post,
    pub likes: LikeController,
}

impl PostCard {
    pub fn new(post: Post, state: &AppState) -> Self {
        let likes = LikeController::for_post(&post, state.api.clone(), state.session.subscribe());
        Self { post, likes }
    }

    /// "By Ada • Jan 5, 2024"
    pub fn byline(&self) -> String {
        format!(
            "By {} • {}",
            self.post.author.name,
            render::date(&self.post.created_at)
        )
    }

    pub fn preview(&self) -> Preview {
        render::preview(&self.post.content)
    }

    pub async fn toggle_like(&self) -> ToggleOutcome {
        self.likes.toggle().await
    }

    pub fn render(&self) -> String {
        let preview = self.preview();
        let likes = self.likes.state();
        let mut out = format!(
            "#{} {}\n{}\n{}\n",
            self.post.id,
            self.post.title,
            self.byline(),
            preview.text
        );
        if preview.truncated {
            out.push_str(&format!("Read more: {}\n", crate::Route::Post(self.post.id)));
        }
        out.push_str(&format!(
            "{} {}\n",
            if likes.liked { "♥" } else { "♡" },
            likes.label()
        ));
        out
    }
}

/// Feed of the most recent posts
pub struct FeedView {
    state: AppState,
    posts: ViewState<Vec<PostCard>>,
}

impl FeedView {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            posts: ViewState::Loading,
        }
    }

    pub async fn load(&mut self) -> &ViewState<Vec<PostCard>> {
        self.posts = match self.state.api.list_posts(Page::default()).await {
            Ok(posts) => ViewState::Ready(
                posts
                    .into_iter()
                    .map(|post| PostCard::new(post, &self.state))
                    .collect(),
            ),
            Err(e) => {
                error!("Error fetching posts: {}", e);
                self.state.report(&e);
                ViewState::Failed(LOAD_FAILED.to_string())
            }
        };
        &self.posts
    }

    pub fn posts(&self) -> &ViewState<Vec<PostCard>> {
        &self.posts
    }

    pub fn card(&self, post_id: PostId) -> Option<&PostCard> {
        self.posts
            .ready()?
            .iter()
            .find(|card| card.post.id == post_id)
    }

    pub fn render(&self) -> String {
        match &self.posts {
            ViewState::Loading => "Loading posts...\n".to_string(),
            ViewState::Failed(message) => format!("{message}\n"),
            ViewState::Ready(cards) if cards.is_empty() => format!("{EMPTY_FEED}\n"),
            ViewState::Ready(cards) => cards
                .iter()
                .map(PostCard::render)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

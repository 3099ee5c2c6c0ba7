//! Admin dashboard: every user and every post

use common::models::{Page, Post, PostId, User, UserId};
use tracing::{error, info};

use super::ViewState;
use crate::render;
use crate::state::AppState;

pub const USERS_FAILED: &str = "Failed to load users";
pub const POSTS_FAILED: &str = "Failed to load posts";
pub const ADMIN_PROTECTED: &str = "Admin accounts cannot be deleted";
pub const DELETE_USER_FAILED: &str = "Failed to delete user";
pub const DELETE_POST_FAILED: &str = "Failed to delete post";

pub struct AdminView {
    state: AppState,
    users: ViewState<Vec<User>>,
    posts: ViewState<Vec<Post>>,
}

impl AdminView {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            users: ViewState::Loading,
            posts: ViewState::Loading,
        }
    }

    /// Fetch users and posts concurrently; each table fails on its own
    pub async fn load(&mut self) {
        let (users, posts) = tokio::join!(
            self.state.api.list_users(Page::default()),
            self.state.api.list_posts(Page::default())
        );

        self.users = match users {
            Ok(users) => ViewState::Ready(users),
            Err(e) => {
                error!("Failed to fetch users: {}", e);
                self.state.report(&e);
                ViewState::Failed(USERS_FAILED.to_string())
            }
        };
        self.posts = match posts {
            Ok(posts) => ViewState::Ready(posts),
            Err(e) => {
                error!("Failed to fetch posts: {}", e);
                self.state.report(&e);
                ViewState::Failed(POSTS_FAILED.to_string())
            }
        };
    }

    pub fn users(&self) -> &ViewState<Vec<User>> {
        &self.users
    }

    pub fn posts(&self) -> &ViewState<Vec<Post>> {
        &self.posts
    }

    /// Delete a non-admin user and drop the row
    pub async fn delete_user(&mut self, id: UserId) -> Result<User, String> {
        let is_admin_row = self
            .users
            .ready()
            .and_then(|users| users.iter().find(|user| user.id == id))
            .is_some_and(|user| user.is_admin);
        if is_admin_row {
            return Err(ADMIN_PROTECTED.to_string());
        }

        match self.state.api.delete_user(id).await {
            Ok(user) => {
                info!("Deleted user {}", user.email);
                if let Some(users) = self.users.ready_mut() {
                    users.retain(|user| user.id != id);
                }
                Ok(user)
            }
            Err(e) => {
                error!("Failed to delete user {}: {}", id, e);
                self.state.report(&e);
                Err(match e.server_message() {
                    Some(detail) => format!("{DELETE_USER_FAILED}: {detail}"),
                    None => DELETE_USER_FAILED.to_string(),
                })
            }
        }
    }

    /// Delete any post and drop the row
    pub async fn delete_post(&mut self, id: PostId) -> Result<(), String> {
        match self.state.api.delete_post(id).await {
            Ok(()) => {
                info!("Deleted post {}", id);
                if let Some(posts) = self.posts.ready_mut() {
                    posts.retain(|post| post.id != id);
                }
                Ok(())
            }
            Err(e) => {
                error!("Failed to delete post {}: {}", id, e);
                self.state.report(&e);
                Err(DELETE_POST_FAILED.to_string())
            }
        }
    }

    pub fn render_users(&self) -> String {
        match &self.users {
            ViewState::Loading => "Loading...\n".to_string(),
            ViewState::Failed(message) => format!("{message}\n"),
            ViewState::Ready(users) => {
                let mut out = "ID\tName\tEmail\tRole\n".to_string();
                for user in users {
                    out.push_str(&format!(
                        "{}\t{}\t{}\t{}\n",
                        user.id,
                        user.name,
                        user.email,
                        user.role()
                    ));
                }
                out
            }
        }
    }

    pub fn render_posts(&self) -> String {
        match &self.posts {
            ViewState::Loading => "Loading...\n".to_string(),
            ViewState::Failed(message) => format!("{message}\n"),
            ViewState::Ready(posts) => {
                let mut out = "ID\tTitle\tAuthor\tDate\n".to_string();
                for post in posts {
                    out.push_str(&format!(
                        "{}\t{}\t{}\t{}\n",
                        post.id,
                        post.title,
                        post.author.name,
                        render::date(&post.created_at)
                    ));
                }
                out
            }
        }
    }

    pub fn render(&self) -> String {
        format!(
            "Admin Dashboard\n\nUsers\n{}\nAll Posts\n{}",
            self.render_users(),
            self.render_posts()
        )
    }
}

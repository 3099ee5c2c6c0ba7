//! One view-model per screen
//!
//! Views own the data a screen shows, call the API through [`AppState`] and
//! turn failures into the messages the user sees. Rendering is plain text.
//!
//! [`AppState`]: crate::state::AppState

pub mod admin;
pub mod create_post;
pub mod dashboard;
pub mod feed;
pub mod follow;
pub mod login;
pub mod post_detail;
pub mod register;

pub use admin::AdminView;
pub use create_post::CreatePostView;
pub use dashboard::DashboardView;
pub use feed::{FeedView, PostCard};
pub use follow::FollowView;
pub use login::LoginView;
pub use post_detail::PostDetailView;
pub use register::RegisterView;

/// Loading state of data a view fetches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    /// Message shown in place of the data
    Failed(String),
}

impl<T> ViewState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            ViewState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Loading
    }
}

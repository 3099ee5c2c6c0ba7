//! View layer for the blog client
//!
//! Routes and their guards, the optimistic like controller, and one
//! view-model per screen. The `blog` binary drives these from the terminal.

pub mod likes;
pub mod render;
pub mod routes;
pub mod state;
pub mod views;

pub use likes::{LikeController, LikeState, ToggleOutcome};
pub use routes::Route;
pub use state::AppState;

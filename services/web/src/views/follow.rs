//! Follow and unfollow actions

use common::ClientError;
use common::models::UserId;
use tracing::{error, info};

use crate::state::AppState;

pub const FOLLOW_FAILED: &str = "Failed to follow user";
pub const UNFOLLOW_FAILED: &str = "Failed to unfollow user";

pub struct FollowView {
    state: AppState,
}

impl FollowView {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn follow(&self, user_id: UserId) -> Result<(), String> {
        match self.state.api.follow_user(user_id).await {
            Ok(()) => {
                info!("Following user {}", user_id);
                Ok(())
            }
            Err(e) => Err(self.failed(&e, FOLLOW_FAILED)),
        }
    }

    pub async fn unfollow(&self, user_id: UserId) -> Result<(), String> {
        match self.state.api.unfollow_user(user_id).await {
            Ok(()) => {
                info!("Unfollowed user {}", user_id);
                Ok(())
            }
            Err(e) => Err(self.failed(&e, UNFOLLOW_FAILED)),
        }
    }

    /// Server detail when there is one, `fallback` otherwise
    fn failed(&self, e: &ClientError, fallback: &str) -> String {
        error!("{}: {}", fallback, e);
        self.state.report(e);
        e.server_message().unwrap_or(fallback).to_string()
    }
}

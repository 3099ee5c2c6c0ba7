//! Optimistic like toggling
//!
//! The displayed like state flips as soon as the user asks for it; the
//! request runs afterwards and a failure puts the previous state back.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use auth::Session;
use common::models::{Post, PostId};
use common::{BlogApi, ClientError};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::render;

/// What the like button of one post shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeState {
    pub liked: bool,
    pub count: u64,
}

impl LikeState {
    pub fn new(liked: bool, count: u64) -> Self {
        Self { liked, count }
    }

    pub fn from_post(post: &Post) -> Self {
        Self::new(post.is_liked, post.like_count)
    }

    /// State after the user flips the button
    pub fn toggled(self) -> Self {
        if self.liked {
            Self::new(false, self.count.saturating_sub(1))
        } else {
            Self::new(true, self.count.saturating_add(1))
        }
    }

    /// "1 like", "3 likes"
    pub fn label(&self) -> String {
        render::like_label(self.count)
    }
}

/// Result of one [`LikeController::toggle`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The server accepted the change; the optimistic state stands
    Committed(LikeState),
    /// The request failed and `state` was put back
    RolledBack { state: LikeState, error: ClientError },
    /// No authenticated user; nothing happened
    Disabled,
    /// Another toggle for this post is still waiting on the server
    InFlight,
}

#[derive(Debug)]
struct LikeCell {
    state: LikeState,
    in_flight: bool,
}

/// Like button state of one displayed post
///
/// Clones share the same state, so a card and the view that owns it observe
/// the same count.
#[derive(Clone)]
pub struct LikeController {
    post_id: PostId,
    api: Arc<dyn BlogApi>,
    session: watch::Receiver<Session>,
    cell: Arc<Mutex<LikeCell>>,
}

impl LikeController {
    pub fn new(
        post_id: PostId,
        seed: LikeState,
        api: Arc<dyn BlogApi>,
        session: watch::Receiver<Session>,
    ) -> Self {
        Self {
            post_id,
            api,
            session,
            cell: Arc::new(Mutex::new(LikeCell {
                state: seed,
                in_flight: false,
            })),
        }
    }

    /// Controller seeded from the post's server-side like fields
    pub fn for_post(post: &Post, api: Arc<dyn BlogApi>, session: watch::Receiver<Session>) -> Self {
        Self::new(post.id, LikeState::from_post(post), api, session)
    }

    pub fn post_id(&self) -> PostId {
        self.post_id
    }

    /// Currently displayed state
    pub fn state(&self) -> LikeState {
        self.lock().state
    }

    pub fn is_in_flight(&self) -> bool {
        self.lock().in_flight
    }

    fn lock(&self) -> MutexGuard<'_, LikeCell> {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Flip the like state now and confirm it with the server.
    ///
    /// On failure the state captured at the start of this call is restored.
    /// Nothing is retried.
    pub async fn toggle(&self) -> ToggleOutcome {
        if !self.session.borrow().is_authenticated() {
            debug!("Like toggle ignored without a session");
            return ToggleOutcome::Disabled;
        }

        let (previous, target) = {
            let mut cell = self.lock();
            if cell.in_flight {
                debug!("Like toggle for post {} already in flight", self.post_id);
                return ToggleOutcome::InFlight;
            }
            let previous = cell.state;
            let target = previous.toggled();
            cell.state = target;
            cell.in_flight = true;
            (previous, target)
        };
        let _in_flight = InFlight { cell: &self.cell };

        let result = if target.liked {
            self.api.like_post(self.post_id).await
        } else {
            self.api.unlike_post(self.post_id).await
        };

        match result {
            Ok(()) => {
                debug!("Like state of post {} is now {:?}", self.post_id, target);
                ToggleOutcome::Committed(target)
            }
            Err(error) => {
                warn!("Error toggling like on post {}: {}", self.post_id, error);
                self.lock().state = previous;
                ToggleOutcome::RolledBack {
                    state: previous,
                    error,
                }
            }
        }
    }
}

/// Releases the in-flight flag when the toggle settles or is dropped
struct InFlight<'a> {
    cell: &'a Mutex<LikeCell>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.cell
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .in_flight = false;
    }
}

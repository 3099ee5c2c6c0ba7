//! Optimistic like toggling against the in-memory API

use std::sync::Arc;

use common::models::{Post, User};
use common::storage::MemoryCredentialStore;
use common::testing::InMemoryBlogApi;
use common::{BlogApi, ClientError};
use web::{AppState, LikeController, LikeState, ToggleOutcome};

struct Fixture {
    api: Arc<InMemoryBlogApi>,
    state: AppState,
    reader: User,
    post: Post,
}

async fn fixture() -> Fixture {
    let store = Arc::new(MemoryCredentialStore::new());
    let api = Arc::new(InMemoryBlogApi::new(store.clone()));
    let author = api.seed_user("Ada", "ada@example.com", "1234567890", "secret1", false);
    let reader = api.seed_user("Grace", "grace@example.com", "1234567890", "secret1", false);
    let post = api.seed_post(&author, "Hello", "First post");

    let state = AppState::new(api.clone(), store);
    state.session.initialize().await;
    state
        .session
        .login("grace@example.com", "secret1")
        .await
        .unwrap();

    Fixture {
        api,
        state,
        reader,
        post,
    }
}

impl Fixture {
    /// Controller seeded the way a view seeds it: from a fresh fetch
    async fn controller(&self) -> LikeController {
        let post = self.api.get_post(self.post.id).await.unwrap();
        LikeController::for_post(&post, self.state.api.clone(), self.state.session.subscribe())
    }
}

async fn wait_for_pending(api: &InMemoryBlogApi) {
    while api.pending_mutations() == 0 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_sequential_toggles_compose() {
    let fx = fixture().await;
    let likes = fx.controller().await;
    assert_eq!(likes.state(), LikeState::new(false, 0));

    assert_eq!(likes.toggle().await, ToggleOutcome::Committed(LikeState::new(true, 1)));
    assert!(fx.api.is_liked_by(fx.post.id, fx.reader.id));

    assert_eq!(likes.toggle().await, ToggleOutcome::Committed(LikeState::new(false, 0)));
    assert!(!fx.api.is_liked_by(fx.post.id, fx.reader.id));
    assert_eq!(fx.api.like_count(fx.post.id), 0);

    let calls = fx.api.calls();
    assert_eq!(&calls[calls.len() - 2..], ["like_post", "unlike_post"]);
}

#[tokio::test]
async fn test_failed_toggle_restores_previous_state() {
    let fx = fixture().await;
    fx.api.seed_like(fx.post.id, fx.reader.id);
    let likes = fx.controller().await;
    assert_eq!(likes.state(), LikeState::new(true, 1));

    fx.api
        .fail_on("unlike_post", ClientError::Network("connection reset".into()));
    let outcome = likes.toggle().await;

    assert_eq!(
        outcome,
        ToggleOutcome::RolledBack {
            state: LikeState::new(true, 1),
            error: ClientError::Network("connection reset".into()),
        }
    );
    assert_eq!(likes.state(), LikeState::new(true, 1));
    assert!(!likes.is_in_flight());
    assert!(fx.api.is_liked_by(fx.post.id, fx.reader.id));
}

#[tokio::test]
async fn test_optimistic_state_visible_while_request_pending() {
    let fx = fixture().await;
    let likes = fx.controller().await;
    let gate = fx.api.hold_mutations();

    let pending = likes.clone();
    let handle = tokio::spawn(async move { pending.toggle().await });
    wait_for_pending(&fx.api).await;

    assert_eq!(likes.state(), LikeState::new(true, 1));
    assert!(likes.is_in_flight());
    assert!(!fx.api.is_liked_by(fx.post.id, fx.reader.id));

    gate.notify_one();
    assert_eq!(
        handle.await.unwrap(),
        ToggleOutcome::Committed(LikeState::new(true, 1))
    );
    assert!(fx.api.is_liked_by(fx.post.id, fx.reader.id));
    assert!(!likes.is_in_flight());
}

#[tokio::test]
async fn test_pending_failure_rolls_back_optimistic_state() {
    let fx = fixture().await;
    let likes = fx.controller().await;
    let gate = fx.api.hold_mutations();
    fx.api.fail_on(
        "like_post",
        ClientError::Server {
            status: 500,
            message: None,
        },
    );

    let pending = likes.clone();
    let handle = tokio::spawn(async move { pending.toggle().await });
    wait_for_pending(&fx.api).await;
    assert_eq!(likes.state(), LikeState::new(true, 1));

    gate.notify_one();
    assert!(matches!(
        handle.await.unwrap(),
        ToggleOutcome::RolledBack { state, .. } if state == LikeState::new(false, 0)
    ));
    assert_eq!(likes.state(), LikeState::new(false, 0));
}

#[tokio::test]
async fn test_second_toggle_refused_while_in_flight() {
    let fx = fixture().await;
    let likes = fx.controller().await;
    let gate = fx.api.hold_mutations();

    let pending = likes.clone();
    let handle = tokio::spawn(async move { pending.toggle().await });
    wait_for_pending(&fx.api).await;

    assert_eq!(likes.toggle().await, ToggleOutcome::InFlight);
    assert_eq!(likes.state(), LikeState::new(true, 1));

    gate.notify_one();
    handle.await.unwrap();
    assert_eq!(fx.api.like_count(fx.post.id), 1);
    assert_eq!(
        fx.api
            .calls()
            .iter()
            .filter(|call| call.ends_with("like_post"))
            .count(),
        1
    );
}

#[tokio::test]
async fn test_dropped_toggle_releases_in_flight_flag() {
    let fx = fixture().await;
    let likes = fx.controller().await;
    let _gate = fx.api.hold_mutations();

    let pending = likes.clone();
    let handle = tokio::spawn(async move { pending.toggle().await });
    wait_for_pending(&fx.api).await;

    handle.abort();
    assert!(handle.await.unwrap_err().is_cancelled());

    assert!(!likes.is_in_flight());
    assert_eq!(likes.state(), LikeState::new(true, 1));
}

#[tokio::test]
async fn test_toggle_disabled_without_session() {
    let fx = fixture().await;
    let likes = fx.controller().await;
    fx.state.session.logout();
    let calls_before = fx.api.call_count();

    assert_eq!(likes.toggle().await, ToggleOutcome::Disabled);
    assert_eq!(likes.state(), LikeState::new(false, 0));
    assert_eq!(fx.api.call_count(), calls_before);
}

#[tokio::test]
async fn test_rejected_credential_ends_session() {
    let fx = fixture().await;
    let likes = fx.controller().await;
    fx.api.revoke_tokens();

    let error = match likes.toggle().await {
        ToggleOutcome::RolledBack { error, .. } => error,
        other => panic!("expected a rollback, got {other:?}"),
    };
    assert!(error.is_auth());
    assert_eq!(likes.state(), LikeState::new(false, 0));

    fx.state.report(&error);
    assert!(!fx.state.session.current().is_authenticated());
    assert_eq!(likes.toggle().await, ToggleOutcome::Disabled);
}

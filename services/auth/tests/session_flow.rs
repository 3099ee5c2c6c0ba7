//! End-to-end session lifecycle against the in-memory API
//!
//! Covers the startup credential check, register-then-login, logout and the
//! client-side registration checks that must never reach the network.

use std::sync::Arc;

use auth::{SessionManager, SessionStatus};
use common::{
    ClientError,
    models::RegisterRequest,
    storage::{Credential, CredentialStore, MemoryCredentialStore},
    testing::InMemoryBlogApi,
};

fn registration(email: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        password: "secret1".to_string(),
        name: "Grace".to_string(),
        phone: "1234567890".to_string(),
    }
}

fn setup_with(store: MemoryCredentialStore) -> (Arc<InMemoryBlogApi>, Arc<MemoryCredentialStore>, SessionManager) {
    let store = Arc::new(store);
    let api = Arc::new(InMemoryBlogApi::new(store.clone()));
    let manager = SessionManager::new(api.clone(), store.clone());
    (api, store, manager)
}

#[tokio::test]
async fn test_register_then_login_authenticates() {
    let (api, store, manager) = setup_with(MemoryCredentialStore::new());
    manager.initialize().await;

    let registered = manager.register(&registration("grace@example.com")).await.unwrap();
    // Registration alone does not establish a session
    assert_eq!(manager.current().status(), SessionStatus::Unauthenticated);
    assert_eq!(store.read().unwrap(), None);

    let user = manager.login("grace@example.com", "secret1").await.unwrap();
    assert_eq!(user, registered);

    match manager.current().status() {
        SessionStatus::Authenticated(user) => assert_eq!(user.email, "grace@example.com"),
        other => panic!("expected an authenticated session, got {other:?}"),
    }
    assert!(store.read().unwrap().is_some());
    assert_eq!(api.calls(), vec!["register", "issue_token", "current_user"]);
}

#[tokio::test]
async fn test_bad_credentials_are_not_persisted() {
    let (api, store, manager) = setup_with(MemoryCredentialStore::new());
    api.seed_user("Ada", "ada@example.com", "1234567890", "secret1", false);

    let err = manager.login("ada@example.com", "wrong-password").await.unwrap_err();
    assert_eq!(err, ClientError::auth("Incorrect email or password"));
    assert_eq!(store.read().unwrap(), None);
    assert!(!manager.current().is_authenticated());
}

#[tokio::test]
async fn test_duplicate_registration_passes_server_message() {
    let (api, _store, manager) = setup_with(MemoryCredentialStore::new());
    api.seed_user("Ada", "ada@example.com", "1234567890", "secret1", false);

    let err = manager.register(&registration("ada@example.com")).await.unwrap_err();
    assert_eq!(err.server_message(), Some("Email already registered"));
}

#[tokio::test]
async fn test_logout_always_unauthenticated_without_network() {
    let (api, store, manager) = setup_with(MemoryCredentialStore::new());
    api.seed_user("Ada", "ada@example.com", "1234567890", "secret1", false);

    // From loading
    manager.logout();
    assert_eq!(manager.current().status(), SessionStatus::Unauthenticated);

    // From authenticated
    manager.login("ada@example.com", "secret1").await.unwrap();
    let calls_before = api.call_count();
    manager.logout();
    assert_eq!(manager.current().status(), SessionStatus::Unauthenticated);
    assert_eq!(store.read().unwrap(), None);
    assert_eq!(api.call_count(), calls_before);

    // From unauthenticated
    manager.logout();
    assert_eq!(manager.current().status(), SessionStatus::Unauthenticated);
    assert_eq!(api.call_count(), calls_before);
}

#[tokio::test]
async fn test_invalid_email_rejected_before_network() {
    let (api, _store, manager) = setup_with(MemoryCredentialStore::new());

    let err = manager.register(&registration("not-an-email")).await.unwrap_err();
    assert_eq!(err, ClientError::validation("email", "Invalid email format"));
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn test_phone_digit_count_checked_client_side() {
    let (api, _store, manager) = setup_with(MemoryCredentialStore::new());

    let short = RegisterRequest {
        phone: "12345".to_string(),
        ..registration("grace@example.com")
    };
    let err = manager.register(&short).await.unwrap_err();
    assert_eq!(err, ClientError::validation("phone", "Phone must be 10-15 digits"));
    assert_eq!(api.call_count(), 0);

    // Ten digits passes the client-side check and reaches the server
    manager.register(&registration("grace@example.com")).await.unwrap();
    assert_eq!(api.calls(), vec!["register"]);
}

#[tokio::test]
async fn test_expired_credential_at_startup_is_silently_dropped() {
    let (api, store, manager) =
        setup_with(MemoryCredentialStore::with_credential(Credential::new("expired-token")));
    let mut view = manager.subscribe();
    assert!(view.borrow_and_update().is_loading());

    // initialize never surfaces an error; the view just sees an empty session
    let session = manager.initialize().await;
    assert_eq!(session.status(), SessionStatus::Unauthenticated);
    assert!(view.has_changed().unwrap());
    assert_eq!(view.borrow_and_update().status(), SessionStatus::Unauthenticated);
    assert_eq!(store.read().unwrap(), None);
    assert_eq!(api.calls(), vec!["current_user"]);
}

#[tokio::test]
async fn test_network_failure_at_startup_counts_as_no_session() {
    let (api, store, manager) =
        setup_with(MemoryCredentialStore::with_credential(Credential::new("any")));
    api.fail_next(ClientError::Network("connection refused".into()));

    let session = manager.initialize().await;
    assert_eq!(session.status(), SessionStatus::Unauthenticated);
    assert_eq!(store.read().unwrap(), None);
}

#[tokio::test]
async fn test_persisted_credential_restores_session() {
    let store = MemoryCredentialStore::new();
    let (api, store, first_run) = setup_with(store);
    let user = api.seed_user("Ada", "ada@example.com", "1234567890", "secret1", true);
    first_run.login("ada@example.com", "secret1").await.unwrap();

    // A fresh manager over the same store, as after a reload
    let second_run = SessionManager::new(api.clone(), store.clone());
    let session = second_run.initialize().await;
    assert_eq!(session.status(), SessionStatus::Authenticated(user));
    assert!(session.is_admin());
    assert!(session.has_credential());
}

//! Session management for the blog client

use std::sync::Arc;

use common::BlogApi;
use common::error::{ClientError, ClientResult};
use common::models::{RegisterRequest, User};
use common::storage::{Credential, CredentialStore};
use tokio::sync::{OnceCell, watch};
use tracing::{debug, info, warn};

use crate::models::{LoginForm, Session};
use crate::validation;

/// Owner of the process-wide authentication state
///
/// Consumers read the session through [`SessionManager::current`] or a
/// [`watch::Receiver`] from [`SessionManager::subscribe`]; only this type
/// writes it or touches the persisted credential.
pub struct SessionManager {
    api: Arc<dyn BlogApi>,
    credentials: Arc<dyn CredentialStore>,
    state: watch::Sender<Session>,
    initialized: OnceCell<()>,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(api: Arc<dyn BlogApi>, credentials: Arc<dyn CredentialStore>) -> Self {
        let (state, _) = watch::channel(Session::loading());
        Self {
            api,
            credentials,
            state,
            initialized: OnceCell::new(),
        }
    }

    /// Snapshot of the current session
    pub fn current(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Read-only view that observes every session change
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Resolve a persisted credential into a session.
    ///
    /// Runs once; later calls wait for the first one and return its result.
    /// Failures are never surfaced: the credential is dropped and the session
    /// settles as unauthenticated.
    pub async fn initialize(&self) -> Session {
        self.initialized
            .get_or_init(|| async {
                let session = self.resolve_persisted().await;
                self.state.send_replace(session);
            })
            .await;
        self.current()
    }

    async fn resolve_persisted(&self) -> Session {
        let credential = match self.credentials.read() {
            Ok(Some(credential)) => credential,
            Ok(None) => {
                debug!("No persisted credential");
                return Session::unauthenticated();
            }
            Err(e) => {
                warn!("Could not read persisted credential: {}", e);
                self.discard_credential();
                return Session::unauthenticated();
            }
        };

        match self.api.current_user().await {
            Ok(user) => {
                info!("Restored session for user: {}", user.email);
                Session::authenticated(user, credential)
            }
            Err(e) => {
                debug!("Persisted credential rejected: {}", e);
                self.discard_credential();
                Session::unauthenticated()
            }
        }
    }

    /// Exchange email and password for a credential and resolve the user
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<User> {
        validation::validate_login(&LoginForm {
            email: email.to_string(),
            password: password.to_string(),
        })?;

        info!("Login attempt for user: {}", email);
        let token = self.api.issue_token(email, password).await?;
        let credential = Credential::new(token.access_token);
        self.credentials.write(&credential)?;

        match self.api.current_user().await {
            Ok(user) => {
                info!("Logged in as user: {}", user.email);
                self.state
                    .send_replace(Session::authenticated(user.clone(), credential));
                Ok(user)
            }
            Err(e) => {
                warn!("Could not resolve user after login: {}", e);
                self.discard_credential();
                self.state.send_replace(Session::unauthenticated());
                Err(e)
            }
        }
    }

    /// Register a new account; does not log in
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<User> {
        validation::validate_registration(request)?;

        info!("Registering user: {}", request.email);
        let user = self.api.register(request).await?;
        info!("Registered user: {}", user.email);
        Ok(user)
    }

    /// Drop the credential and the in-memory session. No server round-trip.
    pub fn logout(&self) {
        if let Some(user) = self.state.borrow().user() {
            info!("Logging out user: {}", user.email);
        }
        self.discard_credential();
        self.state.send_replace(Session::unauthenticated());
    }

    /// Treat an authentication failure from any call as a rejected credential.
    ///
    /// Returns whether the session was cleared.
    pub fn reject_credential(&self, error: &ClientError) -> bool {
        if !error.is_auth() {
            return false;
        }
        info!("Credential rejected by server: {}", error);
        self.logout();
        true
    }

    fn discard_credential(&self) {
        if let Err(e) = self.credentials.clear() {
            warn!("Failed to clear persisted credential: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionStatus;
    use common::storage::MemoryCredentialStore;
    use common::testing::InMemoryBlogApi;

    fn setup() -> (Arc<InMemoryBlogApi>, Arc<MemoryCredentialStore>, SessionManager) {
        let store = Arc::new(MemoryCredentialStore::new());
        let api = Arc::new(InMemoryBlogApi::new(store.clone()));
        let manager = SessionManager::new(api.clone(), store.clone());
        (api, store, manager)
    }

    #[tokio::test]
    async fn starts_loading_and_settles_without_credential() {
        let (api, _store, manager) = setup();
        assert_eq!(manager.current().status(), SessionStatus::Loading);

        let session = manager.initialize().await;
        assert_eq!(session.status(), SessionStatus::Unauthenticated);
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn initialize_runs_once() {
        let (api, store, manager) = setup();
        let user = api.seed_user("Ada", "ada@example.com", "1234567890", "secret1", false);
        let token = api.issue_token("ada@example.com", "secret1").await.unwrap();
        store.write(&Credential::new(token.access_token)).unwrap();

        let first = manager.initialize().await;
        let second = manager.initialize().await;
        assert_eq!(first.status(), SessionStatus::Authenticated(user));
        assert_eq!(first, second);
        assert_eq!(api.calls(), vec!["issue_token", "current_user"]);
    }

    #[tokio::test]
    async fn reject_credential_only_on_auth_errors() {
        let (api, store, manager) = setup();
        api.seed_user("Ada", "ada@example.com", "1234567890", "secret1", false);
        manager.login("ada@example.com", "secret1").await.unwrap();

        assert!(!manager.reject_credential(&ClientError::not_found("Post not found")));
        assert!(manager.current().is_authenticated());

        assert!(manager.reject_credential(&ClientError::auth("Could not validate credentials")));
        assert_eq!(manager.current().status(), SessionStatus::Unauthenticated);
        assert_eq!(store.read().unwrap(), None);
    }

    #[tokio::test]
    async fn failed_user_resolution_after_login_clears_credential() {
        let (api, store, manager) = setup();
        api.seed_user("Ada", "ada@example.com", "1234567890", "secret1", false);
        api.fail_on("current_user", ClientError::Network("connection reset".into()));

        let err = manager.login("ada@example.com", "secret1").await.unwrap_err();
        assert_eq!(err, ClientError::Network("connection reset".into()));
        assert_eq!(store.read().unwrap(), None);
        assert_eq!(manager.current().status(), SessionStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn login_requires_both_fields() {
        let (api, _store, manager) = setup();
        let err = manager.login("ada@example.com", "").await.unwrap_err();
        assert_eq!(err, ClientError::validation("password", "Password is required"));
        assert_eq!(api.call_count(), 0);
    }
}

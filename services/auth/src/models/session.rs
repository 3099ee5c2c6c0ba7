//! Session model and related functionality

use common::models::User;
use common::storage::Credential;

/// Client-side record of the current authenticated user and credential
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<User>,
    credential: Option<Credential>,
    resolved: bool,
}

/// Where a session stands in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// Startup credential check has not finished
    Loading,
    Unauthenticated,
    Authenticated(User),
}

impl Session {
    /// Session before the startup credential check
    pub fn loading() -> Self {
        Self::default()
    }

    /// Settled session without a user
    pub fn unauthenticated() -> Self {
        Self {
            user: None,
            credential: None,
            resolved: true,
        }
    }

    /// Settled session for `user`
    pub fn authenticated(user: User, credential: Credential) -> Self {
        Self {
            user: Some(user),
            credential: Some(credential),
            resolved: true,
        }
    }

    pub fn status(&self) -> SessionStatus {
        match (&self.user, self.resolved) {
            (_, false) => SessionStatus::Loading,
            (Some(user), true) => SessionStatus::Authenticated(user.clone()),
            (None, true) => SessionStatus::Unauthenticated,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        !self.resolved
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|user| user.is_admin)
    }

    /// Whether a credential backs this session
    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }
}

/// Login form input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

//! Login form

use common::ClientError;
use tracing::error;

use crate::routes::Route;
use crate::state::AppState;

pub const LOGIN_FAILED: &str = "Invalid email or password";

pub struct LoginView {
    state: AppState,
}

impl LoginView {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Log in and return the landing route for the user
    pub async fn submit(&self, email: &str, password: &str) -> Result<Route, String> {
        match self.state.session.login(email, password).await {
            Ok(user) => Ok(Route::landing(&user)),
            Err(e @ ClientError::Validation { field: Some(_), .. }) => Err(e.to_string()),
            Err(e) => {
                error!("Login failed: {}", e);
                Err(LOGIN_FAILED.to_string())
            }
        }
    }
}

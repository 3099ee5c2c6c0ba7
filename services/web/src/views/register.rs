//! Registration form

use common::models::RegisterRequest;
use tracing::error;

use crate::routes::Route;
use crate::state::AppState;

pub const REGISTER_FAILED: &str = "Registration failed";

pub struct RegisterView {
    state: AppState,
}

impl RegisterView {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Create the account and send the user to the login screen.
    ///
    /// Client-side checks and server rejections come back verbatim.
    pub async fn submit(&self, request: &RegisterRequest) -> Result<Route, String> {
        match self.state.session.register(request).await {
            Ok(_) => Ok(Route::Login),
            Err(e) => {
                error!("Registration failed: {}", e);
                Err(e
                    .server_message()
                    .unwrap_or(REGISTER_FAILED)
                    .to_string())
            }
        }
    }
}

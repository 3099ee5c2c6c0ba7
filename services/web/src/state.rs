//! Application state shared across views

use std::sync::Arc;

use auth::SessionManager;
use common::config::ClientConfig;
use common::storage::{CredentialStore, FileCredentialStore};
use common::{BlogApi, ClientError, ClientResult, HttpBlogClient};
use tracing::{debug, info};

/// Application state shared across views
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn BlogApi>,
    pub session: Arc<SessionManager>,
}

impl AppState {
    /// Wire the session manager to `api`, persisting through `credentials`
    pub fn new(api: Arc<dyn BlogApi>, credentials: Arc<dyn CredentialStore>) -> Self {
        let session = Arc::new(SessionManager::new(api.clone(), credentials));
        Self { api, session }
    }

    /// State backed by the HTTP API and the credential file from `config`
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let path = config.credential_path();
        debug!("Credential file: {}", path.display());
        let credentials: Arc<dyn CredentialStore> =
            Arc::new(FileCredentialStore::new(path, &config.storage_key));
        let api = Arc::new(HttpBlogClient::new(config, credentials.clone())?);

        info!("Blog client initialized for {}", config.api_base_url);
        Ok(Self::new(api, credentials))
    }

    /// Feed a failed call back into the session; a 401 ends it
    pub fn report(&self, error: &ClientError) {
        if self.session.reject_credential(error) {
            debug!("Session ended after rejected credential");
        }
    }
}

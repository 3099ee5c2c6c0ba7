//! Credential persistence for the blog client
//!
//! The bearer credential survives restarts by living in a small key-value
//! store. The session manager is the only writer; the HTTP client reads it on
//! every outgoing request.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Opaque bearer credential issued by the server
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Narrow persistence capability for the credential
pub trait CredentialStore: Send + Sync {
    /// Read the persisted credential, if any
    fn read(&self) -> ClientResult<Option<Credential>>;

    /// Persist the credential, replacing any previous one
    fn write(&self, credential: &Credential) -> ClientResult<()>;

    /// Remove the persisted credential; clearing an empty store is not an error
    fn clear(&self) -> ClientResult<()>;
}

/// In-process store, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    credential: Mutex<Option<Credential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a credential, as if persisted by an earlier run
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            credential: Mutex::new(Some(credential)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn read(&self) -> ClientResult<Option<Credential>> {
        Ok(self
            .credential
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn write(&self, credential: &Credential) -> ClientResult<()> {
        *self.credential.lock().unwrap_or_else(PoisonError::into_inner) = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        self.credential
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}

/// JSON file store: `{"<storage key>": "<credential>"}`
///
/// Writes go through a temporary file and an atomic rename so a crash never
/// leaves a truncated file behind. Other keys in the file are preserved.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
    key: String,
}

impl FileCredentialStore {
    /// Create a store for `key` inside the JSON file at `path`
    pub fn new(path: impl Into<PathBuf>, key: &str) -> Self {
        Self {
            path: path.into(),
            key: key.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> ClientResult<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| storage_error(&self.path, e))?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            ClientError::Storage(format!("{} is not valid JSON: {}", self.path.display(), e))
        })
    }

    fn save(&self, entries: &HashMap<String, String>) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| storage_error(parent, e))?;
            }
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| ClientError::Storage(e.to_string()))?;

        let tmp_path = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp_path).map_err(|e| storage_error(&tmp_path, e))?;
            restrict_permissions(&file, &tmp_path)?;
            file.write_all(json.as_bytes())
                .and_then(|()| file.sync_all())
                .map_err(|e| storage_error(&tmp_path, e))?;
        }
        fs::rename(&tmp_path, &self.path).map_err(|e| storage_error(&self.path, e))?;

        debug!("Credential file written: {}", self.path.display());
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn read(&self) -> ClientResult<Option<Credential>> {
        Ok(self.load()?.remove(&self.key).map(Credential))
    }

    fn write(&self, credential: &Credential) -> ClientResult<()> {
        let mut entries = self.load()?;
        entries.insert(self.key.clone(), credential.as_str().to_string());
        self.save(&entries)
    }

    fn clear(&self) -> ClientResult<()> {
        // An unreadable file holds nothing worth keeping
        let mut entries = self.load().unwrap_or_default();
        entries.remove(&self.key);
        if entries.is_empty() {
            if self.path.exists() {
                fs::remove_file(&self.path).map_err(|e| storage_error(&self.path, e))?;
            }
            return Ok(());
        }
        self.save(&entries)
    }
}

fn storage_error(path: &Path, err: std::io::Error) -> ClientError {
    ClientError::Storage(format!("{}: {}", path.display(), err))
}

#[cfg(unix)]
fn restrict_permissions(file: &fs::File, path: &Path) -> ClientResult<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o600))
        .map_err(|e| storage_error(path, e))
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &fs::File, _path: &Path) -> ClientResult<()> {
    Ok(())
}

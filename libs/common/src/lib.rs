//! Common library for the blog client
//!
//! This crate provides the pieces shared by the session layer and the views:
//! the server-shaped models, the error taxonomy, configuration, credential
//! persistence and the HTTP client for the blog API.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use client::{BlogApi, HttpBlogClient};
pub use error::{ClientError, ClientResult};

/// Example usage of the HTTP client
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use common::{BlogApi, HttpBlogClient, config::ClientConfig, storage::FileCredentialStore};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ClientConfig::from_env()?;
///     let store = Arc::new(FileCredentialStore::new(config.credential_path(), &config.storage_key));
///     let client = HttpBlogClient::new(&config, store)?;
///     for post in client.list_posts(Default::default()).await? {
///         println!("{} ({} likes)", post.title, post.like_count);
///     }
///     Ok(())
/// }
/// ```
pub fn example_usage() {}

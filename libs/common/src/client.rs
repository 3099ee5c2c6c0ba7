//! HTTP client for the blog API
//!
//! [`BlogApi`] is the seam every view and the session manager talk through.
//! [`HttpBlogClient`] implements it with `reqwest`, attaching the persisted
//! bearer credential to each request.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, detail_message};
use crate::models::{
    AccessToken, Comment, NewComment, NewPost, Page, Post, PostId, RegisterRequest, User, UserId,
};
use crate::storage::CredentialStore;

/// Calls offered by the blog API
#[async_trait]
pub trait BlogApi: Send + Sync {
    /// `GET /users/me`
    async fn current_user(&self) -> ClientResult<User>;

    /// `POST /auth/token`, form-encoded `username` and `password`
    async fn issue_token(&self, email: &str, password: &str) -> ClientResult<AccessToken>;

    /// `POST /auth/register`
    async fn register(&self, request: &RegisterRequest) -> ClientResult<User>;

    /// `GET /posts`
    async fn list_posts(&self, page: Page) -> ClientResult<Vec<Post>>;

    /// `GET /posts/{id}`, including comments
    async fn get_post(&self, id: PostId) -> ClientResult<Post>;

    /// `POST /posts`
    async fn create_post(&self, post: &NewPost) -> ClientResult<Post>;

    /// `DELETE /posts/{id}`
    async fn delete_post(&self, id: PostId) -> ClientResult<()>;

    /// `POST /posts/{id}/like`
    async fn like_post(&self, id: PostId) -> ClientResult<()>;

    /// `POST /posts/{id}/unlike`
    async fn unlike_post(&self, id: PostId) -> ClientResult<()>;

    /// `POST /posts/{id}/comments`
    async fn create_comment(&self, post_id: PostId, comment: &NewComment) -> ClientResult<Comment>;

    /// `POST /users/{id}/follow`
    async fn follow_user(&self, id: UserId) -> ClientResult<()>;

    /// `POST /users/{id}/unfollow`
    async fn unfollow_user(&self, id: UserId) -> ClientResult<()>;

    /// `GET /admin/users`
    async fn list_users(&self, page: Page) -> ClientResult<Vec<User>>;

    /// `DELETE /admin/users/{id}`, returns the deleted user
    async fn delete_user(&self, id: UserId) -> ClientResult<User>;
}

/// `reqwest` implementation of [`BlogApi`]
#[derive(Clone)]
pub struct HttpBlogClient {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
}

impl HttpBlogClient {
    /// Create a client for the configured API, reading credentials from `credentials`
    pub fn new(config: &ClientConfig, credentials: Arc<dyn CredentialStore>) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attaches the persisted credential, if any, as a bearer token.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credentials.read() {
            Ok(Some(credential)) => request.bearer_auth(credential.as_str()),
            Ok(None) => request,
            Err(e) => {
                warn!("Could not read stored credential, sending anonymously: {}", e);
                request
            }
        }
    }

    async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        debug!("{} {}", status.as_u16(), response.url().path());

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::from_status(status.as_u16(), detail_message(&body)))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn send_empty(&self, request: RequestBuilder) -> ClientResult<()> {
        self.send(request).await.map(|_| ())
    }
}

#[async_trait]
impl BlogApi for HttpBlogClient {
    async fn current_user(&self) -> ClientResult<User> {
        self.send_json(self.client.get(self.url("/users/me"))).await
    }

    async fn issue_token(&self, email: &str, password: &str) -> ClientResult<AccessToken> {
        let form = [("username", email), ("password", password)];
        self.send_json(self.client.post(self.url("/auth/token")).form(&form))
            .await
    }

    async fn register(&self, request: &RegisterRequest) -> ClientResult<User> {
        self.send_json(self.client.post(self.url("/auth/register")).json(request))
            .await
    }

    async fn list_posts(&self, page: Page) -> ClientResult<Vec<Post>> {
        self.send_json(self.client.get(self.url("/posts")).query(&page))
            .await
    }

    async fn get_post(&self, id: PostId) -> ClientResult<Post> {
        self.send_json(self.client.get(self.url(&format!("/posts/{id}"))))
            .await
    }

    async fn create_post(&self, post: &NewPost) -> ClientResult<Post> {
        self.send_json(self.client.post(self.url("/posts")).json(post))
            .await
    }

    async fn delete_post(&self, id: PostId) -> ClientResult<()> {
        self.send_empty(self.client.delete(self.url(&format!("/posts/{id}"))))
            .await
    }

    async fn like_post(&self, id: PostId) -> ClientResult<()> {
        self.send_empty(self.client.post(self.url(&format!("/posts/{id}/like"))))
            .await
    }

    async fn unlike_post(&self, id: PostId) -> ClientResult<()> {
        self.send_empty(self.client.post(self.url(&format!("/posts/{id}/unlike"))))
            .await
    }

    async fn create_comment(&self, post_id: PostId, comment: &NewComment) -> ClientResult<Comment> {
        self.send_json(
            self.client
                .post(self.url(&format!("/posts/{post_id}/comments")))
                .json(comment),
        )
        .await
    }

    async fn follow_user(&self, id: UserId) -> ClientResult<()> {
        self.send_empty(self.client.post(self.url(&format!("/users/{id}/follow"))))
            .await
    }

    async fn unfollow_user(&self, id: UserId) -> ClientResult<()> {
        self.send_empty(self.client.post(self.url(&format!("/users/{id}/unfollow"))))
            .await
    }

    async fn list_users(&self, page: Page) -> ClientResult<Vec<User>> {
        self.send_json(self.client.get(self.url("/admin/users")).query(&page))
            .await
    }

    async fn delete_user(&self, id: UserId) -> ClientResult<User> {
        self.send_json(self.client.delete(self.url(&format!("/admin/users/{id}"))))
            .await
    }
}

//! In-memory stand-in for the blog API
//!
//! Behaves like the real server for the calls the client makes: issues
//! tokens, resolves the caller from the shared [`CredentialStore`], enforces
//! author/admin rules and reports errors with the server's messages. Tests can
//! inject failures, inspect which calls were made and hold like/unlike
//! requests open to observe optimistic state.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Notify;

use crate::client::BlogApi;
use crate::error::{ClientError, ClientResult};
use crate::models::{
    AccessToken, Comment, NewComment, NewPost, Page, Post, PostId, RegisterRequest, User, UserId,
};
use crate::storage::CredentialStore;

#[derive(Debug)]
struct Account {
    user: User,
    password: String,
}

#[derive(Debug, Default)]
struct FakeState {
    accounts: Vec<Account>,
    posts: Vec<Post>,
    likes: HashSet<(PostId, UserId)>,
    follows: HashSet<(UserId, UserId)>,
    tokens: HashMap<String, UserId>,
    next_id: i64,
    failures: Vec<(Option<&'static str>, ClientError)>,
    calls: Vec<&'static str>,
    pending_mutations: usize,
}

impl FakeState {
    /// Takes the first queued failure that applies to `call`
    fn take_failure(&mut self, call: &'static str) -> Option<ClientError> {
        let index = self
            .failures
            .iter()
            .position(|(target, _)| target.is_none_or(|target| target == call))?;
        Some(self.failures.remove(index).1)
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn user(&self, id: UserId) -> Option<&User> {
        self.accounts
            .iter()
            .map(|account| &account.user)
            .find(|user| user.id == id)
    }

    fn post_index(&self, id: PostId) -> ClientResult<usize> {
        self.posts
            .iter()
            .position(|post| post.id == id)
            .ok_or_else(|| ClientError::not_found("Post not found"))
    }

    /// Post as seen by `viewer`, with like fields filled in
    fn view(&self, post: &Post, viewer: Option<&User>) -> Post {
        let mut post = post.clone();
        post.like_count = self.likes.iter().filter(|(id, _)| *id == post.id).count() as u64;
        post.is_liked = viewer.is_some_and(|user| self.likes.contains(&(post.id, user.id)));
        post
    }
}

/// Fake blog API backed by in-memory state
pub struct InMemoryBlogApi {
    credentials: Arc<dyn CredentialStore>,
    state: Mutex<FakeState>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl InMemoryBlogApi {
    /// Create an empty API that reads the caller's credential from `credentials`
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            credentials,
            state: Mutex::new(FakeState::default()),
            gate: Mutex::new(None),
        }
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add an account directly, bypassing registration
    pub fn seed_user(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        password: &str,
        is_admin: bool,
    ) -> User {
        let mut state = self.state();
        let user = User {
            id: state.next_id(),
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            is_admin,
        };
        state.accounts.push(Account {
            user: user.clone(),
            password: password.to_string(),
        });
        user
    }

    /// Add a post authored by `author`
    pub fn seed_post(&self, author: &User, title: &str, content: &str) -> Post {
        let mut state = self.state();
        let post = Post {
            id: state.next_id(),
            title: title.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
            author_id: author.id,
            author: author.clone(),
            like_count: 0,
            is_liked: false,
            comments: Vec::new(),
        };
        state.posts.push(post.clone());
        post
    }

    /// Record an existing like, as if made in an earlier session
    pub fn seed_like(&self, post_id: PostId, user_id: UserId) {
        self.state().likes.insert((post_id, user_id));
    }

    /// Make the next call fail with `error`; queued failures apply in order
    pub fn fail_next(&self, error: ClientError) {
        self.state().failures.push((None, error));
    }

    /// Make the next call named `call` (e.g. `"like_post"`) fail with `error`
    pub fn fail_on(&self, call: &'static str, error: ClientError) {
        self.state().failures.push((Some(call), error));
    }

    /// Invalidate every issued token, as an expiry would
    pub fn revoke_tokens(&self) {
        self.state().tokens.clear();
    }

    /// Names of the calls made so far, in order
    pub fn calls(&self) -> Vec<&'static str> {
        self.state().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    /// Hold like/unlike requests until the returned handle is notified.
    ///
    /// Each `notify_one` releases one waiting request.
    pub fn hold_mutations(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock().unwrap_or_else(PoisonError::into_inner) = Some(notify.clone());
        notify
    }

    /// Number of like/unlike requests currently held
    pub fn pending_mutations(&self) -> usize {
        self.state().pending_mutations
    }

    /// Server-side like count of a post
    pub fn like_count(&self, post_id: PostId) -> usize {
        self.state()
            .likes
            .iter()
            .filter(|(id, _)| *id == post_id)
            .count()
    }

    pub fn is_liked_by(&self, post_id: PostId, user_id: UserId) -> bool {
        self.state().likes.contains(&(post_id, user_id))
    }

    pub fn is_following(&self, follower: UserId, followed: UserId) -> bool {
        self.state().follows.contains(&(follower, followed))
    }

    pub fn user_exists(&self, id: UserId) -> bool {
        self.state().user(id).is_some()
    }

    pub fn post_exists(&self, id: PostId) -> bool {
        self.state().post_index(id).is_ok()
    }

    /// Records the call and applies any queued failure.
    fn begin(&self, call: &'static str) -> ClientResult<MutexGuard<'_, FakeState>> {
        let mut state = self.state();
        state.calls.push(call);
        match state.take_failure(call) {
            Some(error) => Err(error),
            None => Ok(state),
        }
    }

    async fn begin_mutation(&self, call: &'static str) -> ClientResult<MutexGuard<'_, FakeState>> {
        self.state().calls.push(call);

        let gate = self
            .gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(gate) = gate {
            self.state().pending_mutations += 1;
            gate.notified().await;
            self.state().pending_mutations -= 1;
        }

        let mut state = self.state();
        match state.take_failure(call) {
            Some(error) => Err(error),
            None => Ok(state),
        }
    }

    /// Resolves the caller from the stored credential.
    fn caller(&self, state: &FakeState) -> ClientResult<User> {
        let credential = self
            .credentials
            .read()?
            .ok_or_else(|| ClientError::auth("Not authenticated"))?;
        state
            .tokens
            .get(credential.as_str())
            .and_then(|id| state.user(*id))
            .cloned()
            .ok_or_else(|| ClientError::auth("Could not validate credentials"))
    }

    fn admin(&self, state: &FakeState) -> ClientResult<User> {
        let user = self.caller(state)?;
        if !user.is_admin {
            return Err(ClientError::forbidden("Not enough permissions"));
        }
        Ok(user)
    }
}

#[async_trait]
impl BlogApi for InMemoryBlogApi {
    async fn current_user(&self) -> ClientResult<User> {
        let state = self.begin("current_user")?;
        self.caller(&state)
    }

    async fn issue_token(&self, email: &str, password: &str) -> ClientResult<AccessToken> {
        let mut state = self.begin("issue_token")?;
        let user_id = state
            .accounts
            .iter()
            .find(|account| account.user.email == email && account.password == password)
            .map(|account| account.user.id)
            .ok_or_else(|| ClientError::auth("Incorrect email or password"))?;

        let token = format!("token-{}-{}", user_id, state.next_id());
        state.tokens.insert(token.clone(), user_id);
        Ok(AccessToken {
            access_token: token,
            token_type: "bearer".to_string(),
        })
    }

    async fn register(&self, request: &RegisterRequest) -> ClientResult<User> {
        let mut state = self.begin("register")?;
        if state
            .accounts
            .iter()
            .any(|account| account.user.email == request.email)
        {
            return Err(ClientError::rejected("Email already registered"));
        }

        let user = User {
            id: state.next_id(),
            name: request.name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            is_admin: false,
        };
        state.accounts.push(Account {
            user: user.clone(),
            password: request.password.clone(),
        });
        Ok(user)
    }

    async fn list_posts(&self, page: Page) -> ClientResult<Vec<Post>> {
        let state = self.begin("list_posts")?;
        let viewer = self.caller(&state).ok();
        Ok(state
            .posts
            .iter()
            .rev()
            .skip(page.skip as usize)
            .take(page.limit as usize)
            .map(|post| {
                let mut post = state.view(post, viewer.as_ref());
                post.comments.clear();
                post
            })
            .collect())
    }

    async fn get_post(&self, id: PostId) -> ClientResult<Post> {
        let state = self.begin("get_post")?;
        let viewer = self.caller(&state).ok();
        let index = state.post_index(id)?;
        Ok(state.view(&state.posts[index], viewer.as_ref()))
    }

    async fn create_post(&self, post: &NewPost) -> ClientResult<Post> {
        let mut state = self.begin("create_post")?;
        let author = self.caller(&state)?;
        let post = Post {
            id: state.next_id(),
            title: post.title.clone(),
            content: post.content.clone(),
            created_at: Utc::now(),
            author_id: author.id,
            author,
            like_count: 0,
            is_liked: false,
            comments: Vec::new(),
        };
        state.posts.push(post.clone());
        Ok(post)
    }

    async fn delete_post(&self, id: PostId) -> ClientResult<()> {
        let mut state = self.begin("delete_post")?;
        let user = self.caller(&state)?;
        let index = state.post_index(id)?;
        if !state.posts[index].can_be_deleted_by(&user) {
            return Err(ClientError::forbidden("Not authorized to delete this post"));
        }
        state.posts.remove(index);
        state.likes.retain(|(post_id, _)| *post_id != id);
        Ok(())
    }

    async fn like_post(&self, id: PostId) -> ClientResult<()> {
        let mut state = self.begin_mutation("like_post").await?;
        let user = self.caller(&state)?;
        state.post_index(id)?;
        if !state.likes.insert((id, user.id)) {
            return Err(ClientError::rejected("Cannot like post"));
        }
        Ok(())
    }

    async fn unlike_post(&self, id: PostId) -> ClientResult<()> {
        let mut state = self.begin_mutation("unlike_post").await?;
        let user = self.caller(&state)?;
        state.post_index(id)?;
        if !state.likes.remove(&(id, user.id)) {
            return Err(ClientError::rejected("Cannot unlike post"));
        }
        Ok(())
    }

    async fn create_comment(&self, post_id: PostId, comment: &NewComment) -> ClientResult<Comment> {
        let mut state = self.begin("create_comment")?;
        let user = self.caller(&state)?;
        let index = state.post_index(post_id)?;
        let comment = Comment {
            id: state.next_id(),
            content: comment.content.clone(),
            created_at: Utc::now(),
            user_id: user.id,
            user,
        };
        state.posts[index].comments.push(comment.clone());
        Ok(comment)
    }

    async fn follow_user(&self, id: UserId) -> ClientResult<()> {
        let mut state = self.begin("follow_user")?;
        let user = self.caller(&state)?;
        if user.id == id {
            return Err(ClientError::rejected("Cannot follow yourself"));
        }
        if state.user(id).is_none() || !state.follows.insert((user.id, id)) {
            return Err(ClientError::rejected("Cannot follow user"));
        }
        Ok(())
    }

    async fn unfollow_user(&self, id: UserId) -> ClientResult<()> {
        let mut state = self.begin("unfollow_user")?;
        let user = self.caller(&state)?;
        if !state.follows.remove(&(user.id, id)) {
            return Err(ClientError::rejected("Cannot unfollow user"));
        }
        Ok(())
    }

    async fn list_users(&self, page: Page) -> ClientResult<Vec<User>> {
        let state = self.begin("list_users")?;
        self.admin(&state)?;
        Ok(state
            .accounts
            .iter()
            .skip(page.skip as usize)
            .take(page.limit as usize)
            .map(|account| account.user.clone())
            .collect())
    }

    async fn delete_user(&self, id: UserId) -> ClientResult<User> {
        let mut state = self.begin("delete_user")?;
        let admin = self.admin(&state)?;
        if admin.id == id {
            return Err(ClientError::rejected("Cannot delete your own admin account"));
        }
        let index = state
            .accounts
            .iter()
            .position(|account| account.user.id == id)
            .ok_or_else(|| ClientError::not_found("User not found"))?;

        let removed = state.accounts.remove(index).user;
        state.tokens.retain(|_, user_id| *user_id != id);
        state.likes.retain(|(_, user_id)| *user_id != id);
        Ok(removed)
    }
}

//! Session layer for the blog client
//!
//! Owns the authenticated user and the persisted credential, checks forms
//! before they reach the server, and decides whether a route may be shown.

pub mod guard;
pub mod models;
pub mod session;
pub mod validation;

pub use models::{Session, SessionStatus};
pub use session::SessionManager;

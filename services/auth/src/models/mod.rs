//! Session layer models

pub mod session;

// Re-export for convenience
pub use session::{LoginForm, Session, SessionStatus};

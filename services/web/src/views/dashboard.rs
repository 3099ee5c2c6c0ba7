//! Profile of the signed-in user

use auth::Session;
use common::models::User;

pub struct DashboardView {
    user: User,
}

impl DashboardView {
    /// `None` without a signed-in user
    pub fn from_session(session: &Session) -> Option<Self> {
        session.user().cloned().map(|user| Self { user })
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn render(&self) -> String {
        format!(
            "Welcome, {}\nEmail: {}\nPhone: {}\nRole: {}\n",
            self.user.name,
            self.user.email,
            self.user.phone,
            self.user.role()
        )
    }
}

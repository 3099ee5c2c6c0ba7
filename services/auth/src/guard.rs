//! Route guarding from session state
//!
//! A pure read of the session: whether a screen may be shown, must wait for
//! the startup check, or should send the user elsewhere.

use crate::models::Session;

/// Path of the login screen
pub const LOGIN_PATH: &str = "/login";

/// Path non-admins are sent to from admin screens
pub const DASHBOARD_PATH: &str = "/dashboard";

/// What a route needs from the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Public,
    Authenticated,
    Admin,
}

/// Guard decision for a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    /// Session still loading; show a neutral loading state
    Pending,
    Redirect(&'static str),
}

/// Decide whether a route with `requirement` may be shown for `session`
pub fn check(session: &Session, requirement: Requirement) -> Access {
    if requirement == Requirement::Public {
        return Access::Allow;
    }
    if session.is_loading() {
        return Access::Pending;
    }
    if !session.is_authenticated() {
        return Access::Redirect(LOGIN_PATH);
    }
    if requirement == Requirement::Admin && !session.is_admin() {
        return Access::Redirect(DASHBOARD_PATH);
    }
    Access::Allow
}

//! Screens of the client and the guards in front of them

use std::fmt;

use auth::Session;
use auth::guard::{self, Access, Requirement};
use common::models::{PostId, User};

/// Every screen the client can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Feed,
    Dashboard,
    CreatePost,
    Post(PostId),
    Admin,
}

impl Route {
    /// Parse a path such as `/posts/3`
    pub fn parse(path: &str) -> Option<Self> {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        match path {
            "/login" => Some(Route::Login),
            "/register" => Some(Route::Register),
            "/" => Some(Route::Feed),
            "/dashboard" => Some(Route::Dashboard),
            "/create-post" => Some(Route::CreatePost),
            "/admin" => Some(Route::Admin),
            _ => path
                .strip_prefix("/posts/")
                .and_then(|id| id.parse().ok())
                .map(Route::Post),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Feed => "/".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::CreatePost => "/create-post".to_string(),
            Route::Post(id) => format!("/posts/{id}"),
            Route::Admin => "/admin".to_string(),
        }
    }

    pub fn requirement(&self) -> Requirement {
        match self {
            Route::Login | Route::Register => Requirement::Public,
            Route::Admin => Requirement::Admin,
            Route::Feed | Route::Dashboard | Route::CreatePost | Route::Post(_) => {
                Requirement::Authenticated
            }
        }
    }

    /// Guard decision for showing this route to `session`
    pub fn resolve(&self, session: &Session) -> Access {
        guard::check(session, self.requirement())
    }

    /// Where a user goes right after logging in
    pub fn landing(user: &User) -> Self {
        if user.is_admin { Route::Admin } else { Route::Feed }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::storage::Credential;

    fn user(is_admin: bool) -> User {
        User {
            id: 1,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            phone: "1234567890".into(),
            is_admin,
        }
    }

    #[test]
    fn parses_every_path() {
        for route in [
            Route::Login,
            Route::Register,
            Route::Feed,
            Route::Dashboard,
            Route::CreatePost,
            Route::Post(42),
            Route::Admin,
        ] {
            assert_eq!(Route::parse(&route.path()), Some(route));
        }
        assert_eq!(Route::parse("/posts/7/"), Some(Route::Post(7)));
        assert_eq!(Route::parse("/posts/abc"), None);
        assert_eq!(Route::parse("/settings"), None);
    }

    #[test]
    fn admin_lands_on_admin_screen() {
        assert_eq!(Route::landing(&user(true)), Route::Admin);
        assert_eq!(Route::landing(&user(false)), Route::Feed);
    }

    #[test]
    fn guards_follow_requirements() {
        let member = Session::authenticated(user(false), Credential::new("t"));
        assert_eq!(Route::Login.resolve(&Session::loading()), Access::Allow);
        assert_eq!(Route::Post(1).resolve(&Session::loading()), Access::Pending);
        assert_eq!(
            Route::CreatePost.resolve(&Session::unauthenticated()),
            Access::Redirect("/login")
        );
        assert_eq!(Route::Admin.resolve(&member), Access::Redirect("/dashboard"));
        assert_eq!(Route::Dashboard.resolve(&member), Access::Allow);
    }
}

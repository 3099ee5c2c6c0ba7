//! User model and related payloads

use serde::{Deserialize, Serialize};

/// Server-assigned user identifier
pub type UserId = i64;

/// User as the API returns it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    /// Role label shown on the dashboard and admin tables
    pub fn role(&self) -> &'static str {
        if self.is_admin { "Admin" } else { "User" }
    }
}

/// Registration payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: String,
}

/// Response of the token endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default = "bearer")]
    pub token_type: String,
}

fn bearer() -> String {
    "bearer".to_string()
}

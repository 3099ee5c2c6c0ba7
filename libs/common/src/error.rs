//! Error taxonomy for the blog client
//!
//! Every call against the API, every client-side form check and every
//! credential storage operation reports failures through [`ClientError`].

use serde::Deserialize;
use thiserror::Error;

/// Custom error type for client operations
///
/// Variants carrying an `Option<String>` hold the server's `detail` message
/// when the response had one; `None` means the text shown is a generic default.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Bad credentials, expired session or no session at all (HTTP 401)
    #[error("Authentication error: {}", message_or_default(.0, &401))]
    Auth(Option<String>),

    /// The session is valid but not allowed to do this (HTTP 403)
    #[error("Forbidden: {}", message_or_default(.0, &403))]
    Forbidden(Option<String>),

    /// Rejected input, either by a client-side check or by the server
    #[error("{}", message_or_default(.message, &422))]
    Validation {
        /// Form field the message refers to, when known
        field: Option<&'static str>,
        message: Option<String>,
    },

    /// Missing resource (HTTP 404)
    #[error("Not found: {}", message_or_default(.0, &404))]
    NotFound(Option<String>),

    /// Transport failure, the request never got a response
    #[error("Network error: {0}")]
    Network(String),

    /// Any other non-success status
    #[error("Server error ({status}): {}", message_or_default(.message, .status))]
    Server {
        status: u16,
        message: Option<String>,
    },

    /// Response body did not match the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Credential persistence failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with ClientError
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Client-side validation failure for a single form field
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ClientError::Validation {
            field: Some(field),
            message: Some(message.into()),
        }
    }

    /// Input rejected by the server with `message`
    pub fn rejected(message: impl Into<String>) -> Self {
        ClientError::Validation {
            field: None,
            message: Some(message.into()),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        ClientError::Auth(Some(message.into()))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ClientError::Forbidden(Some(message.into()))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ClientError::NotFound(Some(message.into()))
    }

    /// Builds the error for a non-success HTTP status and its `detail` message.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            400 | 409 | 422 => ClientError::Validation {
                field: None,
                message,
            },
            401 => ClientError::Auth(message),
            403 => ClientError::Forbidden(message),
            404 => ClientError::NotFound(message),
            _ => ClientError::Server { status, message },
        }
    }

    /// The message the server (or a client-side check) gave.
    ///
    /// `None` when the response carried no `detail`, so callers can fall
    /// back to their own wording.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Auth(message)
            | ClientError::Forbidden(message)
            | ClientError::NotFound(message)
            | ClientError::Validation { message, .. }
            | ClientError::Server { message, .. } => message.as_deref(),
            ClientError::Network(_)
            | ClientError::Decode(_)
            | ClientError::Storage(_)
            | ClientError::Configuration(_) => None,
        }
    }

    /// Whether the server rejected the credential attached to the request
    pub fn is_auth(&self) -> bool {
        matches!(self, ClientError::Auth(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::from_status(status.as_u16(), None)
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

fn message_or_default<'a>(message: &'a Option<String>, status: &u16) -> &'a str {
    message.as_deref().unwrap_or(default_status_message(*status))
}

fn default_status_message(status: u16) -> &'static str {
    match status {
        401 => "Not authenticated",
        403 => "Not authorized",
        404 => "Not found",
        400 | 409 | 422 => "Invalid request",
        _ => "Unexpected server error",
    }
}

/// Error body produced by the API: `{"detail": "..."}` for handled errors,
/// `{"detail": [{"msg": "...", ...}]}` for request validation failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Message(String),
    Issues(Vec<ErrorIssue>),
}

#[derive(Debug, Deserialize)]
struct ErrorIssue {
    msg: String,
}

/// Extracts the human readable message from an error response body.
pub fn detail_message(body: &str) -> Option<String> {
    let body: ErrorBody = serde_json::from_str(body).ok()?;
    match body.detail {
        ErrorDetail::Message(message) => Some(message),
        ErrorDetail::Issues(issues) => issues.into_iter().next().map(|issue| issue.msg),
    }
}

//! Input validation utilities
//!
//! Client-side checks that run before a form is submitted. A failure never
//! reaches the network.

use regex::Regex;
use std::sync::OnceLock;

use common::error::{ClientError, ClientResult};
use common::models::{NewComment, NewPost, RegisterRequest};

use crate::models::LoginForm;

/// Validate display name: only an empty name is refused
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Name is required".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Failed to compile email regex"));

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate phone number: 10 to 15 ASCII digits, nothing else
pub fn validate_phone(phone: &str) -> Result<(), String> {
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex =
        PHONE_REGEX.get_or_init(|| Regex::new(r"^[0-9]{10,15}$").expect("Failed to compile phone regex"));

    if !regex.is_match(phone) {
        return Err("Phone must be 10-15 digits".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < 6 {
        return Err("Password must be at least 6 characters".to_string());
    }

    Ok(())
}

/// Validate a registration form, reporting the first failing field
pub fn validate_registration(request: &RegisterRequest) -> ClientResult<()> {
    field("name", validate_name(&request.name))?;
    field("email", validate_email(&request.email))?;
    field("phone", validate_phone(&request.phone))?;
    field("password", validate_password(&request.password))?;
    Ok(())
}

/// Validate a login form: both fields are required
pub fn validate_login(form: &LoginForm) -> ClientResult<()> {
    field("email", required("Email", &form.email))?;
    field("password", required("Password", &form.password))?;
    Ok(())
}

/// Validate a new post: title and content are required
pub fn validate_post(post: &NewPost) -> ClientResult<()> {
    field("title", required("Title", &post.title))?;
    field("content", required("Content", &post.content))?;
    Ok(())
}

/// Validate a new comment
pub fn validate_comment(comment: &NewComment) -> ClientResult<()> {
    field("content", required("Comment", &comment.content))
}

fn required(label: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{label} is required"));
    }

    Ok(())
}

fn field(name: &'static str, result: Result<(), String>) -> ClientResult<()> {
    result.map_err(|message| ClientError::validation(name, message))
}

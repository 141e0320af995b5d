//! Wire types for the blog API and the parsing step at the API boundary.
//!
//! DESIGN
//! ======
//! Response bodies are parsed from text by pure functions so every shape the
//! API can return (including the malformed ones) is testable without a
//! network. Nothing past this module sees raw JSON.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by blog API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout, body read).
    #[error("request failed: {0}")]
    Request(String),

    /// The API returned a non-success HTTP status.
    #[error("status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// IDENTITY
// =============================================================================

/// A principal confirmed by `GET /user/details`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub is_admin: bool,
    pub email: Option<String>,
    pub username: Option<String>,
}

#[derive(Deserialize)]
struct DetailsResponse {
    #[serde(default)]
    user: Option<WireUser>,
}

#[derive(Deserialize)]
struct WireUser {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "isAdmin", default)]
    is_admin: bool,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    username: Option<String>,
}

/// Parse a `/user/details` body.
///
/// `Ok(None)` when `user` is absent or null; an error when the body is not
/// JSON or the user object lacks a usable `_id`.
pub fn parse_user_details(body: &str) -> Result<Option<Identity>, ApiError> {
    let resp: DetailsResponse = serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))?;
    let Some(user) = resp.user else {
        return Ok(None);
    };
    if user.id.trim().is_empty() {
        return Err(ApiError::Parse("user._id is empty".to_owned()));
    }
    Ok(Some(Identity { id: user.id, is_admin: user.is_admin, email: user.email, username: user.username }))
}

// =============================================================================
// LOGIN
// =============================================================================

#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    access: Option<String>,
}

/// Parse a `/user/login` body. `Ok(None)` means the credentials were refused.
pub fn parse_login_response(body: &str) -> Result<Option<String>, ApiError> {
    let resp: LoginResponse = serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))?;
    Ok(resp.access.filter(|token| !token.is_empty()))
}

/// Extract the `message` field the API puts on error bodies.
pub fn error_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
}

// =============================================================================
// POSTS
// =============================================================================

/// Post author as the API returns it: either a bare name or a populated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Author {
    Name(String),
    Profile {
        #[serde(default)]
        username: Option<String>,
    },
}

/// Commenter as the API returns it: a bare user id when the reference was
/// not populated, or the user document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommentUser {
    Id(String),
    Profile {
        #[serde(default)]
        username: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub user: Option<CommentUser>,
}

impl Comment {
    #[must_use]
    pub fn commenter_name(&self) -> &str {
        match &self.user {
            Some(CommentUser::Profile { username: Some(name) }) if !name.is_empty() => name.as_str(),
            _ => "anonymous",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Post {
    /// Display name for the author, falling back to `"Unknown Author"`.
    #[must_use]
    pub fn author_name(&self) -> &str {
        match &self.author {
            Some(Author::Name(name)) if !name.is_empty() => name.as_str(),
            Some(Author::Profile { username: Some(name) }) if !name.is_empty() => name.as_str(),
            _ => UNKNOWN_AUTHOR,
        }
    }

    /// First `max_chars` characters of the content, with `...` when cut.
    #[must_use]
    pub fn excerpt(&self, max_chars: usize) -> String {
        let mut chars = self.content.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() { format!("{head}...") } else { head }
    }
}

/// Body for `POST /posts/addPost` and `PUT /posts/updatePost/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct NewComment<'a> {
    pub content: &'a str,
    #[serde(rename = "userId")]
    pub user_id: &'a str,
}

pub fn parse_posts(body: &str) -> Result<Vec<Post>, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))
}

pub fn parse_post(body: &str) -> Result<Post, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))
}

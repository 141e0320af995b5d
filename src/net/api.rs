//! REST API client for the remote blog service.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns `Result<_, ApiError>`. Transport failures, non-success
//! statuses and malformed bodies stay distinct here; collapsing them into a
//! user notice is the caller's job.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use reqwest::header::AUTHORIZATION;

use super::types::{
    ApiError, Identity, LoginRequest, NewComment, Post, PostDraft, error_message, parse_login_response, parse_post,
    parse_posts, parse_user_details,
};
use crate::config::{ClientConfig, Timeouts};

const USER_DETAILS_PATH: &str = "/user/details";
const USER_LOGIN_PATH: &str = "/user/login";
const POSTS_LIST_PATH: &str = "/posts/getPosts";
const POSTS_ADD_PATH: &str = "/posts/addPost";

fn post_endpoint(post_id: &str) -> String {
    format!("/posts/getPost/{post_id}")
}

fn update_post_endpoint(post_id: &str) -> String {
    format!("/posts/updatePost/{post_id}")
}

fn delete_post_endpoint(post_id: &str) -> String {
    format!("/posts/deletePost/{post_id}")
}

fn add_comment_endpoint(post_id: &str) -> String {
    format!("/posts/addComment/{post_id}")
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Fallback message when an error body carries no `message` field.
fn status_failed_message(status: u16) -> String {
    format!("request failed with status {status}")
}

// =============================================================================
// SEAMS
// =============================================================================

/// Resolves a bearer token to the principal it belongs to.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `Ok(None)` when the service answers but recognizes no user.
    async fn fetch_identity(&self, token: &str) -> Result<Option<Identity>, ApiError>;
}

/// Exchanges credentials for a bearer token.
#[async_trait::async_trait]
pub trait Authenticator: IdentityProvider {
    /// `Ok(None)` when the service refuses the credentials.
    async fn login(&self, email: &str, password: &str) -> Result<Option<String>, ApiError>;
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct BlogApi {
    http: reqwest::Client,
    base_url: String,
}

impl BlogApi {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeouts: Timeouts) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(config.base_url.clone(), config.timeouts)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send a request and return the body of a success response.
    async fn execute(&self, request: reqwest::RequestBuilder, token: Option<&str>) -> Result<String, ApiError> {
        let request = match token {
            Some(token) => request.header(AUTHORIZATION, bearer(token)),
            None => request,
        };
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        if !status.is_success() {
            let status = status.as_u16();
            let message = error_message(&text).unwrap_or_else(|| status_failed_message(status));
            return Err(ApiError::Status { status, message });
        }
        Ok(text)
    }

    /// Fetch every post via `GET /posts/getPosts`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status or a malformed body.
    pub async fn list_posts(&self, token: Option<&str>) -> Result<Vec<Post>, ApiError> {
        let body = self
            .execute(self.http.get(self.url(POSTS_LIST_PATH)), token)
            .await?;
        parse_posts(&body)
    }

    /// Fetch one post with its comments via `GET /posts/getPost/{id}`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status or a malformed body.
    pub async fn get_post(&self, token: Option<&str>, post_id: &str) -> Result<Post, ApiError> {
        let body = self
            .execute(self.http.get(self.url(&post_endpoint(post_id))), token)
            .await?;
        parse_post(&body)
    }

    /// Create a post via `POST /posts/addPost`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    pub async fn create_post(&self, token: &str, draft: &PostDraft) -> Result<(), ApiError> {
        self.execute(self.http.post(self.url(POSTS_ADD_PATH)).json(draft), Some(token))
            .await?;
        Ok(())
    }

    /// Replace a post's fields via `PUT /posts/updatePost/{id}`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    pub async fn update_post(&self, token: &str, post_id: &str, draft: &PostDraft) -> Result<(), ApiError> {
        self.execute(self.http.put(self.url(&update_post_endpoint(post_id))).json(draft), Some(token))
            .await?;
        Ok(())
    }

    /// Delete a post via `DELETE /posts/deletePost/{id}`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    pub async fn delete_post(&self, token: &str, post_id: &str) -> Result<(), ApiError> {
        self.execute(self.http.delete(self.url(&delete_post_endpoint(post_id))), Some(token))
            .await?;
        Ok(())
    }

    /// Attach a comment to a post via `POST /posts/addComment/{id}`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    pub async fn add_comment(&self, token: &str, post_id: &str, user_id: &str, content: &str) -> Result<(), ApiError> {
        let payload = NewComment { content, user_id };
        self.execute(self.http.post(self.url(&add_comment_endpoint(post_id))).json(&payload), Some(token))
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl IdentityProvider for BlogApi {
    async fn fetch_identity(&self, token: &str) -> Result<Option<Identity>, ApiError> {
        let body = self
            .execute(self.http.get(self.url(USER_DETAILS_PATH)), Some(token))
            .await?;
        parse_user_details(&body)
    }
}

#[async_trait::async_trait]
impl Authenticator for BlogApi {
    async fn login(&self, email: &str, password: &str) -> Result<Option<String>, ApiError> {
        let payload = LoginRequest { email, password };
        match self
            .execute(self.http.post(self.url(USER_LOGIN_PATH)).json(&payload), None)
            .await
        {
            Ok(body) => parse_login_response(&body),
            // A 4xx from login means refused credentials.
            Err(ApiError::Status { status: 400..=499, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

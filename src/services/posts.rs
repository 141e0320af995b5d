//! Post browsing, authoring, admin management and comments.
//!
//! Each flow turns the API result into a [`Notice`]. Transport failures,
//! error statuses and malformed bodies all end up as the same one-shot error
//! notice; details go to the log.

#[cfg(test)]
#[path = "posts_test.rs"]
mod posts_test;

use crate::nav::{Route, RouteAccess, can_comment, route_access};
use crate::net::types::{Post, PostDraft};
use crate::net::{ApiError, BlogApi};
use crate::notice::Notice;
use crate::state::session::SessionStore;

pub const TITLE_MAX_CHARS: usize = 80;

fn please_login() -> Notice {
    Notice::info("Please Login")
}

fn admin_only() -> Notice {
    Notice::error("Error").with_text("Admin access required.")
}

/// Validate a draft the way the post form does before submitting.
fn validate_draft(draft: &PostDraft) -> Result<(), Notice> {
    if draft.title.trim().is_empty() || draft.content.trim().is_empty() {
        return Err(Notice::error("Error").with_text("Title and content are required."));
    }
    if draft.title.chars().count() > TITLE_MAX_CHARS {
        return Err(Notice::error("Error").with_text(format!("Title must be at most {TITLE_MAX_CHARS} characters.")));
    }
    Ok(())
}

/// Token for an admin-dashboard operation, or the notice explaining why not.
fn admin_token(store: &SessionStore) -> Result<String, Notice> {
    let session = store.current();
    if !session.is_authenticated() {
        return Err(please_login());
    }
    if route_access(&Route::AdminDashboard, &session) == RouteAccess::NotFound {
        return Err(admin_only());
    }
    store.token().ok_or_else(please_login)
}

/// # Errors
///
/// Returns the notice to show when the posts cannot be loaded.
pub async fn list_posts(api: &BlogApi, store: &SessionStore) -> Result<Vec<Post>, Notice> {
    api.list_posts(store.token().as_deref())
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "failed to list posts");
            Notice::error("Error").with_text("Unable to load posts.")
        })
}

/// # Errors
///
/// Returns a "Post Not Found" notice for any failure, including a missing post.
pub async fn show_post(api: &BlogApi, store: &SessionStore, post_id: &str) -> Result<Post, Notice> {
    api.get_post(store.token().as_deref(), post_id)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, post_id, "failed to fetch post");
            Notice::error("Post Not Found").with_text("The post you are looking for does not exist.")
        })
}

pub async fn create_post(api: &BlogApi, store: &SessionStore, draft: &PostDraft) -> Notice {
    if let Err(notice) = validate_draft(draft) {
        return notice;
    }
    let Some(token) = store.token() else {
        return please_login();
    };
    match api.create_post(&token, draft).await {
        Ok(()) => Notice::success("Post created successfully!"),
        Err(ApiError::Status { status, message }) => {
            tracing::warn!(status, %message, "create post rejected");
            Notice::error("Error").with_text(message)
        }
        Err(e) => {
            tracing::warn!(error = %e, "create post failed");
            Notice::error("Error").with_text("Something went wrong")
        }
    }
}

pub async fn update_post(api: &BlogApi, store: &SessionStore, post_id: &str, draft: &PostDraft) -> Notice {
    let token = match admin_token(store) {
        Ok(token) => token,
        Err(notice) => return notice,
    };
    if let Err(notice) = validate_draft(draft) {
        return notice;
    }
    match api.update_post(&token, post_id, draft).await {
        Ok(()) => Notice::success("Success").with_text("Post updated successfully!"),
        Err(e) => {
            tracing::warn!(error = %e, post_id, "update post failed");
            Notice::error("Error").with_text("Unable to update post.")
        }
    }
}

pub async fn delete_post(api: &BlogApi, store: &SessionStore, post_id: &str) -> Notice {
    let token = match admin_token(store) {
        Ok(token) => token,
        Err(notice) => return notice,
    };
    match api.delete_post(&token, post_id).await {
        Ok(()) => Notice::success("Deleted").with_text("Post deleted successfully!"),
        Err(e) => {
            tracing::warn!(error = %e, post_id, "delete post failed");
            Notice::error("Error").with_text("Unable to delete post.")
        }
    }
}

pub async fn add_comment(api: &BlogApi, store: &SessionStore, post_id: &str, content: &str) -> Notice {
    let session = store.current();
    if !can_comment(&session) {
        return please_login();
    }
    let (Some(user_id), Some(token)) = (session.user_id(), store.token()) else {
        return please_login();
    };
    if content.trim().is_empty() {
        return Notice::error("Error").with_text("Comment cannot be empty.");
    }
    match api.add_comment(&token, post_id, user_id, content).await {
        Ok(()) => Notice::success("Comment added!"),
        Err(e @ ApiError::Status { .. }) => {
            tracing::warn!(error = %e, post_id, "add comment rejected");
            Notice::error("Error").with_text("Unable to add comment")
        }
        Err(e) => {
            tracing::warn!(error = %e, post_id, "add comment failed");
            Notice::error("Error").with_text("Something went wrong")
        }
    }
}

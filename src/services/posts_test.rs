use std::sync::Arc;

use axum::Router;
use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post, put};
use serde_json::{Value, json};

use super::*;
use crate::net::test_helpers::api_for;
use crate::notice::NoticeKind;
use crate::state::storage::MemoryTokenStorage;

fn has_bearer(headers: &HeaderMap, token: &str) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {token}"))
}

/// Mock blog API. `tok-admin` may manage posts; any bearer may write.
fn blog_router() -> Router {
    Router::new()
        .route(
            "/posts/getPosts",
            get(|| async { axum::Json(json!([{ "_id": "p1", "title": "First", "author": "Jo" }])) }),
        )
        .route(
            "/posts/getPost/{id}",
            get(|Path(id): Path<String>| async move {
                if id == "p1" {
                    Ok(axum::Json(json!({ "_id": "p1", "title": "First", "comments": [] })))
                } else {
                    Err(StatusCode::NOT_FOUND)
                }
            }),
        )
        .route(
            "/posts/addPost",
            post(|headers: HeaderMap, axum::Json(body): axum::Json<Value>| async move {
                if headers.get("authorization").is_none() {
                    return (StatusCode::UNAUTHORIZED, axum::Json(json!({ "message": "auth required" })));
                }
                if body["title"] == "Duplicate" {
                    return (StatusCode::CONFLICT, axum::Json(json!({ "message": "Post already exists" })));
                }
                (StatusCode::CREATED, axum::Json(json!({ "_id": "p2" })))
            }),
        )
        .route(
            "/posts/updatePost/{id}",
            put(|headers: HeaderMap, Path(id): Path<String>| async move {
                if has_bearer(&headers, "tok-admin") && id == "p1" { StatusCode::OK } else { StatusCode::FORBIDDEN }
            }),
        )
        .route(
            "/posts/deletePost/{id}",
            delete(|headers: HeaderMap, Path(id): Path<String>| async move {
                if has_bearer(&headers, "tok-admin") && id == "p1" { StatusCode::OK } else { StatusCode::NOT_FOUND }
            }),
        )
        .route(
            "/posts/addComment/{id}",
            post(|Path(id): Path<String>, axum::Json(body): axum::Json<Value>| async move {
                if id == "p1" && body["userId"] == "u1" { StatusCode::CREATED } else { StatusCode::BAD_REQUEST }
            }),
        )
}

async fn fixture() -> (BlogApi, SessionStore) {
    let identity = Arc::new(api_for(Router::new()).await);
    let store = SessionStore::new(identity, Arc::new(MemoryTokenStorage::new()));
    (api_for(blog_router()).await, store)
}

fn draft(title: &str) -> PostDraft {
    PostDraft { title: title.into(), content: "Body".into(), ..PostDraft::default() }
}

// =========================================================================
// validation
// =========================================================================

#[test]
fn draft_requires_title_and_content() {
    assert!(validate_draft(&draft("T")).is_ok());
    assert!(validate_draft(&draft("  ")).is_err());
    assert!(validate_draft(&PostDraft { title: "T".into(), ..PostDraft::default() }).is_err());
}

#[test]
fn draft_title_is_capped() {
    assert!(validate_draft(&draft(&"x".repeat(TITLE_MAX_CHARS))).is_ok());
    assert!(validate_draft(&draft(&"x".repeat(TITLE_MAX_CHARS + 1))).is_err());
}

// =========================================================================
// reading
// =========================================================================

#[tokio::test]
async fn list_and_show_posts() {
    let (api, store) = fixture().await;

    let posts = list_posts(&api, &store).await.unwrap();
    assert_eq!(posts[0].author_name(), "Jo");

    assert_eq!(show_post(&api, &store, "p1").await.unwrap().title, "First");
    let missing = show_post(&api, &store, "zzz").await.unwrap_err();
    assert_eq!(missing.title, "Post Not Found");
}

// =========================================================================
// writing
// =========================================================================

#[tokio::test]
async fn create_post_needs_a_token() {
    let (api, store) = fixture().await;

    assert_eq!(create_post(&api, &store, &draft("T")).await, please_login());

    store.set("tok-user", "u1", false);
    let notice = create_post(&api, &store, &draft("T")).await;
    assert_eq!(notice, Notice::success("Post created successfully!"));
}

#[tokio::test]
async fn create_post_shows_api_message() {
    let (api, store) = fixture().await;
    store.set("tok-user", "u1", false);

    let notice = create_post(&api, &store, &draft("Duplicate")).await;
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.text.as_deref(), Some("Post already exists"));
}

#[tokio::test]
async fn update_and_delete_are_admin_only() {
    let (api, store) = fixture().await;

    assert_eq!(update_post(&api, &store, "p1", &draft("New")).await, please_login());

    store.set("tok-user", "u1", false);
    assert_eq!(update_post(&api, &store, "p1", &draft("New")).await, admin_only());
    assert_eq!(delete_post(&api, &store, "p1").await, admin_only());

    store.set("tok-admin", "root", true);
    assert!(update_post(&api, &store, "p1", &draft("New")).await.is_success());
    assert!(delete_post(&api, &store, "p1").await.is_success());

    let missing = delete_post(&api, &store, "p9").await;
    assert_eq!(missing.text.as_deref(), Some("Unable to delete post."));
}

#[tokio::test]
async fn comments_require_a_user() {
    let (api, store) = fixture().await;

    assert_eq!(add_comment(&api, &store, "p1", "Nice").await, please_login());

    store.set("tok-user", "u1", false);
    assert_eq!(add_comment(&api, &store, "p1", "Nice").await, Notice::success("Comment added!"));
    assert!(!add_comment(&api, &store, "p1", "   ").await.is_success());

    let rejected = add_comment(&api, &store, "p9", "Nice").await;
    assert_eq!(rejected.text.as_deref(), Some("Unable to add comment"));
}

#[tokio::test]
async fn logged_out_user_loses_write_access() {
    let (api, store) = fixture().await;
    store.set("tok-admin", "root", true);
    store.clear();

    assert_eq!(delete_post(&api, &store, "p1").await, please_login());
    assert_eq!(add_comment(&api, &store, "p1", "Nice").await, please_login());
}

//! Post endpoints.

use actix_web::{HttpResponse, web};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;

use microblog_core::Post;
use microblog_shared::{PostResponse, PostTextRequest, PostsPageResponse};

use crate::middleware::author::AuthorId;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Page size used when the request does not name one.
pub const DEFAULT_PAGE_SIZE: u8 = 10;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub size: Option<u8>,
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn render_post(post: &Post) -> PostResponse {
    PostResponse {
        id: post.id.clone(),
        text: post.text.clone(),
        author_id: post.author_id.clone(),
        created_at: timestamp(&post.created_at),
        last_modified_at: post.last_modified_at.as_ref().map(timestamp),
    }
}

/// Publish a post as the calling author.
///
/// POST /api/v1/posts
pub async fn create_post(
    state: web::Data<AppState>,
    author: AuthorId,
    body: web::Json<PostTextRequest>,
) -> AppResult<HttpResponse> {
    let post = state.manager.add_post(author.as_str(), &body.text).await?;

    tracing::info!(post_id = %post.id, author_id = %post.author_id, "Post created");

    Ok(HttpResponse::Ok().json(render_post(&post)))
}

/// GET /api/v1/posts/{post_id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.manager.get_post(&path).await?;
    Ok(HttpResponse::Ok().json(render_post(&post)))
}

/// Replace the text of a post. Only its author may do this.
///
/// PUT /api/v1/posts/{post_id}
pub async fn modify_post(
    state: web::Data<AppState>,
    author: AuthorId,
    path: web::Path<String>,
    body: web::Json<PostTextRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    let existing = state.manager.get_post(&post_id).await?;
    if existing.author_id != author.as_str() {
        tracing::warn!(
            post_id = %post_id,
            author_id = %existing.author_id,
            caller = %author.as_str(),
            "Rejected edit of another author's post"
        );
        return Err(AppError::Forbidden);
    }

    let post = state.manager.modify_post(&post_id, &body.text).await?;

    tracing::info!(post_id = %post.id, "Post modified");

    Ok(HttpResponse::Ok().json(render_post(&post)))
}

/// List an author's posts, newest first.
///
/// GET /api/v1/users/{user_id}/posts?page=<token>&size=<n>
pub async fn list_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let token = query.page.as_deref().filter(|t| !t.is_empty());
    let size = query.size.unwrap_or(DEFAULT_PAGE_SIZE);

    let page = state
        .manager
        .get_posts_in_page(&path, token, size)
        .await?;

    let response = PostsPageResponse {
        posts: page.posts.iter().map(render_post).collect(),
        next_page: page.next_token.unwrap_or_default(),
    };

    Ok(HttpResponse::Ok().json(response))
}

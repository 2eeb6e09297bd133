//! Community posts. Reading is public, posting needs a signed-in user.

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::auth::MaybeAuthUser;
use crate::database::{NewPost, Post};
use crate::error::{ApiError, ApiResult};
use crate::routes::JsonBody;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub topic: String,
}

/// `GET /api/community/posts`
pub async fn list_posts(State(state): State<AppState>) -> ApiResult<Json<Vec<Post>>> {
    Ok(Json(state.store.list_posts().await?))
}

/// `POST /api/community/posts`
pub async fn create_post(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    JsonBody(req): JsonBody<CreatePostRequest>,
) -> ApiResult<Json<Post>> {
    let user = user.ok_or_else(ApiError::unauthorized)?;

    // Token can outlive the account, e.g. after a store reset
    let author = state
        .store
        .get_user_by_id(user.id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

    if req.title.is_empty() || req.content.is_empty() {
        return Err(ApiError::Validation("Title and content are required".to_string()));
    }

    let post = state
        .store
        .create_post(NewPost {
            user_id: author.id,
            author_name: author.name,
            title: req.title,
            content: req.content,
            topic: req.topic,
        })
        .await?;

    tracing::info!("💬 User {} created post {}", author.id, post.id);
    Ok(Json(post))
}

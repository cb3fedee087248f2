use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{MessageResponse, TextRequest},
    repo_types::{Comment, Like, Post},
    services::{self, LikeTarget},
};
use crate::{
    auth::{repo_types::User, AuthUser},
    error::ApiError,
    extract::JsonBody,
    state::AppState,
    validation::{parse_id, Validator},
};

pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", post(create_post).get(list_posts))
        .route("/posts/:id", get(get_post).delete(delete_post))
        .route("/posts/like/:id", put(like_post))
        .route("/posts/unlike/:id", put(unlike_post))
}

pub fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/posts/comment/:id", post(add_comment))
        .route("/posts/comment/:id/:comment_id", delete(delete_comment))
        .route("/posts/comment/like/:id/:comment_id", put(like_comment))
        .route("/posts/comment/unlike/:id/:comment_id", put(unlike_comment))
}

const POST_NOT_FOUND: &str = "Post not found";

async fn load_post(state: &AppState, raw_id: &str) -> Result<Post, ApiError> {
    let id = parse_id(raw_id, POST_NOT_FOUND)?;
    state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(POST_NOT_FOUND.into()))
}

async fn load_author(state: &AppState, user_id: Uuid) -> Result<User, ApiError> {
    state.users.find_by_id(user_id).await?.ok_or_else(|| {
        warn!(%user_id, "token for unknown user");
        ApiError::Unauthorized("User not found".into())
    })
}

fn validated_text(body: &TextRequest) -> Result<&str, ApiError> {
    let mut v = Validator::new();
    v.not_empty("text", body.text.as_deref(), "Text is require");
    v.finish()?;
    Ok(body.text.as_deref().unwrap_or_default())
}

// --- posts ---

/// POST /api/posts
#[instrument(skip(state, body))]
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(body): JsonBody<TextRequest>,
) -> Result<Json<Post>, ApiError> {
    let text = validated_text(&body)?;
    let author = load_author(&state, user_id).await?;

    let post = services::new_post(&author, text);
    state.posts.insert(&post).await?;

    info!(post_id = %post.id, %user_id, "post created");
    Ok(Json(post))
}

/// GET /api/posts
#[instrument(skip(state))]
pub async fn list_posts(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Vec<Post>>, ApiError> {
    Ok(Json(state.posts.list_recent().await?))
}

/// GET /api/posts/:id
#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    Ok(Json(load_post(&state, &id).await?))
}

/// DELETE /api/posts/:id
#[instrument(skip(state))]
pub async fn delete_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let post = load_post(&state, &id).await?;
    if let Err(e) = services::ensure_owner(post.user, user_id) {
        warn!(post_id = %post.id, %user_id, "delete of foreign post refused");
        return Err(e);
    }

    state.posts.delete(post.id).await?;
    info!(post_id = %post.id, %user_id, "post removed");
    Ok(Json(MessageResponse {
        msg: "Post was removed",
    }))
}

/// PUT /api/posts/like/:id
#[instrument(skip(state))]
pub async fn like_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<Like>>, ApiError> {
    let mut post = load_post(&state, &id).await?;
    services::like(&mut post.likes, user_id).map_err(|e| LikeTarget::Post.reject(e))?;
    state.posts.save(&post).await?;
    Ok(Json(post.likes))
}

/// PUT /api/posts/unlike/:id
#[instrument(skip(state))]
pub async fn unlike_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<Like>>, ApiError> {
    let mut post = load_post(&state, &id).await?;
    services::unlike(&mut post.likes, user_id).map_err(|e| LikeTarget::Post.reject(e))?;
    state.posts.save(&post).await?;
    Ok(Json(post.likes))
}

// --- comments ---

/// POST /api/posts/comment/:id
#[instrument(skip(state, body))]
pub async fn add_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<TextRequest>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let text = validated_text(&body)?;
    let author = load_author(&state, user_id).await?;
    let mut post = load_post(&state, &id).await?;

    let comment_id = services::add_comment(&mut post, &author, text);
    state.posts.save(&post).await?;

    info!(post_id = %post.id, %comment_id, %user_id, "comment added");
    Ok(Json(post.comments))
}

/// DELETE /api/posts/comment/:id/:comment_id
#[instrument(skip(state))]
pub async fn delete_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((id, comment_id)): Path<(String, String)>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let mut post = load_post(&state, &id).await?;
    let comment_id = parse_id(&comment_id, "Comment does not exist")?;

    services::remove_comment(&mut post, comment_id, user_id)?;
    state.posts.save(&post).await?;

    info!(post_id = %post.id, %comment_id, %user_id, "comment removed");
    Ok(Json(post.comments))
}

/// PUT /api/posts/comment/like/:id/:comment_id
#[instrument(skip(state))]
pub async fn like_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((id, comment_id)): Path<(String, String)>,
) -> Result<Json<Vec<Like>>, ApiError> {
    let mut post = load_post(&state, &id).await?;
    let comment_id = parse_id(&comment_id, "Comment does not exist")?;

    let comment = services::find_comment_mut(&mut post, comment_id)?;
    services::like(&mut comment.likes, user_id).map_err(|e| LikeTarget::Comment.reject(e))?;
    let likes = comment.likes.clone();

    state.posts.save(&post).await?;
    Ok(Json(likes))
}

/// PUT /api/posts/comment/unlike/:id/:comment_id
#[instrument(skip(state))]
pub async fn unlike_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((id, comment_id)): Path<(String, String)>,
) -> Result<Json<Vec<Like>>, ApiError> {
    let mut post = load_post(&state, &id).await?;
    let comment_id = parse_id(&comment_id, "Comment does not exist")?;

    let comment = services::find_comment_mut(&mut post, comment_id)?;
    services::unlike(&mut comment.likes, user_id).map_err(|e| LikeTarget::Comment.reject(e))?;
    let likes = comment.likes.clone();

    state.posts.save(&post).await?;
    Ok(Json(likes))
}

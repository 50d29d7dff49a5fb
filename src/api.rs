// HTTP surface: every handler performs exactly one persistence operation and
// serializes the result. Missing-id paths are explicit 404s rather than
// unchecked lookups.

use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    http::{header, Method, StatusCode},
    response::{Json, Response},
    routing::{any, get},
    Router,
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    app_state::AppState,
    error::{AppError, AppResult},
    external::IRIS_QUERY,
    models::{Comment, Post},
};

// HTTP request types

#[derive(Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct UpdatePostRequest {
    pub title: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
    pub post_id: Option<i64>,
}

#[derive(Deserialize)]
pub struct UpdateCommentRequest {
    pub content: String,
}

// Post handlers

pub async fn list_posts(State(state): State<AppState>) -> AppResult<Json<Vec<Post>>> {
    let posts = state.db.list_posts().await?;
    Ok(Json(posts))
}

pub async fn create_post(
    State(state): State<AppState>,
    Json(req): Json<CreatePostRequest>,
) -> AppResult<(StatusCode, Json<Post>)> {
    let post = state.db.create_post(&req.title, &req.content).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Post>> {
    match state.db.get_post(id).await? {
        Some(post) => Ok(Json(post)),
        None => Err(AppError::NotFound(format!("Post {} not found", id))),
    }
}

pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdatePostRequest>,
) -> AppResult<Json<Post>> {
    match state.db.update_post(id, &req.title, &req.content).await? {
        Some(post) => Ok(Json(post)),
        None => Err(AppError::NotFound(format!("Post {} not found", id))),
    }
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Post>> {
    match state.db.delete_post(id).await? {
        Some(post) => Ok(Json(post)),
        None => Err(AppError::NotFound(format!("Post {} not found", id))),
    }
}

pub async fn list_post_comments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Comment>>> {
    if state.db.get_post(id).await?.is_none() {
        return Err(AppError::NotFound(format!("Post {} not found", id)));
    }
    let comments = state.db.list_comments_for_post(id).await?;
    Ok(Json(comments))
}

// Comment handlers

pub async fn list_comments(State(state): State<AppState>) -> AppResult<Json<Vec<Comment>>> {
    let comments = state.db.list_comments().await?;
    Ok(Json(comments))
}

pub async fn create_comment(
    State(state): State<AppState>,
    Json(req): Json<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    let comment = state.db.create_comment(&req.content, req.post_id).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Comment>> {
    match state.db.get_comment(id).await? {
        Some(comment) => Ok(Json(comment)),
        None => Err(AppError::NotFound(format!("Comment {} not found", id))),
    }
}

pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateCommentRequest>,
) -> AppResult<Json<Comment>> {
    match state.db.update_comment(id, &req.content).await? {
        Some(comment) => Ok(Json(comment)),
        None => Err(AppError::NotFound(format!("Comment {} not found", id))),
    }
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Comment>> {
    match state.db.delete_comment(id).await? {
        Some(comment) => Ok(Json(comment)),
        None => Err(AppError::NotFound(format!("Comment {} not found", id))),
    }
}

// External collaborator handlers

pub async fn iris_query(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let Some(engine) = &state.raw_query else {
        return Err(AppError::ServiceUnavailable(
            "No vendor database configured".to_string(),
        ));
    };
    let rows = engine.execute(IRIS_QUERY).await?;
    Ok(Json(Value::Array(rows)))
}

pub async fn interop_forward(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> AppResult<Response> {
    let Some(forwarder) = &state.interop else {
        return Err(AppError::ServiceUnavailable(
            "No interop adapter configured".to_string(),
        ));
    };
    let forwarded = forwarder.forward(method, body.to_vec()).await?;

    let status =
        StatusCode::from_u16(forwarded.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = Response::builder().status(status);
    if let Some(content_type) = forwarded.content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder
        .body(Body::from(forwarded.body))
        .map_err(|err| AppError::Internal(err.to_string()))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Post CRUD
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/posts/{id}/comments", get(list_post_comments))
        // Comment CRUD
        .route("/comments", get(list_comments).post(create_comment))
        .route(
            "/comments/{id}",
            get(get_comment).put(update_comment).delete(delete_comment),
        )
        // External collaborators
        .route("/iris", get(iris_query))
        .route("/interop", any(interop_forward))
        .with_state(state)
}

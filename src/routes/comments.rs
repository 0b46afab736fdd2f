use axum::{
    extract::{Path as AxumPath, State},
    response::Json,
};
use serde_json::Value;

use crate::{
    error::AppError,
    interface::SharedPlayInterface,
    models::{Comment, CommentUpdate, NewComment},
    threading::ThreadEntry,
};

pub async fn create_comment_handler(
    State(sp): State<SharedPlayInterface>,
    Json(req): Json<NewComment>,
) -> Result<Json<Comment>, AppError> {
    Ok(Json(sp.create_comment(req).await?))
}

pub async fn get_comment_handler(
    State(sp): State<SharedPlayInterface>,
    AxumPath(comment_id): AxumPath<String>,
) -> Result<Json<Comment>, AppError> {
    Ok(Json(sp.get_comment(&comment_id).await?))
}

pub async fn patch_comment_handler(
    State(sp): State<SharedPlayInterface>,
    AxumPath(comment_id): AxumPath<String>,
    Json(req): Json<CommentUpdate>,
) -> Result<Json<Comment>, AppError> {
    Ok(Json(sp.update_comment(&comment_id, req).await?))
}

pub async fn delete_comment_handler(
    State(sp): State<SharedPlayInterface>,
    AxumPath(comment_id): AxumPath<String>,
) -> Result<Json<Value>, AppError> {
    sp.delete_comment(&comment_id).await?;
    Ok(super::deleted("Comment", &comment_id))
}

/// The song's comments in display order; clients indent by `depth`.
pub async fn list_thread_handler(
    State(sp): State<SharedPlayInterface>,
    AxumPath(song_id): AxumPath<String>,
) -> Result<Json<Vec<ThreadEntry<Comment>>>, AppError> {
    Ok(Json(sp.comment_thread(&song_id).await?))
}

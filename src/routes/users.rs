use axum::{
    extract::{Path as AxumPath, State},
    response::Json,
};
use serde_json::Value;

use crate::{
    error::AppError,
    interface::SharedPlayInterface,
    models::{NewUser, Playlist, User, UserUpdate},
};

pub async fn create_user_handler(
    State(sp): State<SharedPlayInterface>,
    Json(req): Json<NewUser>,
) -> Result<Json<User>, AppError> {
    Ok(Json(sp.create_user(req).await?))
}

pub async fn get_user_handler(
    State(sp): State<SharedPlayInterface>,
    AxumPath(user_id): AxumPath<String>,
) -> Result<Json<User>, AppError> {
    Ok(Json(sp.get_user(&user_id).await?))
}

pub async fn patch_user_handler(
    State(sp): State<SharedPlayInterface>,
    AxumPath(user_id): AxumPath<String>,
    Json(req): Json<UserUpdate>,
) -> Result<Json<User>, AppError> {
    Ok(Json(sp.update_user(&user_id, req).await?))
}

pub async fn delete_user_handler(
    State(sp): State<SharedPlayInterface>,
    AxumPath(user_id): AxumPath<String>,
) -> Result<Json<Value>, AppError> {
    sp.delete_user(&user_id).await?;
    Ok(super::deleted("User", &user_id))
}

pub async fn list_playlists_handler(
    State(sp): State<SharedPlayInterface>,
    AxumPath(user_id): AxumPath<String>,
) -> Result<Json<Vec<Playlist>>, AppError> {
    Ok(Json(sp.playlists_for_user(&user_id).await?))
}

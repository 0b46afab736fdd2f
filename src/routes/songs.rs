use axum::{
    extract::{Path as AxumPath, State},
    response::Json,
};
use serde_json::Value;

use crate::{
    error::AppError,
    interface::SharedPlayInterface,
    models::{NewSong, Song},
};

pub async fn create_song_handler(
    State(sp): State<SharedPlayInterface>,
    Json(req): Json<NewSong>,
) -> Result<Json<Song>, AppError> {
    Ok(Json(sp.create_song(req).await?))
}

pub async fn get_song_handler(
    State(sp): State<SharedPlayInterface>,
    AxumPath(song_id): AxumPath<String>,
) -> Result<Json<Song>, AppError> {
    Ok(Json(sp.get_song(&song_id).await?))
}

pub async fn delete_song_handler(
    State(sp): State<SharedPlayInterface>,
    AxumPath(song_id): AxumPath<String>,
) -> Result<Json<Value>, AppError> {
    sp.delete_song(&song_id).await?;
    Ok(super::deleted("Song", &song_id))
}

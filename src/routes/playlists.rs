use axum::{
    extract::{Path as AxumPath, State},
    response::Json,
};
use serde_json::Value;

use crate::{
    error::AppError,
    interface::SharedPlayInterface,
    models::{NewPlaylist, Playlist, PlaylistUpdate, Song},
};

pub async fn create_playlist_handler(
    State(sp): State<SharedPlayInterface>,
    Json(req): Json<NewPlaylist>,
) -> Result<Json<Playlist>, AppError> {
    Ok(Json(sp.create_playlist(req).await?))
}

pub async fn get_playlist_handler(
    State(sp): State<SharedPlayInterface>,
    AxumPath(playlist_id): AxumPath<String>,
) -> Result<Json<Playlist>, AppError> {
    Ok(Json(sp.get_playlist(&playlist_id).await?))
}

pub async fn patch_playlist_handler(
    State(sp): State<SharedPlayInterface>,
    AxumPath(playlist_id): AxumPath<String>,
    Json(req): Json<PlaylistUpdate>,
) -> Result<Json<Playlist>, AppError> {
    Ok(Json(sp.update_playlist(&playlist_id, req).await?))
}

pub async fn delete_playlist_handler(
    State(sp): State<SharedPlayInterface>,
    AxumPath(playlist_id): AxumPath<String>,
) -> Result<Json<Value>, AppError> {
    sp.delete_playlist(&playlist_id).await?;
    Ok(super::deleted("Playlist", &playlist_id))
}

pub async fn list_songs_handler(
    State(sp): State<SharedPlayInterface>,
    AxumPath(playlist_id): AxumPath<String>,
) -> Result<Json<Vec<Song>>, AppError> {
    Ok(Json(sp.songs_for_playlist(&playlist_id).await?))
}

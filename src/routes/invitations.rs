use axum::{
    extract::{Path as AxumPath, State},
    response::Json,
};
use serde::Deserialize;

use crate::{
    error::AppError,
    interface::SharedPlayInterface,
    models::{Invitation, NewInvitation, Playlist},
};

#[derive(Deserialize)]
pub struct AcceptInvitationRequest {
    pub user_id: String,
}

pub async fn create_invitation_handler(
    State(sp): State<SharedPlayInterface>,
    AxumPath(playlist_id): AxumPath<String>,
    Json(req): Json<NewInvitation>,
) -> Result<Json<Invitation>, AppError> {
    Ok(Json(sp.create_invitation(&playlist_id, req).await?))
}

pub async fn list_invitations_handler(
    State(sp): State<SharedPlayInterface>,
    AxumPath(playlist_id): AxumPath<String>,
) -> Result<Json<Vec<Invitation>>, AppError> {
    Ok(Json(sp.invitations_for_playlist(&playlist_id).await?))
}

pub async fn get_invitation_handler(
    State(sp): State<SharedPlayInterface>,
    AxumPath(invitation_id): AxumPath<String>,
) -> Result<Json<Invitation>, AppError> {
    Ok(Json(sp.get_invitation(&invitation_id).await?))
}

pub async fn accept_invitation_handler(
    State(sp): State<SharedPlayInterface>,
    AxumPath(invitation_id): AxumPath<String>,
    Json(req): Json<AcceptInvitationRequest>,
) -> Result<Json<Playlist>, AppError> {
    Ok(Json(sp.accept_invitation(&invitation_id, &req.user_id).await?))
}

use axum::{
    extract::{Path as AxumPath, State},
    response::Json,
};
use serde_json::Value;

use crate::{
    error::AppError,
    interface::SharedPlayInterface,
    models::{NewReaction, Reaction},
};

pub async fn create_reaction_handler(
    State(sp): State<SharedPlayInterface>,
    Json(req): Json<NewReaction>,
) -> Result<Json<Reaction>, AppError> {
    Ok(Json(sp.create_reaction(req).await?))
}

pub async fn get_reaction_handler(
    State(sp): State<SharedPlayInterface>,
    AxumPath(reaction_id): AxumPath<String>,
) -> Result<Json<Reaction>, AppError> {
    Ok(Json(sp.get_reaction(&reaction_id).await?))
}

pub async fn delete_reaction_handler(
    State(sp): State<SharedPlayInterface>,
    AxumPath(reaction_id): AxumPath<String>,
) -> Result<Json<Value>, AppError> {
    sp.delete_reaction(&reaction_id).await?;
    Ok(super::deleted("Reaction", &reaction_id))
}

pub async fn list_reactions_handler(
    State(sp): State<SharedPlayInterface>,
    AxumPath(comment_id): AxumPath<String>,
) -> Result<Json<Vec<Reaction>>, AppError> {
    Ok(Json(sp.reactions_for_comment(&comment_id).await?))
}

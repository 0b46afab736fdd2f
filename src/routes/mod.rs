// HTTP surface - axum handlers over SharedPlayInterface

pub mod comments;
pub mod invitations;
pub mod playlists;
pub mod reactions;
pub mod songs;
pub mod users;

use axum::{
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};

use crate::interface::SharedPlayInterface;

pub async fn home_handler() -> Json<Value> {
    Json(json!({"message": "Welcome to SharedPlay API"}))
}

/// Body returned by every delete endpoint.
pub(crate) fn deleted(kind: &str, id: &str) -> Json<Value> {
    Json(json!({"message": format!("{} {} deleted successfully", kind, id)}))
}

pub fn create_router(interface: SharedPlayInterface) -> Router {
    Router::new()
        .route("/", get(home_handler))

        // Users
        .route("/user", post(users::create_user_handler))
        .route(
            "/user/{user_id}",
            get(users::get_user_handler)
                .patch(users::patch_user_handler)
                .delete(users::delete_user_handler),
        )
        .route("/user/{user_id}/playlists", get(users::list_playlists_handler))

        // Playlists
        .route("/playlist", post(playlists::create_playlist_handler))
        .route(
            "/playlist/{playlist_id}",
            get(playlists::get_playlist_handler)
                .patch(playlists::patch_playlist_handler)
                .delete(playlists::delete_playlist_handler),
        )
        .route("/playlist/{playlist_id}/songs", get(playlists::list_songs_handler))
        .route(
            "/playlist/{playlist_id}/invitations",
            get(invitations::list_invitations_handler).post(invitations::create_invitation_handler),
        )

        // Invitations
        .route("/invitation/{invitation_id}", get(invitations::get_invitation_handler))
        .route("/invitation/{invitation_id}/accept", post(invitations::accept_invitation_handler))

        // Songs
        .route("/song", post(songs::create_song_handler))
        .route(
            "/song/{song_id}",
            get(songs::get_song_handler).delete(songs::delete_song_handler),
        )
        .route("/song/{song_id}/comments", get(comments::list_thread_handler))

        // Comments
        .route("/comment", post(comments::create_comment_handler))
        .route(
            "/comment/{comment_id}",
            get(comments::get_comment_handler)
                .patch(comments::patch_comment_handler)
                .delete(comments::delete_comment_handler),
        )
        .route("/comment/{comment_id}/reactions", get(reactions::list_reactions_handler))

        // Reactions
        .route("/reaction", post(reactions::create_reaction_handler))
        .route(
            "/reaction/{reaction_id}",
            get(reactions::get_reaction_handler).delete(reactions::delete_reaction_handler),
        )

        .with_state(interface)
}

// SharedPlay data model - stored documents, index map types and entity records

pub mod entities;

pub use entities::{
    Comment, CommentUpdate, Invitation, NewComment, NewInvitation, NewPlaylist, NewReaction,
    NewSong, NewUser, Playlist, PlaylistUpdate, Reaction, Song, User, UserUpdate,
};

use serde::{de::DeserializeOwned, Serialize};

/// Every document kind held in the object store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EntityType {
    User,
    Playlist,
    Song,
    Comment,
    Reaction,
    Invitation,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::User => "user",
            EntityType::Playlist => "playlist",
            EntityType::Song => "song",
            EntityType::Comment => "comment",
            EntityType::Reaction => "reaction",
            EntityType::Invitation => "invitation",
        }
    }

    /// Human readable name used in error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            EntityType::User => "User",
            EntityType::Playlist => "Playlist",
            EntityType::Song => "Song",
            EntityType::Comment => "Comment",
            EntityType::Reaction => "Reaction",
            EntityType::Invitation => "Invitation",
        }
    }
}

/// Index maps between documents. Each forward map has a reverse counterpart,
/// see `core::inverse_associations`.
#[derive(Debug, Clone, PartialEq, Copy, Hash, Eq)]
pub enum AssociationType {
    UserPlaylists,
    PlaylistUsers,
    PlaylistSongs,
    SongPlaylist,
    SongComments,
    CommentSong,
    CommentReactions,
    ReactionComment,
    PlaylistInvitations,
    InvitationPlaylist,
}

impl AssociationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssociationType::UserPlaylists => "user_playlists",
            AssociationType::PlaylistUsers => "playlist_users",
            AssociationType::PlaylistSongs => "playlist_songs",
            AssociationType::SongPlaylist => "song_playlist",
            AssociationType::SongComments => "song_comments",
            AssociationType::CommentSong => "comment_song",
            AssociationType::CommentReactions => "comment_reactions",
            AssociationType::ReactionComment => "reaction_comment",
            AssociationType::PlaylistInvitations => "playlist_invitations",
            AssociationType::InvitationPlaylist => "invitation_playlist",
        }
    }
}

/// Raw document row as held by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub id: String,
    pub object_type: String,
    pub data: String,
    pub created: i64,
    pub updated: i64,
}

/// A document type the store knows how to persist.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync {
    fn entity_type() -> EntityType;

    fn id(&self) -> &str;

    fn entity_type_str() -> &'static str {
        Self::entity_type().as_str()
    }
}

// Entity records - users, playlists, songs, comments, reactions and invitations
// Stored as JSON documents; request payloads are the New*/…Update types

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, EntityType};
use crate::threading::Threaded;

/// Fixed-format UTC timestamp. Lexicographic order of these strings is chronological.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Appends the ids of `incoming` not already in `existing`, keeping first-seen order.
fn merge_unique(existing: &mut Vec<String>, incoming: Vec<String>) {
    for id in incoming {
        if !existing.contains(&id) {
            existing.push(id);
        }
    }
}

// -------------------- USER --------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub date_joined: String,
    #[serde(default)]
    pub friends: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    pub email: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub friends: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub friends: Option<Vec<String>>,
}

impl NewUser {
    pub fn into_user(self, id: String, date_joined: String) -> User {
        let mut friends = Vec::new();
        merge_unique(&mut friends, self.friends);
        User {
            id,
            email: self.email,
            name: self.name,
            date_joined,
            friends,
        }
    }
}

impl User {
    /// Only fields present in the update change; friends are merged, never replaced.
    pub fn apply(&mut self, update: UserUpdate) {
        if let Some(name) = update.name {
            self.name = Some(name);
        }
        if let Some(email) = update.email {
            self.email = Some(email);
        }
        if let Some(friends) = update.friends {
            merge_unique(&mut self.friends, friends);
        }
    }
}

impl Entity for User {
    fn entity_type() -> EntityType {
        EntityType::User
    }

    fn id(&self) -> &str {
        &self.id
    }
}

// -------------------- PLAYLIST --------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: Option<String>,
    pub date_created: String,
    pub last_updated: String,
    pub owner: String,
    #[serde(default)]
    pub editors: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPlaylist {
    pub name: Option<String>,
    pub owner: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistUpdate {
    pub name: Option<String>,
    pub owner: Option<String>,
    pub editors: Option<Vec<String>>,
}

impl NewPlaylist {
    /// The owner is always the first editor.
    pub fn into_playlist(self, id: String, now: String) -> Playlist {
        Playlist {
            id,
            name: self.name,
            date_created: now.clone(),
            last_updated: now,
            editors: vec![self.owner.clone()],
            owner: self.owner,
        }
    }
}

impl Playlist {
    /// Applies the update and returns the editors that were not on the playlist before.
    pub fn apply(&mut self, update: PlaylistUpdate, now: String) -> Vec<String> {
        if let Some(name) = update.name {
            self.name = Some(name);
        }
        if let Some(owner) = update.owner {
            self.owner = owner;
        }

        let before = self.editors.len();
        if let Some(editors) = update.editors {
            merge_unique(&mut self.editors, editors);
        }
        // A new owner is also an editor
        merge_unique(&mut self.editors, vec![self.owner.clone()]);

        self.last_updated = now;
        self.editors[before..].to_vec()
    }
}

impl Entity for Playlist {
    fn entity_type() -> EntityType {
        EntityType::Playlist
    }

    fn id(&self) -> &str {
        &self.id
    }
}

// -------------------- SONG --------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub yt_id: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub added_by: String,
    pub link: String,
    pub playlist_id: String,
    pub date_added: String,
    pub date_released: Option<String>,
}

/// A song is added from its video URL; title and artist are supplied by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSong {
    pub url: String,
    pub playlist_id: String,
    pub added_by: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub date_released: Option<String>,
}

impl Entity for Song {
    fn entity_type() -> EntityType {
        EntityType::Song
    }

    fn id(&self) -> &str {
        &self.id
    }
}

// -------------------- COMMENT --------------------

/// A comment on a song. `prev` points at the comment this one replies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub author_id: String,
    pub author: String,
    pub date_created: String,
    #[serde(default)]
    pub prev: Option<String>,
    #[serde(alias = "subject_id")]
    pub song_id: String,
    #[serde(default)]
    pub edited: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewComment {
    pub text: String,
    pub author_id: String,
    pub author: String,
    #[serde(default)]
    pub prev: Option<String>,
    pub song_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentUpdate {
    pub text: Option<String>,
}

impl NewComment {
    pub fn into_comment(self, id: String, date_created: String) -> Comment {
        Comment {
            id,
            text: self.text,
            author_id: self.author_id,
            author: self.author,
            date_created,
            prev: self.prev,
            song_id: self.song_id,
            edited: false,
        }
    }
}

impl Comment {
    /// Any update marks the comment as edited. Id, parent and song never change.
    pub fn apply(&mut self, update: CommentUpdate) {
        if let Some(text) = update.text {
            self.text = text;
        }
        self.edited = true;
    }
}

impl Threaded for Comment {
    fn thread_id(&self) -> &str {
        &self.id
    }

    fn parent_id(&self) -> Option<&str> {
        self.prev.as_deref()
    }

    fn created_at(&self) -> &str {
        &self.date_created
    }
}

impl Entity for Comment {
    fn entity_type() -> EntityType {
        EntityType::Comment
    }

    fn id(&self) -> &str {
        &self.id
    }
}

// -------------------- REACTION --------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub id: String,
    pub emoji: String,
    pub author: String,
    pub comment_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewReaction {
    pub emoji: String,
    pub author: String,
    pub comment_id: String,
}

impl NewReaction {
    pub fn into_reaction(self, id: String) -> Reaction {
        Reaction {
            id,
            emoji: self.emoji,
            author: self.author,
            comment_id: self.comment_id,
        }
    }
}

impl Entity for Reaction {
    fn entity_type() -> EntityType {
        EntityType::Reaction
    }

    fn id(&self) -> &str {
        &self.id
    }
}

// -------------------- INVITATION --------------------

pub const DEFAULT_INVITATION_TTL_HOURS: i64 = 72;
const MAX_INVITATION_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    pub id: String,
    pub playlist_id: String,
    pub created_by: String,
    pub expires_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewInvitation {
    pub created_by: String,
    pub ttl_hours: Option<i64>,
}

impl NewInvitation {
    pub fn into_invitation(self, id: String, playlist_id: String, now: DateTime<Utc>) -> Invitation {
        let ttl = self
            .ttl_hours
            .unwrap_or(DEFAULT_INVITATION_TTL_HOURS)
            .clamp(1, MAX_INVITATION_TTL_HOURS);
        Invitation {
            id,
            playlist_id,
            created_by: self.created_by,
            expires_at: format_timestamp(now + Duration::hours(ttl)),
        }
    }
}

impl Invitation {
    /// An unparseable expiry counts as expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match DateTime::parse_from_rfc3339(&self.expires_at) {
            Ok(expires_at) => expires_at.with_timezone(&Utc) <= now,
            Err(_) => true,
        }
    }
}

impl Entity for Invitation {
    fn entity_type() -> EntityType {
        EntityType::Invitation
    }

    fn id(&self) -> &str {
        &self.id
    }
}

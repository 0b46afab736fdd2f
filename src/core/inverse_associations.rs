// Inverse Association Management - every forward index map has a reverse one
// user→playlists / playlist→users, playlist→songs / song→playlist, ...

use std::collections::HashMap;
use crate::models::AssociationType;

/// Maps each association type to the type written in the opposite direction.
#[derive(Clone, Debug)]
pub struct InverseAssociationMap {
    inverse_map: HashMap<AssociationType, AssociationType>,
}

impl InverseAssociationMap {
    pub fn new() -> Self {
        let pairs = [
            (AssociationType::UserPlaylists, AssociationType::PlaylistUsers),
            (AssociationType::PlaylistSongs, AssociationType::SongPlaylist),
            (AssociationType::SongComments, AssociationType::CommentSong),
            (AssociationType::CommentReactions, AssociationType::ReactionComment),
            (AssociationType::PlaylistInvitations, AssociationType::InvitationPlaylist),
        ];

        let mut inverse_map = HashMap::new();
        for (forward, reverse) in pairs {
            inverse_map.insert(forward, reverse);
            inverse_map.insert(reverse, forward);
        }

        Self { inverse_map }
    }

    /// Get the inverse association type for a given type
    pub fn get_inverse(&self, assoc_type: &AssociationType) -> Option<&AssociationType> {
        self.inverse_map.get(assoc_type)
    }
}

impl Default for InverseAssociationMap {
    fn default() -> Self {
        Self::new()
    }
}

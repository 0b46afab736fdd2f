use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    interface::SharedPlayInterface,
    models::{AssociationType, Invitation, NewInvitation, Playlist, PlaylistUpdate},
};

impl SharedPlayInterface {
    /// Creates a reusable invitation to edit a playlist, valid until `expires_at`.
    pub async fn create_invitation(&self, playlist_id: &str, new_invitation: NewInvitation) -> AppResult<Invitation> {
        if let Some(hours) = new_invitation.ttl_hours.filter(|hours| *hours <= 0) {
            return Err(AppError::BadRequest(format!(
                "ttl_hours must be positive, got {}",
                hours
            )));
        }
        let playlist: Playlist = self.require_entity(playlist_id).await?;

        let invitation = new_invitation.into_invitation(self.next_id(), playlist.id, Utc::now());
        self.insert_entity(
            &invitation,
            &[(
                invitation.playlist_id.as_str(),
                invitation.id.as_str(),
                AssociationType::PlaylistInvitations,
            )],
        )
        .await?;

        tracing::info!(
            invitation_id = %invitation.id,
            playlist_id = %invitation.playlist_id,
            expires_at = %invitation.expires_at,
            "created invitation"
        );
        Ok(invitation)
    }

    pub async fn get_invitation(&self, invitation_id: &str) -> AppResult<Invitation> {
        self.require_entity(invitation_id).await
    }

    /// Makes `user_id` an editor of the invitation's playlist.
    pub async fn accept_invitation(&self, invitation_id: &str, user_id: &str) -> AppResult<Playlist> {
        let invitation: Invitation = self.require_entity(invitation_id).await?;
        if invitation.is_expired(Utc::now()) {
            return Err(AppError::Gone(format!(
                "Invitation {} expired at {}",
                invitation.id, invitation.expires_at
            )));
        }

        let update = PlaylistUpdate {
            editors: Some(vec![user_id.to_string()]),
            ..Default::default()
        };
        let playlist = self.update_playlist(&invitation.playlist_id, update).await?;

        tracing::info!(invitation_id, user_id, playlist_id = %playlist.id, "accepted invitation");
        Ok(playlist)
    }

    pub async fn invitations_for_playlist(&self, playlist_id: &str) -> AppResult<Vec<Invitation>> {
        Ok(self
            .linked_entities(playlist_id, AssociationType::PlaylistInvitations)
            .await?)
    }
}

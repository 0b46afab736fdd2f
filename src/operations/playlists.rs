use crate::{
    error::AppResult,
    interface::SharedPlayInterface,
    models::{entities::now_timestamp, AssociationType, NewPlaylist, Playlist, PlaylistUpdate, Song},
};

impl SharedPlayInterface {
    /// Creates the playlist with its owner as sole editor and links it to the owner.
    pub async fn create_playlist(&self, new_playlist: NewPlaylist) -> AppResult<Playlist> {
        let playlist = new_playlist.into_playlist(self.next_id(), now_timestamp());
        self.insert_entity(
            &playlist,
            &[(playlist.owner.as_str(), playlist.id.as_str(), AssociationType::UserPlaylists)],
        )
        .await?;

        tracing::info!(playlist_id = %playlist.id, owner = %playlist.owner, "created playlist");
        Ok(playlist)
    }

    pub async fn get_playlist(&self, playlist_id: &str) -> AppResult<Playlist> {
        self.require_entity(playlist_id).await
    }

    /// Editors are merged into the existing set and each new editor gets the playlist in their map.
    pub async fn update_playlist(&self, playlist_id: &str, update: PlaylistUpdate) -> AppResult<Playlist> {
        let _guard = self.lock_document(playlist_id).await;
        let mut playlist: Playlist = self.require_entity(playlist_id).await?;
        let added = playlist.apply(update, now_timestamp());

        let links: Vec<_> = added
            .iter()
            .map(|editor| (editor.as_str(), playlist.id.as_str(), AssociationType::UserPlaylists))
            .collect();
        self.save_entity(&playlist, &links).await?;
        if !added.is_empty() {
            tracing::info!(playlist_id, editors = ?added, "added playlist editors");
        }

        Ok(playlist)
    }

    /// Removes the playlist from every editor's map and drops its song map.
    pub async fn delete_playlist(&self, playlist_id: &str) -> AppResult<Playlist> {
        let playlist = self.remove_entity::<Playlist>(playlist_id).await?;
        tracing::info!(playlist_id, "deleted playlist");
        Ok(playlist)
    }

    pub async fn songs_for_playlist(&self, playlist_id: &str) -> AppResult<Vec<Song>> {
        Ok(self
            .linked_entities(playlist_id, AssociationType::PlaylistSongs)
            .await?)
    }
}

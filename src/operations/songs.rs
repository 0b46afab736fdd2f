use crate::{
    error::{AppError, AppResult},
    interface::SharedPlayInterface,
    models::{entities::now_timestamp, AssociationType, NewSong, Playlist, Song},
    video::{extract_video_id, normalize_artist},
};

impl SharedPlayInterface {
    /// Adds a song to an existing playlist from its video URL.
    pub async fn create_song(&self, new_song: NewSong) -> AppResult<Song> {
        let yt_id = extract_video_id(&new_song.url)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid YouTube URL: {}", new_song.url)))?;
        let playlist: Playlist = self.require_entity(&new_song.playlist_id).await?;

        let song = Song {
            id: self.next_id(),
            yt_id,
            title: new_song.title,
            artist: new_song.artist.as_deref().map(normalize_artist),
            added_by: new_song.added_by,
            link: new_song.url,
            playlist_id: playlist.id,
            date_added: now_timestamp(),
            date_released: new_song.date_released,
        };

        self.insert_entity(
            &song,
            &[(song.playlist_id.as_str(), song.id.as_str(), AssociationType::PlaylistSongs)],
        )
        .await?;

        tracing::info!(song_id = %song.id, playlist_id = %song.playlist_id, yt_id = %song.yt_id, "added song");
        Ok(song)
    }

    pub async fn get_song(&self, song_id: &str) -> AppResult<Song> {
        self.require_entity(song_id).await
    }

    /// Comment documents are kept but are no longer reachable through the song.
    pub async fn delete_song(&self, song_id: &str) -> AppResult<Song> {
        let song = self.remove_entity::<Song>(song_id).await?;
        tracing::info!(song_id, playlist_id = %song.playlist_id, "deleted song");
        Ok(song)
    }
}

use crate::{
    error::AppResult,
    interface::SharedPlayInterface,
    models::{entities::now_timestamp, AssociationType, NewUser, Playlist, User, UserUpdate},
};

impl SharedPlayInterface {
    pub async fn create_user(&self, new_user: NewUser) -> AppResult<User> {
        let user = new_user.into_user(self.next_id(), now_timestamp());
        self.insert_entity(&user, &[]).await?;

        tracing::info!(user_id = %user.id, "created user");
        Ok(user)
    }

    pub async fn get_user(&self, user_id: &str) -> AppResult<User> {
        self.require_entity(user_id).await
    }

    pub async fn update_user(&self, user_id: &str, update: UserUpdate) -> AppResult<User> {
        let _guard = self.lock_document(user_id).await;
        let mut user: User = self.require_entity(user_id).await?;
        user.apply(update);
        self.save_entity(&user, &[]).await?;
        Ok(user)
    }

    /// The user's playlists stay; they lose this user from their index map.
    pub async fn delete_user(&self, user_id: &str) -> AppResult<User> {
        let user = self.remove_entity::<User>(user_id).await?;
        tracing::info!(user_id, "deleted user");
        Ok(user)
    }

    /// Playlists the user owns or edits, in the order they were linked.
    pub async fn playlists_for_user(&self, user_id: &str) -> AppResult<Vec<Playlist>> {
        Ok(self
            .linked_entities(user_id, AssociationType::UserPlaylists)
            .await?)
    }
}

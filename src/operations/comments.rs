use async_trait::async_trait;

use crate::{
    error::AppResult,
    interface::SharedPlayInterface,
    models::{
        entities::now_timestamp, AssociationType, Comment, CommentUpdate, NewComment, Song,
    },
    threading::{ThreadBuilder, ThreadEntry},
};

/// Supplies the flat comment records of one song, in no particular order.
#[async_trait]
pub trait CommentSource: Send + Sync {
    async fn comments_for(&self, song_id: &str) -> anyhow::Result<Vec<Comment>>;
}

#[async_trait]
impl CommentSource for SharedPlayInterface {
    async fn comments_for(&self, song_id: &str) -> anyhow::Result<Vec<Comment>> {
        self.linked_entities(song_id, AssociationType::SongComments)
            .await
    }
}

/// Fetches a song's comments and orders them for display, enforcing the builder's ceiling.
pub async fn load_thread<S>(
    source: &S,
    builder: &ThreadBuilder,
    song_id: &str,
) -> AppResult<Vec<ThreadEntry<Comment>>>
where
    S: CommentSource + ?Sized,
{
    let comments = source.comments_for(song_id).await?;
    tracing::debug!(song_id, count = comments.len(), "threading comments");
    Ok(builder.try_build(comments)?)
}

impl SharedPlayInterface {
    /// Posts a comment on an existing song. A reply names its parent in `prev`.
    pub async fn create_comment(&self, new_comment: NewComment) -> AppResult<Comment> {
        let song: Song = self.require_entity(&new_comment.song_id).await?;

        let comment = new_comment.into_comment(self.next_id(), now_timestamp());
        self.insert_entity(
            &comment,
            &[(song.id.as_str(), comment.id.as_str(), AssociationType::SongComments)],
        )
        .await?;

        tracing::info!(
            comment_id = %comment.id,
            song_id = %comment.song_id,
            reply_to = ?comment.prev,
            "created comment"
        );
        Ok(comment)
    }

    pub async fn get_comment(&self, comment_id: &str) -> AppResult<Comment> {
        self.require_entity(comment_id).await
    }

    pub async fn update_comment(&self, comment_id: &str, update: CommentUpdate) -> AppResult<Comment> {
        let _guard = self.lock_document(comment_id).await;
        let mut comment: Comment = self.require_entity(comment_id).await?;
        comment.apply(update);
        self.save_entity(&comment, &[]).await?;
        Ok(comment)
    }

    /// Replies to the deleted comment stay and are shown as top-level comments.
    pub async fn delete_comment(&self, comment_id: &str) -> AppResult<Comment> {
        let comment = self.remove_entity::<Comment>(comment_id).await?;
        tracing::info!(comment_id, song_id = %comment.song_id, "deleted comment");
        Ok(comment)
    }

    /// All comments of a song as one depth-annotated, display-ordered list.
    pub async fn comment_thread(&self, song_id: &str) -> AppResult<Vec<ThreadEntry<Comment>>> {
        self.require_entity::<Song>(song_id).await?;
        load_thread(self, self.thread_builder(), song_id).await
    }
}

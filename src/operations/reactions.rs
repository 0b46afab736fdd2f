use crate::{
    error::AppResult,
    interface::SharedPlayInterface,
    models::{AssociationType, Comment, NewReaction, Reaction},
};

impl SharedPlayInterface {
    pub async fn create_reaction(&self, new_reaction: NewReaction) -> AppResult<Reaction> {
        let comment: Comment = self.require_entity(&new_reaction.comment_id).await?;

        let reaction = new_reaction.into_reaction(self.next_id());
        self.insert_entity(
            &reaction,
            &[(comment.id.as_str(), reaction.id.as_str(), AssociationType::CommentReactions)],
        )
        .await?;

        tracing::info!(reaction_id = %reaction.id, comment_id = %comment.id, "created reaction");
        Ok(reaction)
    }

    pub async fn get_reaction(&self, reaction_id: &str) -> AppResult<Reaction> {
        self.require_entity(reaction_id).await
    }

    pub async fn delete_reaction(&self, reaction_id: &str) -> AppResult<Reaction> {
        let reaction = self.remove_entity::<Reaction>(reaction_id).await?;
        tracing::info!(reaction_id, comment_id = %reaction.comment_id, "deleted reaction");
        Ok(reaction)
    }

    pub async fn reactions_for_comment(&self, comment_id: &str) -> AppResult<Vec<Reaction>> {
        Ok(self
            .linked_entities(comment_id, AssociationType::CommentReactions)
            .await?)
    }
}

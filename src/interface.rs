// SharedPlay Interface - typed document access over the store
// Every forward index map write is mirrored by its inverse, in the same transaction

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use anyhow::Result;
use futures::future::try_join_all;
use tokio::sync::{Mutex, MutexGuard};

use crate::{
    core::{database::AssociationKey, Database, IdGenerator, InverseAssociationMap},
    error::{AppError, AppResult},
    models::{AssociationType, Entity},
    threading::ThreadBuilder,
};

const WRITE_LOCK_STRIPES: usize = 64;

#[derive(Clone)]
pub struct SharedPlayInterface {
    db: Arc<Database>,
    id_generator: Arc<IdGenerator>,
    inverse_map: InverseAssociationMap,
    thread_builder: ThreadBuilder,
    // Read-modify-write of one document holds the stripe its id hashes to
    write_locks: Arc<[Mutex<()>]>,
}

impl SharedPlayInterface {
    pub fn new(db: Arc<Database>, id_generator: IdGenerator, thread_builder: ThreadBuilder) -> Self {
        Self {
            db,
            id_generator: Arc::new(id_generator),
            inverse_map: InverseAssociationMap::new(),
            thread_builder,
            write_locks: (0..WRITE_LOCK_STRIPES).map(|_| Mutex::new(())).collect(),
        }
    }

    pub fn thread_builder(&self) -> &ThreadBuilder {
        &self.thread_builder
    }

    pub fn next_id(&self) -> String {
        self.id_generator.next_string_id()
    }

    /// Serializes updates of one document. Hold the guard from load to save.
    pub async fn lock_document(&self, id: &str) -> MutexGuard<'_, ()> {
        let mut hasher = DefaultHasher::new();
        id.hash(&mut hasher);
        let stripe = (hasher.finish() % WRITE_LOCK_STRIPES as u64) as usize;
        self.write_locks[stripe].lock().await
    }

    /// Loads a document; documents of another type count as missing.
    pub async fn get_entity<T: Entity>(&self, id: &str) -> Result<Option<T>> {
        match self.db.get_object_by_id_and_type(id, T::entity_type_str()).await? {
            Some(obj) => Ok(Some(serde_json::from_str(&obj.data)?)),
            None => Ok(None),
        }
    }

    pub async fn require_entity<T: Entity>(&self, id: &str) -> AppResult<T> {
        self.get_entity(id)
            .await?
            .ok_or_else(|| AppError::not_found(T::entity_type().display_name(), id))
    }

    /// Stores a new document together with `links` and their inverses.
    pub async fn insert_entity<T: Entity>(&self, entity: &T, links: &[AssociationKey<'_>]) -> AppResult<()> {
        let data = serde_json::to_string(entity)?;
        let edges = self.with_inverses(links);
        self.db
            .create_object_with_associations(entity.id(), T::entity_type(), &data, &edges)
            .await?;
        Ok(())
    }

    /// Replaces a stored document and adds `links` and their inverses.
    pub async fn save_entity<T: Entity>(&self, entity: &T, links: &[AssociationKey<'_>]) -> AppResult<()> {
        let data = serde_json::to_string(entity)?;
        let edges = self.with_inverses(links);
        if !self
            .db
            .update_object_with_associations(entity.id(), &data, &edges)
            .await?
        {
            return Err(AppError::not_found(T::entity_type().display_name(), entity.id()));
        }
        Ok(())
    }

    /// Deletes a document together with every index map entry touching it.
    pub async fn remove_entity<T: Entity>(&self, id: &str) -> AppResult<T> {
        let entity = self.require_entity::<T>(id).await?;
        self.db.delete_object(id).await?;
        Ok(entity)
    }

    /// Documents reachable through one index map, in link order.
    /// Entries whose document no longer exists are skipped.
    pub async fn linked_entities<T: Entity>(&self, source_id: &str, assoc_type: AssociationType) -> Result<Vec<T>> {
        let target_ids = self.db.get_association_targets(source_id, assoc_type).await?;
        let loaded = try_join_all(target_ids.iter().map(|id| self.get_entity::<T>(id))).await?;

        let mut entities = Vec::with_capacity(loaded.len());
        for (id, entity) in target_ids.iter().zip(loaded) {
            match entity {
                Some(entity) => entities.push(entity),
                None => tracing::warn!(
                    source_id,
                    target_id = %id,
                    association = assoc_type.as_str(),
                    "{} not found in mapping, must have been deleted earlier",
                    T::entity_type().display_name()
                ),
            }
        }

        Ok(entities)
    }

    fn with_inverses<'a>(&self, links: &[AssociationKey<'a>]) -> Vec<AssociationKey<'a>> {
        let mut edges = Vec::with_capacity(links.len() * 2);
        for &(source_id, target_id, assoc_type) in links {
            edges.push((source_id, target_id, assoc_type));
            if let Some(inverse) = self.inverse_map.get_inverse(&assoc_type) {
                edges.push((target_id, source_id, *inverse));
            }
        }
        edges
    }
}

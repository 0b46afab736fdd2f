use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core::cache::Cache;
use crate::models::{AssociationType, EntityType, StoredObject};

/// One index map edge: (source id, target id, type).
pub type AssociationKey<'a> = (&'a str, &'a str, AssociationType);

// Document store: JSON objects plus forward/reverse index maps, on SQLite
pub struct Database {
    pub pool: SqlitePool,
    object_cache: Arc<Mutex<Cache<String, StoredObject>>>,
    assoc_cache: Arc<Mutex<Cache<String, Vec<String>>>>,
}

impl Database {
    pub async fn new(database_url: &str, cache_capacity: usize) -> Result<Self> {
        let in_memory = database_url.contains(":memory:");
        if !in_memory {
            ensure_parent_dir(database_url)?;
        }

        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL {:?}", database_url))?
            .create_if_missing(true);

        // Every connection to :memory: opens its own empty database
        let mut pool_options = SqlitePoolOptions::new();
        if in_memory {
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("Error opening database {:?}", database_url))?;

        Ok(Database {
            pool,
            object_cache: Arc::new(Mutex::new(Cache::new(cache_capacity))),
            assoc_cache: Arc::new(Mutex::new(Cache::new(cache_capacity * 2))),
        })
    }

    pub async fn init(&self) -> Result<()> {
        // Documents of every entity type
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS objects (
                id TEXT PRIMARY KEY,
                object_type TEXT NOT NULL,
                data TEXT NOT NULL,
                created INTEGER NOT NULL,
                updated INTEGER NOT NULL
            )"
        )
        .execute(&self.pool)
        .await?;

        // Index maps between documents
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS associations (
                edge_id INTEGER PRIMARY KEY AUTOINCREMENT,
                source_id TEXT NOT NULL,
                target_id TEXT NOT NULL,
                association_type TEXT NOT NULL,
                created INTEGER NOT NULL,
                UNIQUE(source_id, target_id, association_type)
            )"
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_objects_type ON objects(object_type)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_assoc_source_type ON associations(source_id, association_type)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_assoc_target_type ON associations(target_id, association_type)")
            .execute(&self.pool)
            .await?;

        tracing::debug!("database schema ready");
        Ok(())
    }

    /// Inserts the document and its index map edges in one transaction.
    /// Either everything is written or nothing is.
    pub async fn create_object_with_associations(
        &self,
        id: &str,
        entity_type: EntityType,
        data: &str,
        edges: &[AssociationKey<'_>],
    ) -> Result<StoredObject> {
        let now = Utc::now().timestamp();
        let type_str = entity_type.as_str();
        let mut tx = self.pool.begin().await?;

        insert_edges(&mut *tx, edges, now).await?;

        sqlx::query(
            "INSERT INTO objects (id, object_type, data, created, updated) VALUES (?, ?, ?, ?, ?)"
        )
        .bind(id)
        .bind(type_str)
        .bind(data)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to create {} {}", type_str, id))?;

        tx.commit().await?;

        let obj = StoredObject {
            id: id.to_string(),
            object_type: type_str.to_string(),
            data: data.to_string(),
            created: now,
            updated: now,
        };

        self.object_cache.lock().await.insert(obj.id.clone(), obj.clone());
        self.invalidate_edges(edges).await;

        Ok(obj)
    }

    pub async fn get_object(&self, id: &str) -> Result<Option<StoredObject>> {
        let generation = {
            let mut cache = self.object_cache.lock().await;
            if let Some(obj) = cache.get(&id.to_string()).cloned() {
                return Ok(Some(obj));
            }
            cache.generation()
        };

        let row = sqlx::query(
            "SELECT id, object_type, data, created, updated FROM objects WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let obj = object_from_row(&row);
                self.object_cache
                    .lock()
                    .await
                    .insert_if_current(obj.id.clone(), obj.clone(), generation);
                Ok(Some(obj))
            }
            None => Ok(None),
        }
    }

    /// Like `get_object`, but an object of another type counts as missing.
    pub async fn get_object_by_id_and_type(&self, id: &str, object_type: &str) -> Result<Option<StoredObject>> {
        Ok(self
            .get_object(id)
            .await?
            .filter(|obj| obj.object_type == object_type))
    }

    /// Replaces the document and adds edges in one transaction.
    /// Returns false, writing nothing, when no such object exists.
    pub async fn update_object_with_associations(
        &self,
        id: &str,
        data: &str,
        edges: &[AssociationKey<'_>],
    ) -> Result<bool> {
        let now = Utc::now().timestamp();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE objects SET data = ?, updated = ? WHERE id = ?")
            .bind(data)
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        insert_edges(&mut *tx, edges, now).await?;
        tx.commit().await?;

        self.object_cache.lock().await.remove(&id.to_string());
        self.invalidate_edges(edges).await;

        Ok(true)
    }

    /// Deletes the object and every index map entry touching it, atomically.
    /// Returns false when no such object exists.
    pub async fn delete_object(&self, id: &str) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM associations WHERE source_id = ? OR target_id = ?")
            .bind(id)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM objects WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        // Invalidate caches only after successful commit
        self.object_cache.lock().await.remove(&id.to_string());
        self.assoc_cache.lock().await.clear();

        Ok(result.rows_affected() > 0)
    }

    /// Target ids of one index map, oldest edge first.
    pub async fn get_association_targets(&self, source_id: &str, assoc_type: AssociationType) -> Result<Vec<String>> {
        let cache_key = assoc_cache_key(source_id, assoc_type);
        let generation = {
            let mut cache = self.assoc_cache.lock().await;
            if let Some(targets) = cache.get(&cache_key).cloned() {
                return Ok(targets);
            }
            cache.generation()
        };

        let targets: Vec<String> = sqlx::query(
            "SELECT target_id FROM associations WHERE source_id = ? AND association_type = ? ORDER BY created, edge_id"
        )
        .bind(source_id)
        .bind(assoc_type.as_str())
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|row| row.get::<String, _>(0))
        .collect();

        self.assoc_cache
            .lock()
            .await
            .insert_if_current(cache_key, targets.clone(), generation);
        Ok(targets)
    }

    async fn invalidate_edges(&self, edges: &[AssociationKey<'_>]) {
        if edges.is_empty() {
            return;
        }
        let mut cache = self.assoc_cache.lock().await;
        for (source_id, _, assoc_type) in edges {
            cache.remove(&assoc_cache_key(source_id, *assoc_type));
        }
    }
}

/// Existing edges are left untouched.
async fn insert_edges(conn: &mut SqliteConnection, edges: &[AssociationKey<'_>], now: i64) -> Result<()> {
    for (source_id, target_id, assoc_type) in edges {
        sqlx::query(
            "INSERT OR IGNORE INTO associations (source_id, target_id, association_type, created)
             VALUES (?, ?, ?, ?)"
        )
        .bind(*source_id)
        .bind(*target_id)
        .bind(assoc_type.as_str())
        .bind(now)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

fn object_from_row(row: &SqliteRow) -> StoredObject {
    StoredObject {
        id: row.get("id"),
        object_type: row.get("object_type"),
        data: row.get("data"),
        created: row.get("created"),
        updated: row.get("updated"),
    }
}

fn assoc_cache_key(source_id: &str, assoc_type: AssociationType) -> String {
    format!("{}:{}", source_id, assoc_type.as_str())
}

/// SQLite creates the file but not its directory.
fn ensure_parent_dir(database_url: &str) -> Result<()> {
    let path = database_url
        .trim_start_matches("sqlite:")
        .trim_start_matches("//");
    let path = path.split('?').next().unwrap_or(path);

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory {:?}", parent))?;
        }
    }
    Ok(())
}

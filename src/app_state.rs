use std::sync::Arc;
use crate::{
    config::Config,
    core::{Database, IdGenerator},
    interface::SharedPlayInterface,
    threading::ThreadBuilder,
};

#[derive(Clone)]
pub struct AppState {
    pub interface: SharedPlayInterface,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let database = Database::new(&config.database.url, config.cache.capacity).await?;
        database.init().await?;
        let database = Arc::new(database);

        let id_generator = IdGenerator::new(config.ids.shard_id)?;
        let thread_builder = ThreadBuilder::new().with_max_comments(config.threads.max_comments);

        let interface = SharedPlayInterface::new(database, id_generator, thread_builder);

        Ok(Self { interface, config })
    }
}

use std::sync::Arc;

use mongodb::Client;

use crate::config::{Config, StoreBackend};
use crate::db::memory::MemoryVisitorStore;
use crate::db::mongodb::{MongoVisitorStore, get_database};
use crate::db::store::VisitorStore;

/// The store picked by `STORE_BACKEND`, plus the MongoDB client (if any) so
/// it can be shut down once the server stops.
pub struct OpenStore {
    pub store: Arc<dyn VisitorStore>,
    pub client: Option<Client>,
}

pub async fn open_store(config: &Config) -> anyhow::Result<OpenStore> {
    match (config.store_backend, config.mongo_url.as_deref()) {
        (StoreBackend::MongoDb, Some(mongo_url)) => {
            let (client, db) = get_database(mongo_url, &config.mongo_db_name).await?;
            log::info!("MongoDB connected ({})", config.mongo_db_name);

            let store = MongoVisitorStore::new(db);
            if let Err(e) = store.ensure_indexes().await {
                // Queries still work without the indexes, just slower
                log::warn!("{e:#}");
            }
            Ok(OpenStore {
                store: Arc::new(store),
                client: Some(client),
            })
        }
        (StoreBackend::MongoDb, None) => anyhow::bail!("MONGO_URL not set"),
        (StoreBackend::Memory, _) => {
            log::warn!("Using the in-memory store; visits are lost on restart");
            Ok(OpenStore {
                store: Arc::new(MemoryVisitorStore::new()),
                client: None,
            })
        }
    }
}

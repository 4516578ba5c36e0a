use std::sync::Arc;

use folio_core::image::ImageCodec;
use folio_core::lifecycle::{ProjectHooks, StandardProjectHooks};
use folio_core::storage::{LocalDisk, StorageBackend};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: folio_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Cover image codec bound to the configured storage backend.
    pub images: ImageCodec,
    /// Hooks the project repository runs around writes.
    pub hooks: Arc<dyn ProjectHooks>,
}

impl AppState {
    /// Wire the state from configuration, storing files on local disk.
    pub fn new(pool: folio_db::DbPool, config: ServerConfig) -> Self {
        let storage: Arc<dyn StorageBackend> =
            Arc::new(LocalDisk::new(config.storage_root.clone()));
        Self::with_storage(pool, config, storage)
    }

    pub fn with_storage(
        pool: folio_db::DbPool,
        config: ServerConfig,
        storage: Arc<dyn StorageBackend>,
    ) -> Self {
        let images = ImageCodec::new(storage, config.image_destination.clone());
        let hooks = Arc::new(StandardProjectHooks::new(images.clone()));
        Self {
            pool,
            config: Arc::new(config),
            images,
            hooks,
        }
    }
}

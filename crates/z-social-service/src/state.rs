//! Application state.

use std::sync::Arc;

use z_social_store::RocksStore;

use crate::config::ServiceConfig;
use crate::pictures::PictureStorage;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<RocksStore>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// Profile picture files.
    pub pictures: PictureStorage,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, config: ServiceConfig) -> Self {
        let pictures = PictureStorage::new(&config.upload_dir, config.max_upload_bytes);

        if !config.auto_follow_first_account {
            tracing::info!("Auto-follow of the first account disabled");
        }

        Self {
            store,
            config,
            pictures,
        }
    }
}

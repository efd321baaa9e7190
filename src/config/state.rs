// Application state module
// Bundles configuration with the injected catalog store

use std::sync::Arc;

use super::types::Config;
use crate::catalog::{self, CatalogStore, SeedError, SharedCatalogStore};

/// Application state shared by every connection
pub struct AppState {
    pub config: Config,
    pub catalog: SharedCatalogStore,
}

impl AppState {
    /// Create `AppState` around an existing catalog store
    pub const fn new(config: Config, catalog: SharedCatalogStore) -> Self {
        Self { config, catalog }
    }

    /// Create `AppState` with the catalog named by `catalog.seed_file`
    /// (or the built-in activities when unset)
    pub fn from_config(config: Config) -> Result<Self, SeedError> {
        let activities = catalog::load_catalog(config.catalog.seed_file.as_deref())?;
        Ok(Self::new(config, CatalogStore::shared(activities)))
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

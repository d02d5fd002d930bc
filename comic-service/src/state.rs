//! Application state management

use std::sync::Arc;

use crate::{
    config::Config,
    error::Result,
    repository::{InMemoryStore, SeedData},
};

/// Application state shared across handlers
#[derive(Debug, Clone, Default)]
pub struct AppState {
    config: Arc<Config>,
    store: InMemoryStore,
}

impl AppState {
    /// Create state over an empty store
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            store: InMemoryStore::new(),
        }
    }

    /// Create a new builder for AppState
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the store
    pub fn store(&self) -> &InMemoryStore {
        &self.store
    }
}

/// Builder for AppState
#[derive(Debug, Default)]
pub struct AppStateBuilder {
    config: Option<Config>,
    store: Option<InMemoryStore>,
    seed: Option<SeedData>,
}

impl AppStateBuilder {
    /// Create a new builder
    ///
    /// Config defaults to `Config::default()` and the store starts empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Use an existing store
    pub fn store(mut self, store: InMemoryStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Rows to load into the store when building
    pub fn seed(mut self, seed: SeedData) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the state, loading seed rows if any were given
    ///
    /// # Errors
    ///
    /// Fails if the seed rows contain a dangling reference.
    pub async fn build(self) -> Result<AppState> {
        let store = self.store.unwrap_or_default();
        if let Some(seed) = self.seed {
            store.seed(seed).await?;
        }

        Ok(AppState {
            config: Arc::new(self.config.unwrap_or_default()),
            store,
        })
    }
}

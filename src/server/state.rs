use axum::extract::FromRef;

use crate::catalog_store::ProductStore;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedProductStore = Arc<dyn ProductStore>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub product_store: GuardedProductStore,
}

impl ServerState {
    pub fn new(config: ServerConfig, product_store: GuardedProductStore) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            product_store,
        }
    }
}

impl FromRef<ServerState> for GuardedProductStore {
    fn from_ref(input: &ServerState) -> Self {
        input.product_store.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
